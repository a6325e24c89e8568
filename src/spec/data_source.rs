//! Data sources: where a query reads its rows from.

use serde::Serialize;
use serde_json::Value;

use crate::query::Query;
use crate::types::JoinType;

/// Source of rows for a query.
///
/// `Query` embeds a complete query, so data sources and queries nest to
/// whatever depth the caller builds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DataSource {
    Table {
        name: String,
    },
    Lookup {
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    Inline {
        column_names: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    #[serde(rename_all = "camelCase")]
    Union {
        data_sources: Vec<String>,
    },
    Query {
        query: Box<Query>,
    },
    #[serde(rename_all = "camelCase")]
    Join {
        left: Box<DataSource>,
        right: Box<DataSource>,
        right_prefix: String,
        condition: String,
        join_type: JoinType,
    },
}

impl DataSource {
    pub fn table(name: impl Into<String>) -> Self {
        DataSource::Table { name: name.into() }
    }

    pub fn lookup(name: impl Into<String>) -> Self {
        DataSource::Lookup { name: name.into() }
    }

    pub fn inline<I, S>(column_names: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataSource::Inline {
            column_names: column_names.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    pub fn union<I, S>(data_sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataSource::Union {
            data_sources: data_sources.into_iter().map(Into::into).collect(),
        }
    }

    pub fn query(query: impl Into<Query>) -> Self {
        DataSource::Query {
            query: Box::new(query.into()),
        }
    }

    pub fn join(
        left: impl Into<DataSource>,
        right: impl Into<DataSource>,
        right_prefix: impl Into<String>,
        condition: impl Into<String>,
        join_type: JoinType,
    ) -> Self {
        DataSource::Join {
            left: Box::new(left.into()),
            right: Box::new(right.into()),
            right_prefix: right_prefix.into(),
            condition: condition.into(),
            join_type,
        }
    }

    /// Name of the table, lookup or first union member; `None` for derived sources.
    pub fn name(&self) -> Option<&str> {
        match self {
            DataSource::Table { name } | DataSource::Lookup { name } => Some(name),
            DataSource::Union { data_sources } => data_sources.first().map(String::as_str),
            DataSource::Join { left, .. } => left.name(),
            DataSource::Inline { .. } | DataSource::Query { .. } => None,
        }
    }
}

impl From<&str> for DataSource {
    fn from(name: &str) -> Self {
        DataSource::table(name)
    }
}

impl From<String> for DataSource {
    fn from(name: String) -> Self {
        DataSource::table(name)
    }
}
