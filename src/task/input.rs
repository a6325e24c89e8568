//! Input sources and formats of native batch ingestion.

use serde::Serialize;

use crate::spec::Filter;
use crate::types::Interval;

/// Where an ingestion task reads its rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputSource {
    /// Re-ingest rows from an existing datasource.
    #[serde(rename_all = "camelCase")]
    Druid {
        data_source: String,
        interval: Interval,
        #[serde(skip_serializing_if = "Option::is_none")]
        filter: Option<Filter>,
        #[serde(skip_serializing_if = "Option::is_none")]
        dimensions: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        metrics: Option<Vec<String>>,
    },
    /// Rows embedded in the task itself.
    Inline { data: String },
    #[serde(rename_all = "camelCase")]
    Http {
        uris: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        http_authentication_username: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        http_authentication_password: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Local { base_dir: String, filter: String },
}

impl InputSource {
    pub fn druid(data_source: impl Into<String>, interval: Interval) -> Self {
        InputSource::Druid {
            data_source: data_source.into(),
            interval,
            filter: None,
            dimensions: None,
            metrics: None,
        }
    }

    pub fn inline(data: impl Into<String>) -> Self {
        InputSource::Inline { data: data.into() }
    }

    pub fn http<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InputSource::Http {
            uris: uris.into_iter().map(Into::into).collect(),
            http_authentication_username: None,
            http_authentication_password: None,
        }
    }

    pub fn local(base_dir: impl Into<String>, filter: impl Into<String>) -> Self {
        InputSource::Local {
            base_dir: base_dir.into(),
            filter: filter.into(),
        }
    }

    /// Whether rows come from a datasource that already carries `__time`.
    pub fn is_reindex(&self) -> bool {
        matches!(self, InputSource::Druid { .. })
    }
}

/// Format of the rows read from a non-Druid input source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputFormat {
    Json,
    #[serde(rename_all = "camelCase")]
    Csv {
        #[serde(skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<String>>,
        find_columns_from_header: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        skip_header_rows: Option<u32>,
    },
    #[serde(rename_all = "camelCase")]
    Tsv {
        #[serde(skip_serializing_if = "Option::is_none")]
        columns: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        delimiter: Option<String>,
        find_columns_from_header: bool,
    },
}

impl InputFormat {
    /// CSV whose first line names the columns.
    pub fn csv_with_header() -> Self {
        InputFormat::Csv {
            columns: None,
            find_columns_from_header: true,
            skip_header_rows: None,
        }
    }

    pub fn csv<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InputFormat::Csv {
            columns: Some(columns.into_iter().map(Into::into).collect()),
            find_columns_from_header: false,
            skip_header_rows: None,
        }
    }
}
