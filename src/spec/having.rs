//! Having filters: predicates over aggregated rows of a groupBy query.

use serde::Serialize;

use super::extraction::ExtractionFunction;
use super::filter::Filter;

/// Matches groups where the dimension equals `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "dimSelector", rename_all = "camelCase")]
pub struct DimensionSelectorHavingFilter {
    pub dimension: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "equalTo")]
pub struct EqualToHavingFilter {
    pub aggregation: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "greaterThan")]
pub struct GreaterThanHavingFilter {
    pub aggregation: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "lessThan")]
pub struct LessThanHavingFilter {
    pub aggregation: String,
    pub value: f64,
}

/// Applies a row-level filter to aggregated rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "filter")]
pub struct QueryHavingFilter {
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "and", rename_all = "camelCase")]
pub struct AndHavingFilter {
    pub having_specs: Vec<HavingFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "or", rename_all = "camelCase")]
pub struct OrHavingFilter {
    pub having_specs: Vec<HavingFilter>,
}

/// Negates a having filter.
///
/// Plain filters are wrapped as `{type: filter, filter}` on the way in;
/// having filters are embedded as they are.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "not", rename_all = "camelCase")]
pub struct NotHavingFilter {
    pub having_spec: Box<HavingFilter>,
}

impl NotHavingFilter {
    pub fn new(having_spec: impl Into<HavingFilter>) -> Self {
        Self {
            having_spec: Box::new(having_spec.into()),
        }
    }
}

/// Any having filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HavingFilter {
    DimensionSelector(DimensionSelectorHavingFilter),
    EqualTo(EqualToHavingFilter),
    GreaterThan(GreaterThanHavingFilter),
    LessThan(LessThanHavingFilter),
    Query(QueryHavingFilter),
    And(AndHavingFilter),
    Or(OrHavingFilter),
    Not(NotHavingFilter),
}

impl HavingFilter {
    pub fn dim_selector(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        HavingFilter::DimensionSelector(DimensionSelectorHavingFilter {
            dimension: dimension.into(),
            value: value.into(),
            extraction_fn: None,
        })
    }

    pub fn equal_to(aggregation: impl Into<String>, value: f64) -> Self {
        HavingFilter::EqualTo(EqualToHavingFilter {
            aggregation: aggregation.into(),
            value,
        })
    }

    pub fn greater_than(aggregation: impl Into<String>, value: f64) -> Self {
        HavingFilter::GreaterThan(GreaterThanHavingFilter {
            aggregation: aggregation.into(),
            value,
        })
    }

    pub fn less_than(aggregation: impl Into<String>, value: f64) -> Self {
        HavingFilter::LessThan(LessThanHavingFilter {
            aggregation: aggregation.into(),
            value,
        })
    }

    pub fn and<I, H>(specs: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<HavingFilter>,
    {
        HavingFilter::And(AndHavingFilter {
            having_specs: specs.into_iter().map(Into::into).collect(),
        })
    }

    pub fn or<I, H>(specs: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<HavingFilter>,
    {
        HavingFilter::Or(OrHavingFilter {
            having_specs: specs.into_iter().map(Into::into).collect(),
        })
    }

    pub fn not(spec: impl Into<HavingFilter>) -> Self {
        HavingFilter::Not(NotHavingFilter::new(spec))
    }

    pub fn and_with(self, other: impl Into<HavingFilter>) -> Self {
        match self {
            HavingFilter::And(mut and) => {
                and.having_specs.push(other.into());
                HavingFilter::And(and)
            }
            current => HavingFilter::and([current, other.into()]),
        }
    }

    pub fn or_with(self, other: impl Into<HavingFilter>) -> Self {
        match self {
            HavingFilter::Or(mut or) => {
                or.having_specs.push(other.into());
                HavingFilter::Or(or)
            }
            current => HavingFilter::or([current, other.into()]),
        }
    }
}

impl From<Filter> for HavingFilter {
    fn from(filter: Filter) -> Self {
        HavingFilter::Query(QueryHavingFilter { filter })
    }
}

impl From<NotHavingFilter> for HavingFilter {
    fn from(value: NotHavingFilter) -> Self {
        HavingFilter::Not(value)
    }
}
