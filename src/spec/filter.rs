//! Row-level filters, applied before aggregation.

use serde::Serialize;
use serde_json::Value;

use super::dimension::DimensionSpec;
use super::extraction::ExtractionFunction;
use super::search::{SearchInput, SearchQuerySpec};
use crate::error::{DruidError, DruidResult};
use crate::types::{BoundOperator, DataType, Interval, SortingOrder};

// =============================================================================
// Dimension filters
// =============================================================================

/// Matches rows where the dimension equals `value` (null matches null).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "selector", rename_all = "camelCase")]
pub struct SelectorFilter {
    pub dimension: String,
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "in", rename_all = "camelCase")]
pub struct InFilter {
    pub dimension: String,
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

/// Range filter on a dimension. Either side may be open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "bound", rename_all = "camelCase")]
#[must_use = "builders have no effect until used"]
pub struct BoundFilter {
    pub dimension: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_strict: Option<bool>,
    pub ordering: SortingOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

/// Numeric values compare numerically unless told otherwise.
fn default_ordering(value: &str) -> SortingOrder {
    if value.trim().parse::<f64>().is_ok() {
        SortingOrder::Numeric
    } else {
        SortingOrder::Lexicographic
    }
}

impl BoundFilter {
    /// One-sided bound: `dimension <operator> value`.
    pub fn new(dimension: impl Into<String>, operator: BoundOperator, value: impl Into<String>) -> Self {
        let value = value.into();
        let ordering = default_ordering(&value);
        let mut filter = Self {
            dimension: dimension.into(),
            lower: None,
            upper: None,
            lower_strict: None,
            upper_strict: None,
            ordering,
            extraction_fn: None,
        };
        if operator.is_lower() {
            filter.lower = Some(value);
            filter.lower_strict = Some(operator.is_strict());
        } else {
            filter.upper = Some(value);
            filter.upper_strict = Some(operator.is_strict());
        }
        filter
    }

    /// Inclusive range `min <= dimension <= max`.
    pub fn between(dimension: impl Into<String>, min: impl Into<String>, max: impl Into<String>) -> Self {
        let min = min.into();
        let max = max.into();
        let ordering = if default_ordering(&min) == SortingOrder::Numeric
            && default_ordering(&max) == SortingOrder::Numeric
        {
            SortingOrder::Numeric
        } else {
            SortingOrder::Lexicographic
        };
        Self {
            dimension: dimension.into(),
            lower: Some(min),
            upper: Some(max),
            lower_strict: Some(false),
            upper_strict: Some(false),
            ordering,
            extraction_fn: None,
        }
    }

    pub fn with_ordering(mut self, ordering: SortingOrder) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_extraction(mut self, extraction_fn: impl Into<ExtractionFunction>) -> Self {
        self.extraction_fn = Some(extraction_fn.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "interval", rename_all = "camelCase")]
pub struct IntervalFilter {
    pub dimension: String,
    pub intervals: Vec<Interval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

/// SQL LIKE matching; `%` and `_` are wildcards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "like", rename_all = "camelCase")]
pub struct LikeFilter {
    pub dimension: String,
    pub pattern: String,
    pub escape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "regex", rename_all = "camelCase")]
pub struct RegexFilter {
    pub dimension: String,
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "search", rename_all = "camelCase")]
pub struct SearchFilter {
    pub dimension: String,
    pub query: SearchQuerySpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

/// Matches rows where all listed dimensions hold the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "columnComparison")]
pub struct ColumnComparisonFilter {
    pub dimensions: Vec<DimensionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "javascript", rename_all = "camelCase")]
pub struct JavascriptFilter {
    pub dimension: String,
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_fn: Option<ExtractionFunction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "expression")]
pub struct ExpressionFilter {
    pub expression: String,
}

// =============================================================================
// Typed column filters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "null")]
pub struct NullFilter {
    pub column: String,
}

/// Matches a column against a typed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "equality", rename_all = "camelCase")]
pub struct EqualityFilter {
    pub column: String,
    pub match_value_type: DataType,
    pub match_value: Value,
}

/// Typed range; bounds are inclusive unless marked open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "range", rename_all = "camelCase")]
pub struct RangeFilter {
    pub column: String,
    pub match_value_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_open: Option<bool>,
}

// =============================================================================
// Spatial filters
// =============================================================================

/// Shape a spatial filter matches against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SpatialBound {
    #[serde(rename_all = "camelCase")]
    Rectangular {
        min_coords: Vec<f64>,
        max_coords: Vec<f64>,
    },
    Radius { coords: Vec<f64>, radius: f64 },
    Polygon {
        abscissa: Vec<f64>,
        ordinate: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "spatial")]
pub struct SpatialFilter {
    pub dimension: String,
    pub bound: SpatialBound,
}

// =============================================================================
// Logical filters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "and")]
pub struct AndFilter {
    pub fields: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "or")]
pub struct OrFilter {
    pub fields: Vec<Filter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "not")]
pub struct NotFilter {
    pub field: Box<Filter>,
}

// =============================================================================
// Filter
// =============================================================================

/// Any row-level filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Selector(SelectorFilter),
    In(InFilter),
    Bound(BoundFilter),
    Interval(IntervalFilter),
    Like(LikeFilter),
    Regex(RegexFilter),
    Search(SearchFilter),
    ColumnComparison(ColumnComparisonFilter),
    Javascript(JavascriptFilter),
    Expression(ExpressionFilter),
    Null(NullFilter),
    Equality(EqualityFilter),
    Range(RangeFilter),
    Spatial(SpatialFilter),
    And(AndFilter),
    Or(OrFilter),
    Not(NotFilter),
}

impl Filter {
    pub fn selector(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Selector(SelectorFilter {
            dimension: dimension.into(),
            value: Some(value.into()),
            extraction_fn: None,
        })
    }

    /// Matches rows where the dimension is null.
    pub fn is_null_selector(dimension: impl Into<String>) -> Self {
        Filter::Selector(SelectorFilter {
            dimension: dimension.into(),
            value: None,
            extraction_fn: None,
        })
    }

    pub fn in_values<I, S>(dimension: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::In(InFilter {
            dimension: dimension.into(),
            values: values.into_iter().map(Into::into).collect(),
            extraction_fn: None,
        })
    }

    pub fn bound(dimension: impl Into<String>, operator: BoundOperator, value: impl Into<String>) -> Self {
        Filter::Bound(BoundFilter::new(dimension, operator, value))
    }

    pub fn between(dimension: impl Into<String>, min: impl Into<String>, max: impl Into<String>) -> Self {
        Filter::Bound(BoundFilter::between(dimension, min, max))
    }

    pub fn interval(dimension: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Filter::Interval(IntervalFilter {
            dimension: dimension.into(),
            intervals,
            extraction_fn: None,
        })
    }

    pub fn like(dimension: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Like(LikeFilter {
            dimension: dimension.into(),
            pattern: pattern.into(),
            escape: "\\".to_string(),
            extraction_fn: None,
        })
    }

    pub fn regex(dimension: impl Into<String>, pattern: impl Into<String>) -> Self {
        Filter::Regex(RegexFilter {
            dimension: dimension.into(),
            pattern: pattern.into(),
            extraction_fn: None,
        })
    }

    /// Search a dimension; a list input matches fragments.
    pub fn search(dimension: impl Into<String>, input: impl Into<SearchInput>, case_sensitive: bool) -> Self {
        Filter::Search(SearchFilter {
            dimension: dimension.into(),
            query: SearchQuerySpec::from_input(input, case_sensitive),
            extraction_fn: None,
        })
    }

    pub fn column_comparison(left: impl Into<DimensionSpec>, right: impl Into<DimensionSpec>) -> Self {
        Filter::ColumnComparison(ColumnComparisonFilter {
            dimensions: vec![left.into(), right.into()],
        })
    }

    pub fn javascript(dimension: impl Into<String>, function: impl Into<String>) -> Self {
        Filter::Javascript(JavascriptFilter {
            dimension: dimension.into(),
            function: function.into(),
            extraction_fn: None,
        })
    }

    pub fn expression(expression: impl Into<String>) -> Self {
        Filter::Expression(ExpressionFilter {
            expression: expression.into(),
        })
    }

    pub fn null(column: impl Into<String>) -> Self {
        Filter::Null(NullFilter {
            column: column.into(),
        })
    }

    pub fn equality(column: impl Into<String>, match_value_type: DataType, value: impl Into<Value>) -> Self {
        Filter::Equality(EqualityFilter {
            column: column.into(),
            match_value_type,
            match_value: value.into(),
        })
    }

    pub fn spatial(dimension: impl Into<String>, bound: SpatialBound) -> Self {
        Filter::Spatial(SpatialFilter {
            dimension: dimension.into(),
            bound,
        })
    }

    pub fn and(fields: Vec<Filter>) -> Self {
        Filter::And(AndFilter { fields })
    }

    pub fn or(fields: Vec<Filter>) -> Self {
        Filter::Or(OrFilter { fields })
    }

    pub fn not(field: Filter) -> Self {
        Filter::Not(NotFilter {
            field: Box::new(field),
        })
    }

    /// Combine with AND, appending to an existing AND instead of nesting.
    pub fn and_with(self, other: Filter) -> Self {
        match self {
            Filter::And(mut and) => {
                and.fields.push(other);
                Filter::And(and)
            }
            current => Filter::and(vec![current, other]),
        }
    }

    /// Combine with OR, appending to an existing OR instead of nesting.
    pub fn or_with(self, other: Filter) -> Self {
        match self {
            Filter::Or(mut or) => {
                or.fields.push(other);
                Filter::Or(or)
            }
            current => Filter::or(vec![current, other]),
        }
    }

    /// The `type` this filter serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            Filter::Selector(_) => "selector",
            Filter::In(_) => "in",
            Filter::Bound(_) => "bound",
            Filter::Interval(_) => "interval",
            Filter::Like(_) => "like",
            Filter::Regex(_) => "regex",
            Filter::Search(_) => "search",
            Filter::ColumnComparison(_) => "columnComparison",
            Filter::Javascript(_) => "javascript",
            Filter::Expression(_) => "expression",
            Filter::Null(_) => "null",
            Filter::Equality(_) => "equality",
            Filter::Range(_) => "range",
            Filter::Spatial(_) => "spatial",
            Filter::And(_) => "and",
            Filter::Or(_) => "or",
            Filter::Not(_) => "not",
        }
    }

    /// Attach an extraction function to filters that accept one.
    ///
    /// Filter types without an `extractionFn` are rejected.
    pub fn with_extraction(self, extraction_fn: impl Into<ExtractionFunction>) -> DruidResult<Self> {
        let extraction_fn = Some(extraction_fn.into());
        let filter = match self {
            Filter::Selector(mut f) => {
                f.extraction_fn = extraction_fn;
                Filter::Selector(f)
            }
            Filter::In(mut f) => {
                f.extraction_fn = extraction_fn;
                Filter::In(f)
            }
            Filter::Bound(mut f) => {
                f.extraction_fn = extraction_fn;
                Filter::Bound(f)
            }
            Filter::Interval(mut f) => {
                f.extraction_fn = extraction_fn;
                Filter::Interval(f)
            }
            Filter::Like(mut f) => {
                f.extraction_fn = extraction_fn;
                Filter::Like(f)
            }
            Filter::Regex(mut f) => {
                f.extraction_fn = extraction_fn;
                Filter::Regex(f)
            }
            Filter::Search(mut f) => {
                f.extraction_fn = extraction_fn;
                Filter::Search(f)
            }
            Filter::Javascript(mut f) => {
                f.extraction_fn = extraction_fn;
                Filter::Javascript(f)
            }
            other => {
                return Err(DruidError::InvalidArgument(format!(
                    "{} filters do not take an extraction function",
                    other.type_name()
                )))
            }
        };
        Ok(filter)
    }
}

impl From<BoundFilter> for Filter {
    fn from(value: BoundFilter) -> Self {
        Filter::Bound(value)
    }
}

impl From<RangeFilter> for Filter {
    fn from(value: RangeFilter) -> Self {
        Filter::Range(value)
    }
}
