//! Aggregators: how metric columns are rolled up.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::dimension::DimensionSpec;
use super::filter::Filter;
use crate::error::{DruidError, DruidResult};
use crate::types::DataType;

/// Default sketch size of `thetaSketch` aggregators.
pub const DEFAULT_THETA_SIZE: u32 = 16384;

// =============================================================================
// Typed aggregators (longSum, doubleMin, stringFirst, ...)
// =============================================================================

/// Aggregation function whose wire name is prefixed by the output type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Sum,
    Min,
    Max,
    First,
    Last,
    Any,
}

impl AggregateFunction {
    fn suffix(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "Sum",
            AggregateFunction::Min => "Min",
            AggregateFunction::Max => "Max",
            AggregateFunction::First => "First",
            AggregateFunction::Last => "Last",
            AggregateFunction::Any => "Any",
        }
    }

    /// Whether the engine offers a `string` variant of this function.
    fn supports_strings(&self) -> bool {
        matches!(
            self,
            AggregateFunction::First | AggregateFunction::Last | AggregateFunction::Any
        )
    }
}

/// `<type><Function>` aggregator over one column, e.g. `longSum`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TypedAggregator {
    pub function: AggregateFunction,
    pub output_type: DataType,
    pub name: String,
    pub field_name: String,
    pub max_string_bytes: Option<u32>,
}

impl TypedAggregator {
    pub fn new(
        function: AggregateFunction,
        output_type: DataType,
        name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> DruidResult<Self> {
        if output_type == DataType::String && !function.supports_strings() {
            return Err(DruidError::InvalidArgument(format!(
                "{} aggregations only support numeric types, got string",
                function.suffix().to_lowercase()
            )));
        }
        Ok(Self {
            function,
            output_type,
            name: name.into(),
            field_name: field_name.into(),
            max_string_bytes: None,
        })
    }

    /// Cap stored string length; only used by string first/last/any.
    pub fn max_string_bytes(mut self, bytes: u32) -> Self {
        self.max_string_bytes = Some(bytes);
        self
    }

    /// The wire discriminator, e.g. `doubleMax`.
    pub fn type_name(&self) -> String {
        format!("{}{}", self.output_type.as_str(), self.function.suffix())
    }
}

impl Serialize for TypedAggregator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.type_name())?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("fieldName", &self.field_name)?;
        if self.output_type == DataType::String {
            if let Some(bytes) = self.max_string_bytes {
                map.serialize_entry("maxStringBytes", &bytes)?;
            }
        }
        map.end()
    }
}

// =============================================================================
// Other aggregators
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "count")]
pub struct CountAggregator {
    pub name: String,
}

/// Estimates distinct values across one or more dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "cardinality", rename_all = "camelCase")]
pub struct CardinalityAggregator {
    pub name: String,
    pub fields: Vec<DimensionSpec>,
    pub by_row: bool,
    pub round: bool,
}

/// Distinct count through a theta sketch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "thetaSketch", rename_all = "camelCase")]
pub struct DistinctCountAggregator {
    pub name: String,
    pub field_name: String,
    pub is_input_theta_sketch: bool,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "hyperUnique", rename_all = "camelCase")]
pub struct HyperUniqueAggregator {
    pub name: String,
    pub field_name: String,
    pub is_input_hyper_unique: bool,
    pub round: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "javascript", rename_all = "camelCase")]
pub struct JavascriptAggregator {
    pub name: String,
    pub field_names: Vec<String>,
    pub fn_aggregate: String,
    pub fn_combine: String,
    pub fn_reset: String,
}

/// Aggregates only the rows matching a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "filtered")]
pub struct FilteredAggregator {
    pub filter: Filter,
    pub aggregator: Box<Aggregator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Quantile sketch over a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "quantilesDoublesSketch", rename_all = "camelCase")]
pub struct QuantilesSketchAggregator {
    pub name: String,
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stream_length: Option<u64>,
}

// =============================================================================
// Aggregator
// =============================================================================

/// Any aggregator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Aggregator {
    Count(CountAggregator),
    Typed(TypedAggregator),
    Cardinality(CardinalityAggregator),
    DistinctCount(DistinctCountAggregator),
    HyperUnique(HyperUniqueAggregator),
    Javascript(JavascriptAggregator),
    Filtered(FilteredAggregator),
    Quantiles(QuantilesSketchAggregator),
}

impl Aggregator {
    pub fn count(name: impl Into<String>) -> Self {
        Aggregator::Count(CountAggregator { name: name.into() })
    }

    pub fn sum(name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> DruidResult<Self> {
        TypedAggregator::new(AggregateFunction::Sum, output_type, name, field).map(Aggregator::Typed)
    }

    pub fn long_sum(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::any_type(AggregateFunction::Sum, DataType::Long, name, field)
    }

    pub fn double_sum(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::any_type(AggregateFunction::Sum, DataType::Double, name, field)
    }

    pub fn min(name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> DruidResult<Self> {
        TypedAggregator::new(AggregateFunction::Min, output_type, name, field).map(Aggregator::Typed)
    }

    pub fn max(name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> DruidResult<Self> {
        TypedAggregator::new(AggregateFunction::Max, output_type, name, field).map(Aggregator::Typed)
    }

    pub fn first(name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> Self {
        Self::any_type(AggregateFunction::First, output_type, name, field)
    }

    pub fn last(name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> Self {
        Self::any_type(AggregateFunction::Last, output_type, name, field)
    }

    pub fn any(name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> Self {
        Self::any_type(AggregateFunction::Any, output_type, name, field)
    }

    /// Typed aggregator without the string check; callers pass a valid pairing.
    fn any_type(
        function: AggregateFunction,
        output_type: DataType,
        name: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Aggregator::Typed(TypedAggregator {
            function,
            output_type,
            name: name.into(),
            field_name: field.into(),
            max_string_bytes: None,
        })
    }

    pub fn cardinality<I, D>(name: impl Into<String>, fields: I, by_row: bool, round: bool) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DimensionSpec>,
    {
        Aggregator::Cardinality(CardinalityAggregator {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            by_row,
            round,
        })
    }

    pub fn distinct_count(name: impl Into<String>, field: impl Into<String>, size: u32) -> Self {
        Aggregator::DistinctCount(DistinctCountAggregator {
            name: name.into(),
            field_name: field.into(),
            is_input_theta_sketch: false,
            size,
        })
    }

    pub fn hyper_unique(name: impl Into<String>, field: impl Into<String>, is_input_hyper_unique: bool, round: bool) -> Self {
        Aggregator::HyperUnique(HyperUniqueAggregator {
            name: name.into(),
            field_name: field.into(),
            is_input_hyper_unique,
            round,
        })
    }

    pub fn javascript<I, S>(
        name: impl Into<String>,
        field_names: I,
        fn_aggregate: impl Into<String>,
        fn_combine: impl Into<String>,
        fn_reset: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Aggregator::Javascript(JavascriptAggregator {
            name: name.into(),
            field_names: field_names.into_iter().map(Into::into).collect(),
            fn_aggregate: fn_aggregate.into(),
            fn_combine: fn_combine.into(),
            fn_reset: fn_reset.into(),
        })
    }

    /// Restrict this aggregator to rows matching `filter`.
    pub fn filtered(self, filter: Filter) -> Self {
        Aggregator::Filtered(FilteredAggregator {
            filter,
            aggregator: Box::new(self),
            name: None,
        })
    }

    pub fn quantiles(name: impl Into<String>, field: impl Into<String>, k: Option<u32>) -> Self {
        Aggregator::Quantiles(QuantilesSketchAggregator {
            name: name.into(),
            field_name: field.into(),
            k,
            max_stream_length: None,
        })
    }

    /// Output name of the aggregated column.
    pub fn name(&self) -> &str {
        match self {
            Aggregator::Count(a) => &a.name,
            Aggregator::Typed(a) => &a.name,
            Aggregator::Cardinality(a) => &a.name,
            Aggregator::DistinctCount(a) => &a.name,
            Aggregator::HyperUnique(a) => &a.name,
            Aggregator::Javascript(a) => &a.name,
            Aggregator::Filtered(a) => a.name.as_deref().unwrap_or_else(|| a.aggregator.name()),
            Aggregator::Quantiles(a) => &a.name,
        }
    }
}

impl From<TypedAggregator> for Aggregator {
    fn from(value: TypedAggregator) -> Self {
        Aggregator::Typed(value)
    }
}
