//! Native batch ingestion tasks.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::input::{InputFormat, InputSource};
use crate::collection::{AggregationCollection, IntervalCollection, TransformCollection};
use crate::context::{TaskContext, TuningConfig};
use crate::error::{DruidError, DruidResult};
use crate::spec::{Aggregator, Filter, GranularitySpec, Transform, TransformSpec};
use crate::types::{DataType, Granularity, Interval};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampSpec {
    pub column: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_value: Option<String>,
}

impl TimestampSpec {
    pub fn new(column: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            format: format.into(),
            missing_value: None,
        }
    }
}

/// A dimension column of the ingested schema.
///
/// String dimensions serialize as their bare name; other types as
/// `{type, name}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSchema {
    pub name: String,
    pub output_type: DataType,
}

impl Serialize for DimensionSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.output_type == DataType::String {
            return serializer.serialize_str(&self.name);
        }
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", &self.output_type)?;
        map.serialize_entry("name", &self.name)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionsSpec {
    pub dimensions: Vec<DimensionSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension_exclusions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSchema {
    pub data_source: String,
    pub timestamp_spec: TimestampSpec,
    pub dimensions_spec: DimensionsSpec,
    pub metrics_spec: AggregationCollection,
    pub granularity_spec: GranularitySpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform_spec: Option<TransformSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexIoConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub input_source: InputSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<InputFormat>,
    pub append_to_existing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSpec {
    pub data_schema: DataSchema,
    pub io_config: IndexIoConfig,
    pub tuning_config: TuningConfig,
}

/// `index` or `index_parallel` ingestion task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexTask {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub spec: IngestionSpec,
    #[serde(skip_serializing_if = "TaskContext::is_empty")]
    pub context: TaskContext,
}

/// Assembles an [`IndexTask`].
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until built"]
pub struct IndexTaskBuilder {
    data_source: String,
    input_source: InputSource,
    input_format: Option<InputFormat>,
    timestamp: Option<TimestampSpec>,
    dimensions: Vec<DimensionSchema>,
    metrics: AggregationCollection,
    segment_granularity: Granularity,
    query_granularity: Granularity,
    rollup: bool,
    intervals: IntervalCollection,
    transforms: TransformCollection,
    transform_filter: Option<Filter>,
    append_to_existing: bool,
    parallel: bool,
    task_id: Option<String>,
    tuning_config: TuningConfig,
    context: TaskContext,
}

impl IndexTaskBuilder {
    pub fn new(data_source: impl Into<String>, input_source: InputSource) -> Self {
        Self {
            data_source: data_source.into(),
            input_source,
            input_format: None,
            timestamp: None,
            dimensions: Vec::new(),
            metrics: AggregationCollection::new(),
            segment_granularity: Granularity::Day,
            query_granularity: Granularity::None,
            rollup: false,
            intervals: IntervalCollection::new(),
            transforms: TransformCollection::new(),
            transform_filter: None,
            append_to_existing: false,
            parallel: true,
            task_id: None,
            tuning_config: TuningConfig::new(),
            context: TaskContext::new(),
        }
    }

    pub fn timestamp(mut self, column: impl Into<String>, format: impl Into<String>) -> Self {
        self.timestamp = Some(TimestampSpec::new(column, format));
        self
    }

    pub fn dimension(self, name: impl Into<String>) -> Self {
        self.typed_dimension(name, DataType::String)
    }

    pub fn typed_dimension(mut self, name: impl Into<String>, output_type: DataType) -> Self {
        self.dimensions.push(DimensionSchema {
            name: name.into(),
            output_type,
        });
        self
    }

    pub fn aggregate(mut self, aggregator: Aggregator) -> Self {
        self.metrics.add(aggregator);
        self
    }

    pub fn segment_granularity(mut self, granularity: Granularity) -> Self {
        self.segment_granularity = granularity;
        self
    }

    pub fn query_granularity(mut self, granularity: Granularity) -> Self {
        self.query_granularity = granularity;
        self
    }

    pub fn rollup(mut self, rollup: bool) -> Self {
        self.rollup = rollup;
        self
    }

    pub fn interval(mut self, interval: Interval) -> Self {
        self.intervals.add(interval);
        self
    }

    pub fn transform(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.transforms.add(Transform::new(name, expression));
        self
    }

    /// Drop ingested rows that do not match `filter`.
    pub fn transform_filter(mut self, filter: Filter) -> Self {
        self.transform_filter = Some(filter);
        self
    }

    pub fn input_format(mut self, format: InputFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    pub fn append_to_existing(mut self, append: bool) -> Self {
        self.append_to_existing = append;
        self
    }

    /// Run as a single `index` task instead of `index_parallel`.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    pub fn tuning_config(mut self, tuning_config: TuningConfig) -> Self {
        self.tuning_config = tuning_config;
        self
    }

    pub fn context(mut self, context: TaskContext) -> Self {
        self.context = context;
        self
    }

    pub fn build(self) -> DruidResult<IndexTask> {
        if self.data_source.trim().is_empty() {
            return Err(DruidError::InvalidArgument(
                "ingestion tasks need a target datasource".to_string(),
            ));
        }
        if !self.input_source.is_reindex() && self.input_format.is_none() {
            return Err(DruidError::InvalidArgument(
                "an input format is required unless reading from a druid datasource".to_string(),
            ));
        }
        let kind = if self.parallel { "index_parallel" } else { "index" };

        let timestamp = self.timestamp.unwrap_or_else(|| {
            if self.input_source.is_reindex() {
                TimestampSpec::new("__time", "millis")
            } else {
                TimestampSpec::new("timestamp", "auto")
            }
        });
        let transform_spec = TransformSpec::new(self.transforms, self.transform_filter);
        let tuning_config = if self.tuning_config.kind().is_some() {
            self.tuning_config
        } else {
            self.tuning_config.set_kind(kind)
        };

        Ok(IndexTask {
            kind: kind.to_string(),
            id: self.task_id,
            spec: IngestionSpec {
                data_schema: DataSchema {
                    data_source: self.data_source,
                    timestamp_spec: timestamp,
                    dimensions_spec: DimensionsSpec {
                        dimensions: self.dimensions,
                        dimension_exclusions: Vec::new(),
                    },
                    metrics_spec: self.metrics,
                    granularity_spec: GranularitySpec::uniform(
                        self.segment_granularity,
                        self.query_granularity,
                        self.rollup,
                        self.intervals,
                    ),
                    transform_spec: (!transform_spec.is_empty()).then_some(transform_spec),
                },
                io_config: IndexIoConfig {
                    kind: kind.to_string(),
                    input_source: self.input_source,
                    input_format: self.input_format,
                    append_to_existing: self.append_to_existing,
                },
                tuning_config,
            },
            context: self.context,
        })
    }
}
