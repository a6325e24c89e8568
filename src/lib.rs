//! # druid-query
//!
//! Typed building blocks for Apache Druid query and ingestion documents,
//! plus an async HTTP client to submit them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        types: enums (Granularity, JoinType, ...)        │
//! │               and Interval                              │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │   spec: filters, aggregators, having, dimensions,       │
//! │   extraction fns, data sources, limits, lookups         │
//! │   collection: ordered, single-kind lists                │
//! │   context: typed context / tuning dictionaries          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │   query: QueryBuilder -> timeseries/topN/groupBy/...    │
//! │   task: index_parallel, kill, compact                   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [serde_json]
//! ┌─────────────────────────────────────────────────────────┐
//! │   client: broker / overlord / coordinator over HTTP     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every document validates eagerly: bad enum values, reversed intervals
//! and wrong-typed context values fail when they are set, so anything that
//! exists serializes to a valid request.

pub mod client;
pub mod collection;
pub mod config;
pub mod context;
pub mod error;
pub mod query;
pub mod spec;
pub mod task;
pub mod types;

pub use error::{DruidError, DruidResult};

/// Commonly used types.
pub mod prelude {
    pub use crate::client::{DruidClient, QueryResponse, TaskState, TaskStatus};
    pub use crate::collection::{
        AggregationCollection, Collection, CollectionEntry, DimensionCollection, IntervalCollection,
        OrderByCollection, TransformCollection, VirtualColumnCollection,
    };
    pub use crate::config::Settings;
    pub use crate::context::{
        GroupByQueryContext, QueryContext, ScanQueryContext, TaskContext, TimeSeriesQueryContext,
        TopNQueryContext, TuningConfig,
    };
    pub use crate::error::{DruidError, DruidResult};
    pub use crate::query::{Query, QueryBuilder};
    pub use crate::spec::{
        Aggregator, DataSource, Dimension, DimensionSpec, ExtractionFunction, Filter, GranularitySpec,
        HavingFilter, Limit, OrderBy, PostAggregator, ToJson, Transform, TransformSpec, VirtualColumn,
    };
    pub use crate::task::{CompactTask, IndexTaskBuilder, InputFormat, InputSource, KillTask, Task};
    pub use crate::types::{
        BoundOperator, DataType, Granularity, Interval, JoinType, OrderByDirection, SortingOrder,
    };
}
