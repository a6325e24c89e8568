//! Query documents and the builder that assembles them.

pub mod builder;
pub mod types;

pub use builder::QueryBuilder;
pub use types::{
    GroupByQuery, Query, ScanQuery, SearchQuery, SearchSort, SegmentMetadataQuery, TimeBoundary,
    TimeBoundaryQuery, TimeseriesQuery, TopNMetric, TopNQuery,
};
