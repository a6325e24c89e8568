//! Query envelopes for every supported query type.

use serde::Serialize;

use crate::collection::{
    AggregationCollection, DimensionCollection, IntervalCollection, PostAggregationCollection,
    VirtualColumnCollection,
};
use crate::context::{
    GroupByQueryContext, QueryContext, ScanQueryContext, SearchQueryContext, TimeSeriesQueryContext,
    TopNQueryContext,
};
use crate::spec::{DataSource, DimensionSpec, Filter, HavingFilter, Limit, SearchQuerySpec};
use crate::types::{Granularity, ScanOrder, ScanResultFormat, SortingOrder};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", rename = "timeseries", rename_all = "camelCase")]
pub struct TimeseriesQuery {
    pub data_source: DataSource,
    pub descending: bool,
    pub intervals: IntervalCollection,
    pub granularity: Granularity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "VirtualColumnCollection::is_empty")]
    pub virtual_columns: VirtualColumnCollection,
    #[serde(skip_serializing_if = "AggregationCollection::is_empty")]
    pub aggregations: AggregationCollection,
    #[serde(skip_serializing_if = "PostAggregationCollection::is_empty")]
    pub post_aggregations: PostAggregationCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "TimeSeriesQueryContext::is_empty")]
    pub context: TimeSeriesQueryContext,
}

/// How a topN query ranks dimension values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TopNMetric {
    /// Highest values of an aggregated metric first.
    Numeric { metric: String },
    /// Dimension values in the given order.
    #[serde(rename_all = "camelCase")]
    Dimension {
        ordering: SortingOrder,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous_stop: Option<String>,
    },
    /// Reverse of the wrapped ordering.
    Inverted { metric: Box<TopNMetric> },
}

impl TopNMetric {
    pub fn numeric(metric: impl Into<String>) -> Self {
        TopNMetric::Numeric { metric: metric.into() }
    }

    pub fn inverted(self) -> Self {
        match self {
            TopNMetric::Inverted { metric } => *metric,
            other => TopNMetric::Inverted {
                metric: Box::new(other),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", rename = "topN", rename_all = "camelCase")]
pub struct TopNQuery {
    pub data_source: DataSource,
    pub intervals: IntervalCollection,
    pub granularity: Granularity,
    pub dimension: DimensionSpec,
    pub threshold: u64,
    pub metric: TopNMetric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "VirtualColumnCollection::is_empty")]
    pub virtual_columns: VirtualColumnCollection,
    #[serde(skip_serializing_if = "AggregationCollection::is_empty")]
    pub aggregations: AggregationCollection,
    #[serde(skip_serializing_if = "PostAggregationCollection::is_empty")]
    pub post_aggregations: PostAggregationCollection,
    #[serde(skip_serializing_if = "TopNQueryContext::is_empty")]
    pub context: TopNQueryContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", rename = "groupBy", rename_all = "camelCase")]
pub struct GroupByQuery {
    pub data_source: DataSource,
    pub intervals: IntervalCollection,
    pub granularity: Granularity,
    pub dimensions: DimensionCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "VirtualColumnCollection::is_empty")]
    pub virtual_columns: VirtualColumnCollection,
    #[serde(skip_serializing_if = "AggregationCollection::is_empty")]
    pub aggregations: AggregationCollection,
    #[serde(skip_serializing_if = "PostAggregationCollection::is_empty")]
    pub post_aggregations: PostAggregationCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub having: Option<HavingFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_spec: Option<Limit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotals_spec: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "GroupByQueryContext::is_empty")]
    pub context: GroupByQueryContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", rename = "scan", rename_all = "camelCase")]
pub struct ScanQuery {
    pub data_source: DataSource,
    pub intervals: IntervalCollection,
    pub result_format: ScanResultFormat,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "VirtualColumnCollection::is_empty")]
    pub virtual_columns: VirtualColumnCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    pub order: ScanOrder,
    #[serde(skip_serializing_if = "ScanQueryContext::is_empty")]
    pub context: ScanQueryContext,
}

/// Ordering of search hits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchSort {
    #[serde(rename = "type")]
    pub ordering: SortingOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", rename = "search", rename_all = "camelCase")]
pub struct SearchQuery {
    pub data_source: DataSource,
    pub intervals: IntervalCollection,
    pub granularity: Granularity,
    #[serde(skip_serializing_if = "DimensionCollection::is_empty")]
    pub search_dimensions: DimensionCollection,
    pub query: SearchQuerySpec,
    pub sort: SearchSort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "VirtualColumnCollection::is_empty")]
    pub virtual_columns: VirtualColumnCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "SearchQueryContext::is_empty")]
    pub context: SearchQueryContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", rename = "segmentMetadata", rename_all = "camelCase")]
pub struct SegmentMetadataQuery {
    pub data_source: DataSource,
    #[serde(skip_serializing_if = "IntervalCollection::is_empty")]
    pub intervals: IntervalCollection,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub analysis_types: Vec<String>,
    pub merge: bool,
    #[serde(skip_serializing_if = "QueryContext::is_empty")]
    pub context: QueryContext,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeBoundary {
    MaxTime,
    MinTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "queryType", rename = "timeBoundary", rename_all = "camelCase")]
pub struct TimeBoundaryQuery {
    pub data_source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<TimeBoundary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "QueryContext::is_empty")]
    pub context: QueryContext,
}

/// Any query document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Query {
    Timeseries(TimeseriesQuery),
    TopN(TopNQuery),
    GroupBy(GroupByQuery),
    Scan(ScanQuery),
    Search(SearchQuery),
    SegmentMetadata(SegmentMetadataQuery),
    TimeBoundary(TimeBoundaryQuery),
}

impl Query {
    /// The `queryType` discriminator.
    pub fn query_type(&self) -> &'static str {
        match self {
            Query::Timeseries(_) => "timeseries",
            Query::TopN(_) => "topN",
            Query::GroupBy(_) => "groupBy",
            Query::Scan(_) => "scan",
            Query::Search(_) => "search",
            Query::SegmentMetadata(_) => "segmentMetadata",
            Query::TimeBoundary(_) => "timeBoundary",
        }
    }

    pub fn data_source(&self) -> &DataSource {
        match self {
            Query::Timeseries(q) => &q.data_source,
            Query::TopN(q) => &q.data_source,
            Query::GroupBy(q) => &q.data_source,
            Query::Scan(q) => &q.data_source,
            Query::Search(q) => &q.data_source,
            Query::SegmentMetadata(q) => &q.data_source,
            Query::TimeBoundary(q) => &q.data_source,
        }
    }

    /// The `queryId` set in the query's context, used to cancel it.
    pub fn query_id(&self) -> Option<&str> {
        let id = match self {
            Query::Timeseries(q) => q.context.query_id(),
            Query::TopN(q) => q.context.query_id(),
            Query::GroupBy(q) => q.context.query_id(),
            Query::Scan(q) => q.context.query_id(),
            Query::Search(q) => q.context.query_id(),
            Query::SegmentMetadata(q) => q.context.query_id(),
            Query::TimeBoundary(q) => q.context.query_id(),
        };
        id.map(String::as_str)
    }
}

macro_rules! impl_into_query {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Query {
                fn from(query: $ty) -> Self {
                    Query::$variant(query)
                }
            }
        )*
    };
}

impl_into_query! {
    Timeseries => TimeseriesQuery,
    TopN => TopNQuery,
    GroupBy => GroupByQuery,
    Scan => ScanQuery,
    Search => SearchQuery,
    SegmentMetadata => SegmentMetadataQuery,
    TimeBoundary => TimeBoundaryQuery,
}
