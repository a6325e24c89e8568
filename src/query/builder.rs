//! Fluent assembly of query documents.

use serde_json::{Map, Value};

use super::types::{
    GroupByQuery, Query, ScanQuery, SearchQuery, SearchSort, SegmentMetadataQuery, TimeBoundary,
    TimeBoundaryQuery, TimeseriesQuery, TopNMetric, TopNQuery,
};
use crate::collection::{
    AggregationCollection, DimensionCollection, IntervalCollection, OrderByCollection,
    PostAggregationCollection, VirtualColumnCollection,
};
use crate::context::{
    GroupByQueryContext, QueryContext, ScanQueryContext, SearchQueryContext, TimeSeriesQueryContext,
    TopNQueryContext,
};
use crate::error::{DruidError, DruidResult};
use crate::spec::{
    Aggregator, DataSource, Dimension, DimensionSpec, Filter, HavingFilter, Limit, OrderBy,
    PostAggregator, SearchQuerySpec, VirtualColumn,
};
use crate::types::{
    BoundOperator, DataType, Granularity, Interval, OrderByDirection, ScanOrder, ScanResultFormat,
    SortingOrder,
};

/// Collects the parts of a query and turns them into a typed document.
///
/// Repeated `filter`/`where_*` calls are combined with AND and the `or_*`
/// variants with OR; `having` works the same way. The same builder can
/// produce several query types.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until built"]
pub struct QueryBuilder {
    data_source: DataSource,
    granularity: Granularity,
    intervals: IntervalCollection,
    dimensions: DimensionCollection,
    aggregations: AggregationCollection,
    post_aggregations: PostAggregationCollection,
    virtual_columns: VirtualColumnCollection,
    filter: Option<Filter>,
    having: Option<HavingFilter>,
    order_by: Vec<(String, OrderByDirection)>,
    limit: Option<u64>,
    offset: Option<u64>,
    subtotals: Option<Vec<Vec<String>>>,
    descending: bool,
    context: Map<String, Value>,
}

impl QueryBuilder {
    pub fn new(data_source: impl Into<DataSource>, granularity: Granularity) -> Self {
        Self {
            data_source: data_source.into(),
            granularity,
            intervals: IntervalCollection::new(),
            dimensions: DimensionCollection::new(),
            aggregations: AggregationCollection::new(),
            post_aggregations: PostAggregationCollection::new(),
            virtual_columns: VirtualColumnCollection::new(),
            filter: None,
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            subtotals: None,
            descending: false,
            context: Map::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Intervals and columns
    // -------------------------------------------------------------------------

    pub fn interval(mut self, interval: Interval) -> Self {
        self.intervals.add(interval);
        self
    }

    /// Add an interval given as `start/stop`.
    pub fn interval_str(self, interval: &str) -> DruidResult<Self> {
        Ok(self.interval(Interval::parse(interval)?))
    }

    pub fn select(mut self, dimension: impl Into<DimensionSpec>) -> Self {
        self.dimensions.add(dimension.into());
        self
    }

    pub fn select_as(self, dimension: impl Into<String>, output_name: impl Into<String>) -> Self {
        self.select(Dimension::new(dimension).with_output_name(output_name))
    }

    pub fn virtual_column(mut self, name: impl Into<String>, expression: impl Into<String>, output_type: DataType) -> Self {
        self.virtual_columns
            .add(VirtualColumn::typed(name, expression, output_type));
        self
    }

    // -------------------------------------------------------------------------
    // Aggregations
    // -------------------------------------------------------------------------

    pub fn aggregate(mut self, aggregator: Aggregator) -> Self {
        self.aggregations.add(aggregator);
        self
    }

    pub fn post_aggregate(mut self, post_aggregator: PostAggregator) -> Self {
        self.post_aggregations.add(post_aggregator);
        self
    }

    pub fn count(self, name: impl Into<String>) -> Self {
        self.aggregate(Aggregator::count(name))
    }

    pub fn long_sum(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(Aggregator::long_sum(name, field))
    }

    pub fn double_sum(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(Aggregator::double_sum(name, field))
    }

    pub fn sum(self, name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> DruidResult<Self> {
        Ok(self.aggregate(Aggregator::sum(name, field, output_type)?))
    }

    pub fn min(self, name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> DruidResult<Self> {
        Ok(self.aggregate(Aggregator::min(name, field, output_type)?))
    }

    pub fn max(self, name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> DruidResult<Self> {
        Ok(self.aggregate(Aggregator::max(name, field, output_type)?))
    }

    pub fn first(self, name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> Self {
        self.aggregate(Aggregator::first(name, field, output_type))
    }

    pub fn last(self, name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> Self {
        self.aggregate(Aggregator::last(name, field, output_type))
    }

    pub fn any(self, name: impl Into<String>, field: impl Into<String>, output_type: DataType) -> Self {
        self.aggregate(Aggregator::any(name, field, output_type))
    }

    pub fn distinct_count(self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.aggregate(Aggregator::distinct_count(
            name,
            field,
            crate::spec::aggregation::DEFAULT_THETA_SIZE,
        ))
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(current) => current.and_with(filter),
            None => filter,
        });
        self
    }

    pub fn or_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(current) => current.or_with(filter),
            None => filter,
        });
        self
    }

    /// Add `dimension <operator> value` with AND.
    ///
    /// Operators: `=`, `!=`, `<>`, `>`, `>=`, `<`, `<=`, `like`, `not like`,
    /// `regex`, `regexp`, `not regex`, `search`, `not search`, `javascript`.
    pub fn where_(self, dimension: &str, operator: &str, value: impl Into<String>) -> DruidResult<Self> {
        let filter = comparison_filter(dimension, operator, value.into())?;
        Ok(self.filter(filter))
    }

    /// Add `dimension <operator> value` with OR.
    pub fn or_where(self, dimension: &str, operator: &str, value: impl Into<String>) -> DruidResult<Self> {
        let filter = comparison_filter(dimension, operator, value.into())?;
        Ok(self.or_filter(filter))
    }

    pub fn where_in<I, S>(self, dimension: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(Filter::in_values(dimension, values))
    }

    pub fn where_not_in<I, S>(self, dimension: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter(Filter::not(Filter::in_values(dimension, values)))
    }

    pub fn where_between(self, dimension: impl Into<String>, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.filter(Filter::between(dimension, min, max))
    }

    pub fn where_interval(self, dimension: impl Into<String>, intervals: Vec<Interval>) -> Self {
        self.filter(Filter::interval(dimension, intervals))
    }

    pub fn where_column(self, left: impl Into<DimensionSpec>, right: impl Into<DimensionSpec>) -> Self {
        self.filter(Filter::column_comparison(left, right))
    }

    pub fn where_expression(self, expression: impl Into<String>) -> Self {
        self.filter(Filter::expression(expression))
    }

    pub fn where_null(self, column: impl Into<String>) -> Self {
        self.filter(Filter::null(column))
    }

    pub fn where_not_null(self, column: impl Into<String>) -> Self {
        self.filter(Filter::not(Filter::null(column)))
    }

    // -------------------------------------------------------------------------
    // Having
    // -------------------------------------------------------------------------

    pub fn having(mut self, having: impl Into<HavingFilter>) -> Self {
        let having = having.into();
        self.having = Some(match self.having.take() {
            Some(current) => current.and_with(having),
            None => having,
        });
        self
    }

    pub fn or_having(mut self, having: impl Into<HavingFilter>) -> Self {
        let having = having.into();
        self.having = Some(match self.having.take() {
            Some(current) => current.or_with(having),
            None => having,
        });
        self
    }

    /// Add `aggregation <operator> value` to the having clause with AND.
    ///
    /// Operators: `=`, `!=`, `<>`, `>`, `>=`, `<`, `<=`.
    pub fn having_cmp(self, aggregation: &str, operator: &str, value: f64) -> DruidResult<Self> {
        let having = match operator.trim() {
            "=" => HavingFilter::equal_to(aggregation, value),
            ">" => HavingFilter::greater_than(aggregation, value),
            "<" => HavingFilter::less_than(aggregation, value),
            ">=" => HavingFilter::or([
                HavingFilter::greater_than(aggregation, value),
                HavingFilter::equal_to(aggregation, value),
            ]),
            "<=" => HavingFilter::or([
                HavingFilter::less_than(aggregation, value),
                HavingFilter::equal_to(aggregation, value),
            ]),
            "!=" | "<>" => HavingFilter::not(HavingFilter::equal_to(aggregation, value)),
            other => {
                return Err(DruidError::InvalidArgument(format!(
                    "unsupported having operator {:?}",
                    other
                )))
            }
        };
        Ok(self.having(having))
    }

    // -------------------------------------------------------------------------
    // Ordering, limits and context
    // -------------------------------------------------------------------------

    /// Order by a dimension or metric. Metrics sort numerically; this is
    /// decided when the query is built, so aggregations may be added later.
    pub fn order_by(mut self, column: impl Into<String>, direction: OrderByDirection) -> Self {
        self.order_by.push((column.into(), direction));
        self
    }

    /// Like [`QueryBuilder::order_by`], parsing `asc`, `desc`, `ascending` or `descending`.
    pub fn order_by_str(self, column: impl Into<String>, direction: &str) -> DruidResult<Self> {
        let direction: OrderByDirection = direction.parse()?;
        Ok(self.order_by(column, direction))
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn subtotals(mut self, subtotals: Vec<Vec<String>>) -> Self {
        self.subtotals = Some(subtotals);
        self
    }

    pub fn descending(mut self, descending: bool) -> Self {
        self.descending = descending;
        self
    }

    /// Merge raw context keys. Keys every query type knows are validated here;
    /// type-specific keys are validated when the query is built.
    pub fn context(mut self, context: Map<String, Value>) -> DruidResult<Self> {
        QueryContext::from_map(context.clone())?;
        self.context.extend(context);
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------------

    pub fn timeseries(&self) -> DruidResult<TimeseriesQuery> {
        Ok(TimeseriesQuery {
            data_source: self.data_source.clone(),
            descending: self.descending,
            intervals: self.required_intervals()?,
            granularity: self.granularity,
            filter: self.filter.clone(),
            virtual_columns: self.virtual_columns.clone(),
            aggregations: self.aggregations.clone(),
            post_aggregations: self.post_aggregations.clone(),
            limit: self.limit,
            context: TimeSeriesQueryContext::from_map(self.context.clone())?,
        })
    }

    /// TopN over the single selected dimension, ranked by the first
    /// order-by column (or the first aggregation) and capped by the limit.
    pub fn top_n(&self) -> DruidResult<TopNQuery> {
        let dimension = match self.dimensions.len() {
            1 => self.dimensions[0].clone(),
            n => {
                return Err(DruidError::InvalidArgument(format!(
                    "topN queries need exactly one dimension, got {}",
                    n
                )))
            }
        };
        let threshold = self
            .limit
            .ok_or_else(|| DruidError::InvalidArgument("topN queries need a limit".to_string()))?;
        let metric = match self.order_by.first() {
            Some((column, OrderByDirection::Ascending)) => TopNMetric::numeric(column.clone()).inverted(),
            Some((column, OrderByDirection::Descending)) => TopNMetric::numeric(column.clone()),
            None => self
                .aggregations
                .get(0)
                .map(|agg| TopNMetric::numeric(agg.name()))
                .ok_or_else(|| DruidError::InvalidArgument("topN queries need a metric to rank by".to_string()))?,
        };
        Ok(TopNQuery {
            data_source: self.data_source.clone(),
            intervals: self.required_intervals()?,
            granularity: self.granularity,
            dimension,
            threshold,
            metric,
            filter: self.filter.clone(),
            virtual_columns: self.virtual_columns.clone(),
            aggregations: self.aggregations.clone(),
            post_aggregations: self.post_aggregations.clone(),
            context: TopNQueryContext::from_map(self.context.clone())?,
        })
    }

    pub fn group_by(&self) -> DruidResult<GroupByQuery> {
        let limit_spec = if self.limit.is_some() || self.offset.is_some() || !self.order_by.is_empty() {
            let mut limit = Limit::new(self.limit);
            if let Some(offset) = self.offset {
                limit.set_offset(offset);
            }
            for order in self.resolved_order_by() {
                limit.add_order_by(order);
            }
            Some(limit)
        } else {
            None
        };
        Ok(GroupByQuery {
            data_source: self.data_source.clone(),
            intervals: self.required_intervals()?,
            granularity: self.granularity,
            dimensions: self.dimensions.clone(),
            filter: self.filter.clone(),
            virtual_columns: self.virtual_columns.clone(),
            aggregations: self.aggregations.clone(),
            post_aggregations: self.post_aggregations.clone(),
            having: self.having.clone(),
            limit_spec,
            subtotals_spec: self.subtotals.clone(),
            context: GroupByQueryContext::from_map(self.context.clone())?,
        })
    }

    /// Raw rows; the selected dimensions become the returned columns.
    pub fn scan(&self) -> DruidResult<ScanQuery> {
        Ok(ScanQuery {
            data_source: self.data_source.clone(),
            intervals: self.required_intervals()?,
            result_format: ScanResultFormat::List,
            columns: self.dimensions.iter().map(|d| d.dimension().to_string()).collect(),
            filter: self.filter.clone(),
            virtual_columns: self.virtual_columns.clone(),
            batch_size: None,
            limit: self.limit,
            offset: self.offset,
            order: if self.descending {
                ScanOrder::Descending
            } else {
                ScanOrder::None
            },
            context: ScanQueryContext::from_map(self.context.clone())?,
        })
    }

    /// Search the selected dimensions (all dimensions when none are selected).
    pub fn search(&self, query: SearchQuerySpec, sort: SortingOrder) -> DruidResult<SearchQuery> {
        Ok(SearchQuery {
            data_source: self.data_source.clone(),
            intervals: self.required_intervals()?,
            granularity: self.granularity,
            search_dimensions: self.dimensions.clone(),
            query,
            sort: SearchSort { ordering: sort },
            filter: self.filter.clone(),
            virtual_columns: self.virtual_columns.clone(),
            limit: self.limit,
            context: SearchQueryContext::from_map(self.context.clone())?,
        })
    }

    pub fn segment_metadata(&self) -> DruidResult<SegmentMetadataQuery> {
        Ok(SegmentMetadataQuery {
            data_source: self.data_source.clone(),
            intervals: self.intervals.clone(),
            analysis_types: Vec::new(),
            merge: true,
            context: QueryContext::from_map(self.context.clone())?,
        })
    }

    pub fn time_boundary(&self, bound: Option<TimeBoundary>) -> DruidResult<TimeBoundaryQuery> {
        Ok(TimeBoundaryQuery {
            data_source: self.data_source.clone(),
            bound,
            filter: self.filter.clone(),
            context: QueryContext::from_map(self.context.clone())?,
        })
    }

    /// Pick the cheapest query type able to answer what was asked.
    ///
    /// No dimensions gives a timeseries. One dimension with a limit and a
    /// single order-by on a metric gives a topN. Everything else is a groupBy.
    pub fn build(&self) -> DruidResult<Query> {
        if self.dimensions.is_empty() {
            return self.timeseries().map(Query::from);
        }
        if self.is_top_n_shape() {
            return self.top_n().map(Query::from);
        }
        self.group_by().map(Query::from)
    }

    fn is_top_n_shape(&self) -> bool {
        self.dimensions.len() == 1
            && self.limit.is_some()
            && self.offset.is_none()
            && self.having.is_none()
            && self.subtotals.is_none()
            && self.order_by.len() == 1
            && self.is_metric(&self.order_by[0].0)
    }

    /// Order-by columns with their sort order: numeric for metrics,
    /// lexicographic for dimensions.
    fn resolved_order_by(&self) -> OrderByCollection {
        self.order_by
            .iter()
            .map(|(column, direction)| {
                let ordering = if self.is_metric(column) {
                    SortingOrder::Numeric
                } else {
                    SortingOrder::Lexicographic
                };
                OrderBy::new(column.clone(), *direction, ordering)
            })
            .collect()
    }

    fn is_metric(&self, column: &str) -> bool {
        self.aggregations.iter().any(|a| a.name() == column)
            || self.post_aggregations.iter().any(|p| p.name() == Some(column))
    }

    fn required_intervals(&self) -> DruidResult<IntervalCollection> {
        if self.intervals.is_empty() {
            return Err(DruidError::InvalidArgument(
                "at least one interval is required".to_string(),
            ));
        }
        Ok(self.intervals.clone())
    }
}

/// Translate an SQL-like comparison into a filter.
fn comparison_filter(dimension: &str, operator: &str, value: String) -> DruidResult<Filter> {
    let normalized = operator.trim().to_lowercase();
    let filter = match normalized.as_str() {
        "=" | "==" => Filter::selector(dimension, value),
        "!=" | "<>" => Filter::not(Filter::selector(dimension, value)),
        ">" | ">=" | "<" | "<=" => {
            let bound: BoundOperator = normalized.parse()?;
            Filter::bound(dimension, bound, value)
        }
        "like" => Filter::like(dimension, value),
        "not like" => Filter::not(Filter::like(dimension, value)),
        "regex" | "regexp" => Filter::regex(dimension, value),
        "not regex" | "not regexp" => Filter::not(Filter::regex(dimension, value)),
        "search" => Filter::search(dimension, value, false),
        "not search" => Filter::not(Filter::search(dimension, value, false)),
        "javascript" => Filter::javascript(dimension, value),
        _ => {
            return Err(DruidError::InvalidArgument(format!(
                "unsupported filter operator {:?}",
                operator
            )))
        }
    };
    Ok(filter)
}
