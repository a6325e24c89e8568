//! Query documents produced by the builder.

use druid_query::query::{Query, QueryBuilder, TimeBoundary, TopNMetric};
use druid_query::spec::{Filter, PostAggregator, SearchQuerySpec, ToJson};
use druid_query::types::{ArithmeticFunction, DataType, Granularity, OrderByDirection, SortingOrder};
use druid_query::DruidError;
use serde_json::{json, Map, Value};

const INTERVAL: &str = "2019-04-15T00:00:00.000Z/2019-04-16T00:00:00.000Z";

fn wikipedia(granularity: Granularity) -> QueryBuilder {
    QueryBuilder::new("wikipedia", granularity)
        .interval_str(INTERVAL)
        .unwrap()
}

fn context(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn test_no_dimensions_builds_timeseries() {
    let query = wikipedia(Granularity::Hour)
        .count("edits")
        .where_("country", "=", "NZ")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(query.query_type(), "timeseries");
    assert_eq!(
        query.to_json().unwrap(),
        json!({
            "queryType": "timeseries",
            "dataSource": {"type": "table", "name": "wikipedia"},
            "descending": false,
            "intervals": [INTERVAL],
            "granularity": "hour",
            "filter": {"type": "selector", "dimension": "country", "value": "NZ"},
            "aggregations": [{"type": "count", "name": "edits"}]
        })
    );
}

#[test]
fn test_single_dimension_ranked_by_metric_builds_top_n() {
    let query = wikipedia(Granularity::All)
        .select("page")
        .long_sum("added", "added")
        .order_by("added", OrderByDirection::Descending)
        .limit(3)
        .build()
        .unwrap();
    assert_eq!(
        query.to_json().unwrap(),
        json!({
            "queryType": "topN",
            "dataSource": {"type": "table", "name": "wikipedia"},
            "intervals": [INTERVAL],
            "granularity": "all",
            "dimension": {"type": "default", "dimension": "page", "outputName": "page"},
            "threshold": 3,
            "metric": {"type": "numeric", "metric": "added"},
            "aggregations": [{"type": "longSum", "name": "added", "fieldName": "added"}]
        })
    );
}

#[test]
fn test_ascending_top_n_inverts_metric() {
    let query = wikipedia(Granularity::All)
        .select("page")
        .count("edits")
        .order_by("edits", OrderByDirection::Ascending)
        .limit(10)
        .top_n()
        .unwrap();
    assert_eq!(query.metric, TopNMetric::numeric("edits").inverted());
    assert_eq!(
        serde_json::to_value(&query.metric).unwrap(),
        json!({"type": "inverted", "metric": {"type": "numeric", "metric": "edits"}})
    );
}

#[test]
fn test_offset_forces_group_by() {
    let query = wikipedia(Granularity::Day)
        .select("country")
        .select_as("city", "City")
        .count("edits")
        .long_sum("added", "added")
        .where_("country", "!=", "NZ")
        .unwrap()
        .having_cmp("edits", ">=", 10.0)
        .unwrap()
        .order_by("edits", OrderByDirection::Descending)
        .limit(5)
        .offset(10)
        .build()
        .unwrap();
    assert!(matches!(query, Query::GroupBy(_)));
    assert_eq!(
        query.to_json().unwrap(),
        json!({
            "queryType": "groupBy",
            "dataSource": {"type": "table", "name": "wikipedia"},
            "intervals": [INTERVAL],
            "granularity": "day",
            "dimensions": [
                {"type": "default", "dimension": "country", "outputName": "country"},
                {"type": "default", "dimension": "city", "outputName": "City"}
            ],
            "filter": {"type": "not", "field": {"type": "selector", "dimension": "country", "value": "NZ"}},
            "aggregations": [
                {"type": "count", "name": "edits"},
                {"type": "longSum", "name": "added", "fieldName": "added"}
            ],
            "having": {
                "type": "or",
                "havingSpecs": [
                    {"type": "greaterThan", "aggregation": "edits", "value": 10.0},
                    {"type": "equalTo", "aggregation": "edits", "value": 10.0}
                ]
            },
            "limitSpec": {
                "type": "default",
                "columns": [{"dimension": "edits", "direction": "descending", "dimensionOrder": "numeric"}],
                "limit": 5,
                "offset": 10
            }
        })
    );
}

#[test]
fn test_order_by_dimension_builds_group_by() {
    let query = wikipedia(Granularity::All)
        .select("page")
        .count("edits")
        .order_by("page", OrderByDirection::Ascending)
        .limit(3)
        .build()
        .unwrap();
    match query {
        Query::GroupBy(group_by) => {
            let limit = group_by.limit_spec.unwrap();
            assert_eq!(limit.limit(), Some(3));
            let columns = limit.order_by().unwrap();
            assert_eq!(columns[0].dimension_order, SortingOrder::Lexicographic);
        }
        other => panic!("expected groupBy, got {}", other.query_type()),
    }
}

#[test]
fn test_order_by_may_precede_its_aggregation() {
    let group_by = wikipedia(Granularity::All)
        .select("country")
        .select("city")
        .order_by("edits", OrderByDirection::Descending)
        .count("edits")
        .group_by()
        .unwrap();
    let limit = group_by.limit_spec.unwrap();
    assert_eq!(limit.order_by().unwrap()[0].dimension_order, SortingOrder::Numeric);

    let query = wikipedia(Granularity::All)
        .select("page")
        .order_by("edits", OrderByDirection::Descending)
        .limit(5)
        .count("edits")
        .build()
        .unwrap();
    assert_eq!(query.query_type(), "topN");
}

#[test]
fn test_where_clauses_combine() {
    let query = wikipedia(Granularity::All)
        .where_("country", "=", "NZ")
        .unwrap()
        .where_("added", ">", "10")
        .unwrap()
        .or_where("page", "like", "Main%")
        .unwrap()
        .count("rows")
        .timeseries()
        .unwrap();
    assert_eq!(
        serde_json::to_value(query.filter.unwrap()).unwrap(),
        json!({
            "type": "or",
            "fields": [
                {
                    "type": "and",
                    "fields": [
                        {"type": "selector", "dimension": "country", "value": "NZ"},
                        {"type": "bound", "dimension": "added", "lower": "10", "lowerStrict": true, "ordering": "numeric"}
                    ]
                },
                {"type": "like", "dimension": "page", "pattern": "Main%", "escape": "\\"}
            ]
        })
    );
}

#[test]
fn test_where_helpers() {
    let query = wikipedia(Granularity::All)
        .where_not_in("country", ["NZ", "AU"])
        .where_between("added", "1", "100")
        .where_not_null("page")
        .timeseries()
        .unwrap();
    match query.filter.unwrap() {
        Filter::And(and) => {
            assert_eq!(and.fields.len(), 3);
            assert!(matches!(and.fields[0], Filter::Not(_)));
            assert!(matches!(and.fields[1], Filter::Bound(_)));
        }
        other => panic!("expected and filter, got {other:?}"),
    }
}

#[test]
fn test_unsupported_operators() {
    assert!(wikipedia(Granularity::All).where_("page", "~=", "x").is_err());
    assert!(wikipedia(Granularity::All).having_cmp("edits", "like", 1.0).is_err());
}

#[test]
fn test_having_not_equal() {
    let query = wikipedia(Granularity::All)
        .select("a")
        .select("b")
        .count("edits")
        .having_cmp("edits", "<>", 0.0)
        .unwrap()
        .group_by()
        .unwrap();
    assert_eq!(
        serde_json::to_value(query.having.unwrap()).unwrap(),
        json!({"type": "not", "havingSpec": {"type": "equalTo", "aggregation": "edits", "value": 0.0}})
    );
}

#[test]
fn test_post_aggregation_counts_as_metric() {
    let query = wikipedia(Granularity::All)
        .select("page")
        .long_sum("added", "added")
        .long_sum("deleted", "deleted")
        .post_aggregate(PostAggregator::arithmetic(
            "net",
            ArithmeticFunction::Subtract,
            vec![
                PostAggregator::field_access("added", "added"),
                PostAggregator::field_access("deleted", "deleted"),
            ],
        ))
        .order_by("net", OrderByDirection::Descending)
        .limit(5)
        .build()
        .unwrap();
    match query {
        Query::TopN(top_n) => assert_eq!(top_n.metric, TopNMetric::numeric("net")),
        other => panic!("expected topN, got {}", other.query_type()),
    }
}

#[test]
fn test_scan_query() {
    let query = wikipedia(Granularity::All)
        .select("page")
        .select("added")
        .virtual_column("delta", "added - deleted", DataType::Long)
        .limit(100)
        .descending(true)
        .scan()
        .unwrap();
    assert_eq!(
        serde_json::to_value(query).unwrap(),
        json!({
            "queryType": "scan",
            "dataSource": {"type": "table", "name": "wikipedia"},
            "intervals": [INTERVAL],
            "resultFormat": "list",
            "columns": ["page", "added"],
            "virtualColumns": [
                {"type": "expression", "name": "delta", "expression": "added - deleted", "outputType": "long"}
            ],
            "limit": 100,
            "order": "descending"
        })
    );
}

#[test]
fn test_search_query() {
    let query = wikipedia(Granularity::Day)
        .select("page")
        .search(SearchQuerySpec::contains("wiki", false), SortingOrder::Strlen)
        .unwrap();
    assert_eq!(
        serde_json::to_value(query).unwrap(),
        json!({
            "queryType": "search",
            "dataSource": {"type": "table", "name": "wikipedia"},
            "intervals": [INTERVAL],
            "granularity": "day",
            "searchDimensions": [{"type": "default", "dimension": "page", "outputName": "page"}],
            "query": {"type": "insensitive_contains", "value": "wiki"},
            "sort": {"type": "strlen"}
        })
    );
}

#[test]
fn test_metadata_queries_need_no_interval() {
    let builder = QueryBuilder::new("wikipedia", Granularity::All);
    assert_eq!(
        serde_json::to_value(builder.time_boundary(Some(TimeBoundary::MaxTime)).unwrap()).unwrap(),
        json!({
            "queryType": "timeBoundary",
            "dataSource": {"type": "table", "name": "wikipedia"},
            "bound": "maxTime"
        })
    );
    assert_eq!(
        serde_json::to_value(builder.segment_metadata().unwrap()).unwrap(),
        json!({
            "queryType": "segmentMetadata",
            "dataSource": {"type": "table", "name": "wikipedia"},
            "merge": true
        })
    );
}

#[test]
fn test_missing_interval_is_rejected() {
    let err = QueryBuilder::new("wikipedia", Granularity::All)
        .count("rows")
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("at least one interval is required"));
}

#[test]
fn test_top_n_requirements() {
    let no_limit = wikipedia(Granularity::All).select("page").count("edits").top_n();
    assert!(matches!(no_limit, Err(DruidError::InvalidArgument(_))));

    let two_dims = wikipedia(Granularity::All).select("a").select("b").limit(1).top_n();
    assert!(two_dims.is_err());
}

#[test]
fn test_context_is_validated() {
    let err = wikipedia(Granularity::All)
        .context(context(json!({"timeout": "later"})))
        .unwrap_err();
    assert!(matches!(err, DruidError::InvalidContextValue { .. }));

    let builder = wikipedia(Granularity::All)
        .select("a")
        .select("b")
        .context(context(json!({"sortByDimsFirst": "maybe", "queryId": "q-17"})))
        .unwrap();
    assert!(builder.group_by().is_err());

    let timeseries = builder.timeseries().unwrap();
    assert_eq!(timeseries.context.passthrough().get("sortByDimsFirst"), Some(&json!("maybe")));
    assert_eq!(Query::from(timeseries).query_id(), Some("q-17"));
}

#[test]
fn test_built_query_is_reusable_as_data_source() {
    let inner = wikipedia(Granularity::Hour).count("edits").build().unwrap();
    let outer = QueryBuilder::new(druid_query::spec::DataSource::query(inner), Granularity::Day)
        .interval_str(INTERVAL)
        .unwrap()
        .long_sum("edits", "edits")
        .timeseries()
        .unwrap();
    let value = serde_json::to_value(outer).unwrap();
    assert_eq!(value["dataSource"]["type"], "query");
    assert_eq!(value["dataSource"]["query"]["granularity"], "hour");
}
