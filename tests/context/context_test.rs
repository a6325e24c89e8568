//! Typed contexts: validation, passthrough and key order.

use druid_query::context::{
    GroupByQueryContext, QueryContext, ScanQueryContext, TaskContext, TimeSeriesQueryContext,
    TopNQueryContext, TuningConfig,
};
use druid_query::DruidError;
use serde_json::{json, Map, Value};

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

#[test]
fn test_unknown_keys_are_echoed() {
    let context = QueryContext::from_map(map(json!({"myTeamTag": "growth", "timeout": 1000}))).unwrap();
    assert_eq!(context.timeout(), Some(&1000));
    assert_eq!(context.passthrough().get("myTeamTag"), Some(&json!("growth")));
    assert_eq!(
        serde_json::to_value(&context).unwrap(),
        json!({"timeout": 1000, "myTeamTag": "growth"})
    );
}

#[test]
fn test_wrong_shape_is_rejected() {
    let err = QueryContext::from_map(map(json!({"timeout": "soon"}))).unwrap_err();
    match &err {
        DruidError::InvalidContextValue { key, expected, value } => {
            assert_eq!(key, "timeout");
            assert_eq!(*expected, "integer");
            assert_eq!(value, &json!("soon"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_validation());
}

#[test]
fn test_out_of_range_integer_is_rejected() {
    let mut context = QueryContext::new();
    let err = context.insert("timeout", json!(1e30)).unwrap_err();
    assert!(matches!(err, DruidError::InvalidContextValue { .. }));
    assert_eq!(context.timeout(), None);
}

#[test]
fn test_loose_values_are_coerced() {
    let context = QueryContext::from_map(map(json!({
        "useCache": "false",
        "priority": "10",
        "queryId": 42,
        "maxScatterGatherBytes": 1e6
    })))
    .unwrap();
    assert_eq!(context.use_cache(), Some(&false));
    assert_eq!(context.priority(), Some(&10));
    assert_eq!(context.query_id().map(String::as_str), Some("42"));
    assert_eq!(context.max_scatter_gather_bytes(), Some(&1_000_000));
}

#[test]
fn test_type_specific_keys() {
    let group_by = GroupByQueryContext::from_map(map(json!({
        "sortByDimsFirst": true,
        "bufferGrouperMaxLoadFactor": 0.75
    })))
    .unwrap();
    assert_eq!(group_by.sort_by_dims_first(), Some(&true));
    assert_eq!(group_by.buffer_grouper_max_load_factor(), Some(&0.75));

    let top_n = TopNQueryContext::new().set_min_top_n_threshold(1000);
    assert_eq!(serde_json::to_value(&top_n).unwrap(), json!({"minTopNThreshold": 1000}));

    let timeseries = TimeSeriesQueryContext::new().set_skip_empty_buckets(true);
    assert_eq!(serde_json::to_value(&timeseries).unwrap(), json!({"skipEmptyBuckets": true}));
}

#[test]
fn test_key_known_to_other_type_is_passthrough() {
    let scan = ScanQueryContext::from_map(map(json!({"sortByDimsFirst": "yes"}))).unwrap();
    assert!(scan.passthrough().contains_key("sortByDimsFirst"));

    assert!(GroupByQueryContext::from_map(map(json!({"sortByDimsFirst": "yes"}))).is_err());
}

#[test]
fn test_common_keys_come_first() {
    let context = GroupByQueryContext::new()
        .set_max_results(500)
        .set_query_id("abc")
        .set_vectorize("force");
    let keys: Vec<String> = context.to_map().keys().cloned().collect();
    assert_eq!(keys, vec!["queryId", "vectorize", "maxResults"]);
    assert_eq!(GroupByQueryContext::KEYS[0], "timeout");
    assert!(GroupByQueryContext::KEYS.contains(&"applyLimitPushDownToSegment"));
}

#[test]
fn test_empty_context() {
    assert!(QueryContext::new().is_empty());
    assert!(!QueryContext::new().set_debug(true).is_empty());
    assert_eq!(serde_json::to_value(QueryContext::new()).unwrap(), json!({}));
}

#[test]
fn test_task_context() {
    let mut context = TaskContext::new().set_priority(75);
    context.insert("force_time_chunk_lock", json!(true)).unwrap();
    context.insert("custom", json!([1, 2])).unwrap();
    assert_eq!(
        serde_json::to_value(&context).unwrap(),
        json!({"forceTimeChunkLock": true, "priority": 75, "custom": [1, 2]})
    );
    assert!(context.insert("taskLockTimeout", json!({"ms": 1})).is_err());
}

#[test]
fn test_tuning_config() {
    let config = TuningConfig::for_task("index_parallel")
        .set_max_rows_in_memory(100_000)
        .set_partitions_spec(json!({"type": "hashed", "numShards": 4}))
        .set_force_guaranteed_rollup(true);
    assert_eq!(config.kind().map(String::as_str), Some("index_parallel"));
    assert_eq!(
        serde_json::to_value(&config).unwrap(),
        json!({
            "type": "index_parallel",
            "maxRowsInMemory": 100000,
            "partitionsSpec": {"type": "hashed", "numShards": 4},
            "forceGuaranteedRollup": true
        })
    );
}

#[test]
fn test_tuning_rejects_scalar_for_nested_spec() {
    let err = TuningConfig::from_map(map(json!({"indexSpec": 3}))).unwrap_err();
    assert!(err.to_string().contains("indexSpec"));
}
