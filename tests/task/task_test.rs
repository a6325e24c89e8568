//! Ingestion, kill and compaction task documents.

use druid_query::context::{TaskContext, TuningConfig};
use druid_query::spec::{Aggregator, Filter, ToJson};
use druid_query::task::{CompactTask, IndexTaskBuilder, InputFormat, InputSource, KillTask, Task};
use druid_query::types::{DataType, Granularity, Interval};
use serde_json::json;

fn day() -> Interval {
    Interval::parse("2015-09-12/2015-09-13").unwrap()
}

#[test]
fn test_parallel_index_task() {
    let task = IndexTaskBuilder::new(
        "wikipedia",
        InputSource::http(["https://example.com/wikiticker.json.gz"]),
    )
    .input_format(InputFormat::Json)
    .timestamp("time", "iso")
    .dimension("page")
    .typed_dimension("added", DataType::Long)
    .aggregate(Aggregator::count("edits"))
    .segment_granularity(Granularity::Day)
    .query_granularity(Granularity::Hour)
    .rollup(true)
    .interval(day())
    .build()
    .unwrap();

    assert_eq!(
        task.to_json().unwrap(),
        json!({
            "type": "index_parallel",
            "spec": {
                "dataSchema": {
                    "dataSource": "wikipedia",
                    "timestampSpec": {"column": "time", "format": "iso"},
                    "dimensionsSpec": {"dimensions": ["page", {"type": "long", "name": "added"}]},
                    "metricsSpec": [{"type": "count", "name": "edits"}],
                    "granularitySpec": {
                        "type": "uniform",
                        "segmentGranularity": "day",
                        "queryGranularity": "hour",
                        "rollup": true,
                        "intervals": ["2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z"]
                    }
                },
                "ioConfig": {
                    "type": "index_parallel",
                    "inputSource": {"type": "http", "uris": ["https://example.com/wikiticker.json.gz"]},
                    "inputFormat": {"type": "json"},
                    "appendToExisting": false
                },
                "tuningConfig": {"type": "index_parallel"}
            }
        })
    );
}

#[test]
fn test_reindex_defaults_to_time_column() {
    let source = InputSource::druid("wikipedia", day());
    let task = IndexTaskBuilder::new("wikipedia_rollup", source)
        .dimension("page")
        .aggregate(Aggregator::long_sum("added", "added"))
        .sequential()
        .task_id("reindex-1")
        .build()
        .unwrap();

    assert_eq!(task.kind, "index");
    let value = task.to_json().unwrap();
    assert_eq!(value["id"], "reindex-1");
    assert_eq!(
        value["spec"]["dataSchema"]["timestampSpec"],
        json!({"column": "__time", "format": "millis"})
    );
    assert_eq!(
        value["spec"]["ioConfig"]["inputSource"],
        json!({
            "type": "druid",
            "dataSource": "wikipedia",
            "interval": "2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z"
        })
    );
    assert!(value["spec"]["ioConfig"].get("inputFormat").is_none());
    assert_eq!(value["spec"]["tuningConfig"], json!({"type": "index"}));
}

#[test]
fn test_file_source_needs_input_format() {
    let err = IndexTaskBuilder::new("wikipedia", InputSource::local("/data/wiki", "*.csv"))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("input format"));

    let task = IndexTaskBuilder::new("wikipedia", InputSource::local("/data/wiki", "*.csv"))
        .input_format(InputFormat::csv_with_header())
        .build()
        .unwrap();
    assert_eq!(
        serde_json::to_value(&task.spec.io_config.input_format).unwrap(),
        json!({"type": "csv", "findColumnsFromHeader": true})
    );
    assert_eq!(
        serde_json::to_value(&task.spec.data_schema.timestamp_spec).unwrap(),
        json!({"column": "timestamp", "format": "auto"})
    );
}

#[test]
fn test_empty_datasource_is_rejected() {
    let result = IndexTaskBuilder::new(" ", InputSource::inline("{}"))
        .input_format(InputFormat::Json)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_transform_spec_only_when_used() {
    let plain = IndexTaskBuilder::new("wikipedia", InputSource::inline("{}"))
        .input_format(InputFormat::Json)
        .build()
        .unwrap();
    assert!(plain.spec.data_schema.transform_spec.is_none());

    let transformed = IndexTaskBuilder::new("wikipedia", InputSource::inline("{}"))
        .input_format(InputFormat::Json)
        .transform("page_lower", "lower(page)")
        .transform_filter(Filter::selector("country", "NZ"))
        .build()
        .unwrap();
    assert_eq!(
        serde_json::to_value(&transformed.spec.data_schema.transform_spec).unwrap(),
        json!({
            "transforms": [{"type": "expression", "name": "page_lower", "expression": "lower(page)"}],
            "filter": {"type": "selector", "dimension": "country", "value": "NZ"}
        })
    );
}

#[test]
fn test_explicit_tuning_type_is_kept() {
    let tuning = TuningConfig::for_task("index_parallel").set_max_num_concurrent_sub_tasks(4);
    let task = IndexTaskBuilder::new("wikipedia", InputSource::inline("{}"))
        .input_format(InputFormat::Json)
        .tuning_config(tuning)
        .context(TaskContext::new().set_priority(90))
        .build()
        .unwrap();
    let value = task.to_json().unwrap();
    assert_eq!(
        value["spec"]["tuningConfig"],
        json!({"type": "index_parallel", "maxNumConcurrentSubTasks": 4})
    );
    assert_eq!(value["context"], json!({"priority": 90}));
}

#[test]
fn test_kill_task() {
    let mut kill = KillTask::new("wikipedia", day());
    kill.batch_size = Some(100);
    assert_eq!(
        kill.to_json().unwrap(),
        json!({
            "type": "kill",
            "dataSource": "wikipedia",
            "interval": "2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z",
            "batchSize": 100
        })
    );
    assert_eq!(Task::from(kill).task_type(), "kill");
}

#[test]
fn test_compact_task() {
    let compact = CompactTask::new("wikipedia", day())
        .with_tuning_config(TuningConfig::new().set_max_rows_per_segment(5_000_000))
        .with_context(TaskContext::new().set_store_compaction_state(true));
    assert_eq!(
        compact.to_json().unwrap(),
        json!({
            "type": "compact",
            "dataSource": "wikipedia",
            "ioConfig": {
                "type": "compact",
                "inputSpec": {
                    "type": "interval",
                    "interval": "2015-09-12T00:00:00.000Z/2015-09-13T00:00:00.000Z"
                }
            },
            "tuningConfig": {"maxRowsPerSegment": 5000000},
            "context": {"storeCompactionState": true}
        })
    );

    let task = Task::from(compact);
    assert_eq!(task.task_type(), "compact");
    assert_eq!(task.id(), None);
}
