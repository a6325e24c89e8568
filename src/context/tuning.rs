//! Tuning config of ingestion and compaction tasks.

use super::value::{coerce_bool, coerce_int, coerce_raw, coerce_string};

context_struct! {
    /// Performance knobs of an ingestion task.
    ///
    /// `partitionsSpec` and `indexSpec` are nested documents and are passed
    /// through as raw JSON after a shape check.
    pub struct TuningConfig {
        kind, set_kind: String = coerce_string => "type";
        max_rows_in_memory, set_max_rows_in_memory: i64 = coerce_int => "maxRowsInMemory";
        max_bytes_in_memory, set_max_bytes_in_memory: i64 = coerce_int => "maxBytesInMemory";
        max_total_rows, set_max_total_rows: i64 = coerce_int => "maxTotalRows";
        max_rows_per_segment, set_max_rows_per_segment: i64 = coerce_int => "maxRowsPerSegment";
        num_shards, set_num_shards: i64 = coerce_int => "numShards";
        split_hint_spec, set_split_hint_spec: serde_json::Value = coerce_raw => "splitHintSpec";
        partitions_spec, set_partitions_spec: serde_json::Value = coerce_raw => "partitionsSpec";
        index_spec, set_index_spec: serde_json::Value = coerce_raw => "indexSpec";
        index_spec_for_intermediate_persists, set_index_spec_for_intermediate_persists: serde_json::Value = coerce_raw => "indexSpecForIntermediatePersists";
        max_pending_persists, set_max_pending_persists: i64 = coerce_int => "maxPendingPersists";
        force_guaranteed_rollup, set_force_guaranteed_rollup: bool = coerce_bool => "forceGuaranteedRollup";
        report_parse_exceptions, set_report_parse_exceptions: bool = coerce_bool => "reportParseExceptions";
        push_timeout, set_push_timeout: i64 = coerce_int => "pushTimeout";
        max_num_concurrent_sub_tasks, set_max_num_concurrent_sub_tasks: i64 = coerce_int => "maxNumConcurrentSubTasks";
        max_retry, set_max_retry: i64 = coerce_int => "maxRetry";
        max_num_segments_to_merge, set_max_num_segments_to_merge: i64 = coerce_int => "maxNumSegmentsToMerge";
        total_num_merge_tasks, set_total_num_merge_tasks: i64 = coerce_int => "totalNumMergeTasks";
        task_status_check_period_ms, set_task_status_check_period_ms: i64 = coerce_int => "taskStatusCheckPeriodMs";
        chat_handler_timeout, set_chat_handler_timeout: String = coerce_string => "chatHandlerTimeout";
        chat_handler_num_retries, set_chat_handler_num_retries: i64 = coerce_int => "chatHandlerNumRetries";
        log_parse_exceptions, set_log_parse_exceptions: bool = coerce_bool => "logParseExceptions";
        max_parse_exceptions, set_max_parse_exceptions: i64 = coerce_int => "maxParseExceptions";
        max_saved_parse_exceptions, set_max_saved_parse_exceptions: i64 = coerce_int => "maxSavedParseExceptions";
    }
}

impl TuningConfig {
    /// Tuning config whose `type` matches the task it is attached to.
    pub fn for_task(kind: &str) -> Self {
        Self::new().set_kind(kind)
    }
}
