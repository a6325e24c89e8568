//! Context of ingestion, kill and compaction tasks.

use super::value::{coerce_bool, coerce_int};

context_struct! {
    /// Task-level settings read by the overlord.
    pub struct TaskContext {
        task_lock_timeout, set_task_lock_timeout: i64 = coerce_int => "taskLockTimeout";
        force_time_chunk_lock, set_force_time_chunk_lock: bool = coerce_bool => "forceTimeChunkLock";
        priority, set_priority: i64 = coerce_int => "priority";
        use_lineage_based_segment_allocation, set_use_lineage_based_segment_allocation: bool = coerce_bool => "useLineageBasedSegmentAllocation";
        store_compaction_state, set_store_compaction_state: bool = coerce_bool => "storeCompactionState";
        use_concurrent_locks, set_use_concurrent_locks: bool = coerce_bool => "useConcurrentLocks";
        store_empty_columns, set_store_empty_columns: bool = coerce_bool => "storeEmptyColumns";
    }
}
