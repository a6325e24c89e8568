//! Query contexts, one per query type.

use super::value::{coerce_bool, coerce_float, coerce_int, coerce_string};

query_context! {
    /// Context keys shared by every query type.
    pub struct QueryContext {}
}

query_context! {
    /// Context of a groupBy query.
    pub struct GroupByQueryContext {
        group_by_strategy, set_group_by_strategy: String = coerce_string => "groupByStrategy";
        group_by_is_single_threaded, set_group_by_is_single_threaded: bool = coerce_bool => "groupByIsSingleThreaded";
        max_on_disk_storage, set_max_on_disk_storage: i64 = coerce_int => "maxOnDiskStorage";
        max_merging_dictionary_size, set_max_merging_dictionary_size: i64 = coerce_int => "maxMergingDictionarySize";
        max_selector_dictionary_size, set_max_selector_dictionary_size: i64 = coerce_int => "maxSelectorDictionarySize";
        max_results, set_max_results: i64 = coerce_int => "maxResults";
        buffer_grouper_initial_buckets, set_buffer_grouper_initial_buckets: i64 = coerce_int => "bufferGrouperInitialBuckets";
        buffer_grouper_max_load_factor, set_buffer_grouper_max_load_factor: f64 = coerce_float => "bufferGrouperMaxLoadFactor";
        force_hash_aggregation, set_force_hash_aggregation: bool = coerce_bool => "forceHashAggregation";
        intermediate_combine_degree, set_intermediate_combine_degree: i64 = coerce_int => "intermediateCombineDegree";
        num_parallel_combine_threads, set_num_parallel_combine_threads: i64 = coerce_int => "numParallelCombineThreads";
        sort_by_dims_first, set_sort_by_dims_first: bool = coerce_bool => "sortByDimsFirst";
        force_limit_push_down, set_force_limit_push_down: bool = coerce_bool => "forceLimitPushDown";
        apply_limit_push_down_to_segment, set_apply_limit_push_down_to_segment: bool = coerce_bool => "applyLimitPushDownToSegment";
    }
}

query_context! {
    /// Context of a topN query.
    pub struct TopNQueryContext {
        min_top_n_threshold, set_min_top_n_threshold: i64 = coerce_int => "minTopNThreshold";
    }
}

query_context! {
    /// Context of a timeseries query.
    pub struct TimeSeriesQueryContext {
        skip_empty_buckets, set_skip_empty_buckets: bool = coerce_bool => "skipEmptyBuckets";
        grand_total, set_grand_total: bool = coerce_bool => "grandTotal";
    }
}

query_context! {
    /// Context of a scan query.
    pub struct ScanQueryContext {
        max_rows_queued_for_ordering, set_max_rows_queued_for_ordering: i64 = coerce_int => "maxRowsQueuedForOrdering";
        max_segment_partitions_ordered_in_memory, set_max_segment_partitions_ordered_in_memory: i64 = coerce_int => "maxSegmentPartitionsOrderedInMemory";
    }
}

query_context! {
    /// Context of a search query.
    pub struct SearchQueryContext {
        search_strategy, set_search_strategy: String = coerce_string => "searchStrategy";
    }
}
