/// Declares a context struct with typed, optional recognized keys and a
/// passthrough bag for everything else.
///
/// Each field line reads `field, setter: Type = coerce_fn => "wireKey";`.
/// Recognized keys are emitted in declaration order, then passthrough keys.
macro_rules! context_struct {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $field:ident, $setter:ident : $ty:ty = $coerce:path => $key:literal; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct $name {
            $( $field: Option<$ty>, )*
            passthrough: serde_json::Map<String, serde_json::Value>,
        }

        impl $name {
            /// Wire names of the recognized keys, in output order.
            pub const KEYS: &'static [&'static str] = &[$($key),*];

            pub fn new() -> Self {
                Self::default()
            }

            /// Build from a raw mapping, validating recognized keys.
            pub fn from_map(map: serde_json::Map<String, serde_json::Value>) -> $crate::error::DruidResult<Self> {
                let mut context = Self::default();
                for (key, value) in map {
                    context.insert(&key, value)?;
                }
                Ok(context)
            }

            /// Set a key by name. Recognized keys are matched ignoring case
            /// and separators and coerced to their type; other keys are kept
            /// verbatim.
            pub fn insert(
                &mut self,
                key: &str,
                value: serde_json::Value,
            ) -> $crate::error::DruidResult<&mut Self> {
                let normalized = $crate::context::value::normalize_key(key);
                $(
                    if normalized == $crate::context::value::normalize_key($key) {
                        self.$field = Some($coerce($key, value)?);
                        return Ok(self);
                    }
                )*
                self.passthrough.insert(key.to_string(), value);
                Ok(self)
            }

            $(
                pub fn $field(&self) -> Option<&$ty> {
                    self.$field.as_ref()
                }

                pub fn $setter(mut self, value: impl Into<$ty>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )*

            /// Keys that are not recognized by this context type.
            pub fn passthrough(&self) -> &serde_json::Map<String, serde_json::Value> {
                &self.passthrough
            }

            pub fn is_empty(&self) -> bool {
                true $( && self.$field.is_none() )* && self.passthrough.is_empty()
            }

            pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
                let mut map = serde_json::Map::new();
                $(
                    if let Some(value) = &self.$field {
                        map.insert($key.to_string(), serde_json::Value::from(value.clone()));
                    }
                )*
                for (key, value) in &self.passthrough {
                    map.insert(key.clone(), value.clone());
                }
                map
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&self.to_map(), serializer)
            }
        }
    };
}

/// A query context: the keys every query type accepts plus its own.
macro_rules! query_context {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($extra:tt)*
        }
    ) => {
        context_struct! {
            $(#[$meta])*
            pub struct $name {
                timeout, set_timeout: i64 = coerce_int => "timeout";
                priority, set_priority: i64 = coerce_int => "priority";
                lane, set_lane: String = coerce_string => "lane";
                query_id, set_query_id: String = coerce_string => "queryId";
                broker_service, set_broker_service: String = coerce_string => "brokerService";
                use_cache, set_use_cache: bool = coerce_bool => "useCache";
                populate_cache, set_populate_cache: bool = coerce_bool => "populateCache";
                use_result_level_cache, set_use_result_level_cache: bool = coerce_bool => "useResultLevelCache";
                populate_result_level_cache, set_populate_result_level_cache: bool = coerce_bool => "populateResultLevelCache";
                by_segment, set_by_segment: bool = coerce_bool => "bySegment";
                finalize, set_finalize: bool = coerce_bool => "finalize";
                max_scatter_gather_bytes, set_max_scatter_gather_bytes: i64 = coerce_int => "maxScatterGatherBytes";
                max_queued_bytes, set_max_queued_bytes: i64 = coerce_int => "maxQueuedBytes";
                serialize_date_time_as_long, set_serialize_date_time_as_long: bool = coerce_bool => "serializeDateTimeAsLong";
                serialize_date_time_as_long_inner, set_serialize_date_time_as_long_inner: bool = coerce_bool => "serializeDateTimeAsLongInner";
                enable_parallel_merge, set_enable_parallel_merge: bool = coerce_bool => "enableParallelMerge";
                parallel_merge_parallelism, set_parallel_merge_parallelism: i64 = coerce_int => "parallelMergeParallelism";
                parallel_merge_initial_yield_rows, set_parallel_merge_initial_yield_rows: i64 = coerce_int => "parallelMergeInitialYieldRows";
                parallel_merge_small_batch_rows, set_parallel_merge_small_batch_rows: i64 = coerce_int => "parallelMergeSmallBatchRows";
                use_filter_cnf, set_use_filter_cnf: bool = coerce_bool => "useFilterCNF";
                secondary_partition_pruning, set_secondary_partition_pruning: bool = coerce_bool => "secondaryPartitionPruning";
                enable_join_filter_push_down, set_enable_join_filter_push_down: bool = coerce_bool => "enableJoinFilterPushDown";
                enable_join_filter_rewrite, set_enable_join_filter_rewrite: bool = coerce_bool => "enableJoinFilterRewrite";
                debug, set_debug: bool = coerce_bool => "debug";
                vectorize, set_vectorize: String = coerce_string => "vectorize";
                vector_size, set_vector_size: i64 = coerce_int => "vectorSize";
                vectorize_virtual_columns, set_vectorize_virtual_columns: String = coerce_string => "vectorizeVirtualColumns";
                $($extra)*
            }
        }
    };
}
