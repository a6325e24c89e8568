//! Building blocks of query and task documents.
//!
//! Every type here is a value object that serializes to exactly one shape of
//! the engine's JSON grammar. Category enums (`Filter`, `Aggregator`, ...) are
//! untagged: each concrete struct writes its own discriminator.

pub mod aggregation;
pub mod data_source;
pub mod dimension;
pub mod extraction;
pub mod filter;
pub mod granularity;
pub mod having;
pub mod lookup;
pub mod order_by;
pub mod parse_spec;
pub mod post_aggregation;
pub mod search;
pub mod transform;
pub mod virtual_column;

use serde::Serialize;
use serde_json::Value;

use crate::error::DruidResult;

pub use aggregation::{AggregateFunction, Aggregator, TypedAggregator};
pub use data_source::DataSource;
pub use dimension::{Dimension, DimensionSpec, LookupDimension, LookupSource};
pub use extraction::{ExtractionFunction, MissingValue};
pub use filter::{BoundFilter, Filter, SpatialBound};
pub use granularity::GranularitySpec;
pub use having::{HavingFilter, NotHavingFilter};
pub use lookup::{LookupDefinition, LookupExtractorFactory};
pub use order_by::{Limit, OrderBy};
pub use parse_spec::ParseSpec;
pub use post_aggregation::PostAggregator;
pub use search::{SearchInput, SearchQuerySpec};
pub use transform::{Transform, TransformSpec};
pub use virtual_column::VirtualColumn;

/// Conversion to the JSON document sent to the engine.
pub trait ToJson {
    fn to_json(&self) -> DruidResult<Value>;
}

impl<T: Serialize + ?Sized> ToJson for T {
    fn to_json(&self) -> DruidResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
