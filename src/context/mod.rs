//! Context and tuning-config dictionaries.
//!
//! Recognized keys are typed and validated when set; unknown keys are kept
//! and echoed back unchanged, after the recognized ones.

#[macro_use]
mod macros;

pub mod query;
pub mod task;
pub mod tuning;
pub mod value;

pub use query::{
    GroupByQueryContext, QueryContext, ScanQueryContext, SearchQueryContext, TimeSeriesQueryContext,
    TopNQueryContext,
};
pub use task::TaskContext;
pub use tuning::TuningConfig;
