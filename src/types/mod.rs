//! Value types: closed enums and time intervals.

pub mod enums;
pub mod interval;

pub use enums::{
    ArithmeticFunction, BoundOperator, DataType, Granularity, JoinType, OrderByDirection,
    ScanOrder, ScanResultFormat, SortingOrder,
};
pub use interval::{Interval, IntervalBound, IntervalFormat};
