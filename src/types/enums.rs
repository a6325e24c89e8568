//! Closed vocabularies of the Druid query grammar.
//!
//! Each enum parses user input with its own case rule (lowercase for most
//! families, uppercase for join types) and serializes to the exact wire
//! string the engine expects.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{DruidError, DruidResult};

/// Find the member whose wire string equals the normalized input.
fn parse_member<T: Copy>(
    kind: &'static str,
    input: &str,
    normalized: &str,
    values: &[T],
    as_str: fn(&T) -> &'static str,
) -> DruidResult<T> {
    parse_member_by(kind, input, values, as_str, |wire| wire == normalized)
}

/// Find the first member whose wire string satisfies `matches`.
fn parse_member_by<T: Copy>(
    kind: &'static str,
    input: &str,
    values: &[T],
    as_str: fn(&T) -> &'static str,
    matches: impl Fn(&str) -> bool,
) -> DruidResult<T> {
    values
        .iter()
        .find(|member| matches(as_str(member)))
        .copied()
        .ok_or_else(|| {
            let allowed: Vec<&'static str> = values.iter().map(as_str).collect();
            DruidError::invalid_enum(kind, input, &allowed)
        })
}

// =============================================================================
// Granularity
// =============================================================================

/// Time bucketing resolution for segments and result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    All,
    None,
    Second,
    Minute,
    FifteenMinute,
    ThirtyMinute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    pub const VALUES: &'static [Granularity] = &[
        Granularity::All,
        Granularity::None,
        Granularity::Second,
        Granularity::Minute,
        Granularity::FifteenMinute,
        Granularity::ThirtyMinute,
        Granularity::Hour,
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Quarter,
        Granularity::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::All => "all",
            Granularity::None => "none",
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::FifteenMinute => "fifteen_minute",
            Granularity::ThirtyMinute => "thirty_minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
            Granularity::Year => "year",
        }
    }
}

impl FromStr for Granularity {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        parse_member("granularity", s, &normalized, Self::VALUES, Self::as_str)
    }
}

// =============================================================================
// Sorting order
// =============================================================================

/// Comparison used by bound filters, order-by columns and search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortingOrder {
    #[default]
    Lexicographic,
    Alphanumeric,
    Numeric,
    Strlen,
    Version,
}

impl SortingOrder {
    pub const VALUES: &'static [SortingOrder] = &[
        SortingOrder::Lexicographic,
        SortingOrder::Alphanumeric,
        SortingOrder::Numeric,
        SortingOrder::Strlen,
        SortingOrder::Version,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortingOrder::Lexicographic => "lexicographic",
            SortingOrder::Alphanumeric => "alphanumeric",
            SortingOrder::Numeric => "numeric",
            SortingOrder::Strlen => "strlen",
            SortingOrder::Version => "version",
        }
    }
}

impl FromStr for SortingOrder {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        parse_member("sorting order", s, &normalized, Self::VALUES, Self::as_str)
    }
}

// =============================================================================
// Order-by direction
// =============================================================================

/// Direction of an order-by column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderByDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderByDirection {
    pub const VALUES: &'static [OrderByDirection] =
        &[OrderByDirection::Ascending, OrderByDirection::Descending];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderByDirection::Ascending => "ascending",
            OrderByDirection::Descending => "descending",
        }
    }
}

impl FromStr for OrderByDirection {
    type Err = DruidError;

    /// Accepts the wire values plus the `asc`/`desc` shorthands.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "asc" => Ok(OrderByDirection::Ascending),
            "desc" => Ok(OrderByDirection::Descending),
            _ => parse_member("order direction", s, &normalized, Self::VALUES, Self::as_str),
        }
    }
}

// =============================================================================
// Join type
// =============================================================================

/// Join type of a join data source. The engine expects uppercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub const VALUES: &'static [JoinType] =
        &[JoinType::Inner, JoinType::Left, JoinType::Right, JoinType::Full];

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        }
    }
}

impl FromStr for JoinType {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        parse_member("join type", s, &normalized, Self::VALUES, Self::as_str)
    }
}

// =============================================================================
// Data type
// =============================================================================

/// Column value type used by typed aggregators, virtual columns and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Long,
    Float,
    Double,
}

impl DataType {
    pub const VALUES: &'static [DataType] =
        &[DataType::String, DataType::Long, DataType::Float, DataType::Double];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
        }
    }

    /// Whether this is one of the numeric types.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, DataType::String)
    }
}

impl FromStr for DataType {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        parse_member("data type", s, &normalized, Self::VALUES, Self::as_str)
    }
}

// =============================================================================
// Bound operator
// =============================================================================

/// Comparison operator of a one-sided bound filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundOperator {
    Gt,
    Ge,
    Lt,
    Le,
}

impl BoundOperator {
    pub const VALUES: &'static [BoundOperator] = &[
        BoundOperator::Gt,
        BoundOperator::Ge,
        BoundOperator::Lt,
        BoundOperator::Le,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoundOperator::Gt => ">",
            BoundOperator::Ge => ">=",
            BoundOperator::Lt => "<",
            BoundOperator::Le => "<=",
        }
    }

    /// Whether the operator bounds the value from below.
    pub fn is_lower(&self) -> bool {
        matches!(self, BoundOperator::Gt | BoundOperator::Ge)
    }

    /// Whether the bound excludes the value itself.
    pub fn is_strict(&self) -> bool {
        matches!(self, BoundOperator::Gt | BoundOperator::Lt)
    }
}

impl FromStr for BoundOperator {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        parse_member("bound operator", s, normalized, Self::VALUES, Self::as_str)
    }
}

// =============================================================================
// Arithmetic function
// =============================================================================

/// Function applied by an arithmetic post-aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArithmeticFunction {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "quotient")]
    Quotient,
    #[serde(rename = "pow")]
    Pow,
}

impl ArithmeticFunction {
    pub const VALUES: &'static [ArithmeticFunction] = &[
        ArithmeticFunction::Add,
        ArithmeticFunction::Subtract,
        ArithmeticFunction::Multiply,
        ArithmeticFunction::Divide,
        ArithmeticFunction::Quotient,
        ArithmeticFunction::Pow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArithmeticFunction::Add => "+",
            ArithmeticFunction::Subtract => "-",
            ArithmeticFunction::Multiply => "*",
            ArithmeticFunction::Divide => "/",
            ArithmeticFunction::Quotient => "quotient",
            ArithmeticFunction::Pow => "pow",
        }
    }
}

impl FromStr for ArithmeticFunction {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        parse_member("arithmetic function", s, &normalized, Self::VALUES, Self::as_str)
    }
}

// =============================================================================
// Scan query options
// =============================================================================

/// Row layout returned by a scan query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanResultFormat {
    #[default]
    List,
    CompactedList,
}

impl ScanResultFormat {
    pub const VALUES: &'static [ScanResultFormat] =
        &[ScanResultFormat::List, ScanResultFormat::CompactedList];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanResultFormat::List => "list",
            ScanResultFormat::CompactedList => "compactedList",
        }
    }
}

impl FromStr for ScanResultFormat {
    type Err = DruidError;

    /// Case-insensitive, so `compactedlist` reads as `compactedList`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        parse_member_by("scan result format", s, Self::VALUES, Self::as_str, |wire| {
            wire.eq_ignore_ascii_case(input)
        })
    }
}

/// Time ordering of scan query rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanOrder {
    Ascending,
    Descending,
    #[default]
    None,
}

impl ScanOrder {
    pub const VALUES: &'static [ScanOrder] =
        &[ScanOrder::Ascending, ScanOrder::Descending, ScanOrder::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanOrder::Ascending => "ascending",
            ScanOrder::Descending => "descending",
            ScanOrder::None => "none",
        }
    }
}

impl FromStr for ScanOrder {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        parse_member("scan order", s, &normalized, Self::VALUES, Self::as_str)
    }
}

macro_rules! display_as_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

display_as_str!(
    Granularity,
    SortingOrder,
    OrderByDirection,
    JoinType,
    DataType,
    BoundOperator,
    ArithmeticFunction,
    ScanResultFormat,
    ScanOrder,
);
