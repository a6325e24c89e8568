//! Order-by columns and the `default` limit spec.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::collection::OrderByCollection;
use crate::types::{OrderByDirection, SortingOrder};

/// One sort column of a limit spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub dimension: String,
    pub direction: OrderByDirection,
    pub dimension_order: SortingOrder,
}

impl OrderBy {
    pub fn new(dimension: impl Into<String>, direction: OrderByDirection, dimension_order: SortingOrder) -> Self {
        Self {
            dimension: dimension.into(),
            direction,
            dimension_order,
        }
    }

    /// Ascending, lexicographic order on `dimension`.
    pub fn ascending(dimension: impl Into<String>) -> Self {
        Self::new(dimension, OrderByDirection::Ascending, SortingOrder::Lexicographic)
    }

    pub fn descending(dimension: impl Into<String>) -> Self {
        Self::new(dimension, OrderByDirection::Descending, SortingOrder::Lexicographic)
    }
}

/// Row cap, offset and ordering of a groupBy result.
///
/// Serializes as `{type: default, columns: [...]}` with `limit` and `offset`
/// present only when set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Limit {
    limit: Option<u64>,
    offset: Option<u64>,
    columns: Option<OrderByCollection>,
}

impl Limit {
    pub fn new(limit: Option<u64>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn with_order_by(limit: Option<u64>, columns: OrderByCollection) -> Self {
        Self {
            limit,
            offset: None,
            columns: Some(columns),
        }
    }

    pub fn set_limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn set_offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    pub fn add_order_by(&mut self, order_by: OrderBy) -> &mut Self {
        self.columns
            .get_or_insert_with(OrderByCollection::new)
            .add(order_by);
        self
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn order_by(&self) -> Option<&OrderByCollection> {
        self.columns.as_ref()
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "default")?;
        match &self.columns {
            Some(columns) => map.serialize_entry("columns", columns)?,
            None => map.serialize_entry("columns", &[] as &[OrderBy])?,
        }
        if let Some(limit) = self.limit {
            map.serialize_entry("limit", &limit)?;
        }
        if let Some(offset) = self.offset {
            map.serialize_entry("offset", &offset)?;
        }
        map.end()
    }
}
