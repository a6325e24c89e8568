//! Ordered, single-kind collections of spec objects.
//!
//! A collection accepts entries in three shapes: a finished item, a bare
//! name, or a `(name, value)` pair. How a name or pair becomes an item is
//! decided per element kind by [`CollectionItem`]; kinds that only make
//! sense prebuilt reject the other shapes with `InvalidCapability`.

use std::ops::Index;

use serde::Serialize;
use serde_json::Value;

use crate::error::{DruidError, DruidResult};
use crate::spec::{Aggregator, Dimension, DimensionSpec, OrderBy, PostAggregator, Transform, VirtualColumn};
use crate::types::{Interval, OrderByDirection};

pub type AggregationCollection = Collection<Aggregator>;
pub type DimensionCollection = Collection<DimensionSpec>;
pub type IntervalCollection = Collection<Interval>;
pub type OrderByCollection = Collection<OrderBy>;
pub type PostAggregationCollection = Collection<PostAggregator>;
pub type TransformCollection = Collection<Transform>;
pub type VirtualColumnCollection = Collection<VirtualColumn>;

/// An element kind a collection can build from loose input.
pub trait CollectionItem: Sized {
    /// Name used in `InvalidCapability` errors.
    const KIND: &'static str;

    fn from_name(name: &str) -> DruidResult<Self> {
        Err(DruidError::InvalidCapability {
            collection: Self::KIND,
            given: format!("name {:?}", name),
        })
    }

    fn from_pair(key: &str, value: &str) -> DruidResult<Self> {
        Err(DruidError::InvalidCapability {
            collection: Self::KIND,
            given: format!("pair {:?} => {:?}", key, value),
        })
    }
}

/// One bulk-construction input.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionEntry<T> {
    Prebuilt(T),
    ByName(String),
    Pair(String, String),
}

impl<T> CollectionEntry<T> {
    pub fn item(item: T) -> Self {
        CollectionEntry::Prebuilt(item)
    }
}

impl<T> From<&str> for CollectionEntry<T> {
    fn from(name: &str) -> Self {
        CollectionEntry::ByName(name.to_string())
    }
}

impl<T> From<String> for CollectionEntry<T> {
    fn from(name: String) -> Self {
        CollectionEntry::ByName(name)
    }
}

impl<T> From<(&str, &str)> for CollectionEntry<T> {
    fn from((key, value): (&str, &str)) -> Self {
        CollectionEntry::Pair(key.to_string(), value.to_string())
    }
}

impl<T> From<(String, String)> for CollectionEntry<T> {
    fn from((key, value): (String, String)) -> Self {
        CollectionEntry::Pair(key, value)
    }
}

/// Ordered list of spec objects of one kind. Serializes as a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: impl Into<T>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    /// By-value variant of [`Collection::add`] for chained construction.
    pub fn with(mut self, item: impl Into<T>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: CollectionItem> Collection<T> {
    /// Build a collection from mixed entries, preserving their order.
    pub fn make<I, E>(entries: I) -> DruidResult<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<CollectionEntry<T>>,
    {
        let items = entries
            .into_iter()
            .map(|entry| match entry.into() {
                CollectionEntry::Prebuilt(item) => Ok(item),
                CollectionEntry::ByName(name) => T::from_name(&name),
                CollectionEntry::Pair(key, value) => T::from_pair(&key, &value),
            })
            .collect::<DruidResult<Vec<_>>>()?;
        Ok(Self { items })
    }

    /// Build a collection from raw JSON.
    ///
    /// An array is read positionally (each string is a name); an object is
    /// read as `name => value` pairs in key order.
    pub fn from_value(value: &Value) -> DruidResult<Self> {
        let entries: Vec<CollectionEntry<T>> = match value {
            Value::Array(values) => values
                .iter()
                .map(|v| match v {
                    Value::String(name) => Ok(CollectionEntry::ByName(name.clone())),
                    other => Err(Self::unsupported(other)),
                })
                .collect::<DruidResult<_>>()?,
            Value::Object(map) => map
                .iter()
                .map(|(key, v)| match v {
                    Value::String(value) => Ok(CollectionEntry::Pair(key.clone(), value.clone())),
                    other => Err(Self::unsupported(other)),
                })
                .collect::<DruidResult<_>>()?,
            other => return Err(Self::unsupported(other)),
        };
        Self::make(entries)
    }

    fn unsupported(value: &Value) -> DruidError {
        DruidError::InvalidCapability {
            collection: T::KIND,
            given: value.to_string(),
        }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Index<usize> for Collection<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

// =============================================================================
// Element kinds
// =============================================================================

impl CollectionItem for Interval {
    const KIND: &'static str = "interval";

    fn from_name(name: &str) -> DruidResult<Self> {
        Interval::parse(name)
    }

    fn from_pair(start: &str, stop: &str) -> DruidResult<Self> {
        Interval::new(start, stop)
    }
}

impl CollectionItem for DimensionSpec {
    const KIND: &'static str = "dimension";

    fn from_name(name: &str) -> DruidResult<Self> {
        Ok(Dimension::new(name).into())
    }

    fn from_pair(dimension: &str, output_name: &str) -> DruidResult<Self> {
        Ok(Dimension::new(dimension).with_output_name(output_name).into())
    }
}

impl CollectionItem for OrderBy {
    const KIND: &'static str = "order by";

    fn from_name(dimension: &str) -> DruidResult<Self> {
        Ok(OrderBy::ascending(dimension))
    }

    fn from_pair(dimension: &str, direction: &str) -> DruidResult<Self> {
        let direction: OrderByDirection = direction.parse()?;
        Ok(OrderBy::new(dimension, direction, Default::default()))
    }
}

impl CollectionItem for Transform {
    const KIND: &'static str = "transform";

    fn from_pair(name: &str, expression: &str) -> DruidResult<Self> {
        Ok(Transform::new(name, expression))
    }
}

impl CollectionItem for VirtualColumn {
    const KIND: &'static str = "virtual column";

    fn from_pair(name: &str, expression: &str) -> DruidResult<Self> {
        Ok(VirtualColumn::new(name, expression))
    }
}

impl CollectionItem for Aggregator {
    const KIND: &'static str = "aggregation";
}

impl CollectionItem for PostAggregator {
    const KIND: &'static str = "post aggregation";
}
