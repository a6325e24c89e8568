//! Ingestion-time transforms.

use serde::Serialize;

use super::filter::Filter;
use crate::collection::TransformCollection;

/// Adds or overwrites a column with the result of an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "expression")]
pub struct Transform {
    pub name: String,
    pub expression: String,
}

impl Transform {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }
}

/// Transforms applied to rows during ingestion, with an optional row filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TransformSpec {
    pub transforms: TransformCollection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
}

impl TransformSpec {
    pub fn new(transforms: TransformCollection, filter: Option<Filter>) -> Self {
        Self { transforms, filter }
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty() && self.filter.is_none()
    }
}
