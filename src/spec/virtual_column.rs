//! Expression virtual columns.

use serde::Serialize;

use crate::types::DataType;

/// A column computed at query time from an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "expression", rename_all = "camelCase")]
pub struct VirtualColumn {
    pub name: String,
    pub expression: String,
    pub output_type: DataType,
}

impl VirtualColumn {
    /// A `float` virtual column, the engine's default output type.
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::typed(name, expression, DataType::Float)
    }

    pub fn typed(name: impl Into<String>, expression: impl Into<String>, output_type: DataType) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            output_type,
        }
    }
}
