//! Post-aggregators: values computed from aggregated columns.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{DruidError, DruidResult};
use crate::types::{ArithmeticFunction, DataType};

/// Reads an aggregated column, optionally finalizing sketches.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccessPostAggregator {
    pub name: String,
    pub field_name: String,
    pub finalizing: bool,
}

impl Serialize for FieldAccessPostAggregator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let kind = if self.finalizing {
            "finalizingFieldAccess"
        } else {
            "fieldAccess"
        };
        map.serialize_entry("type", kind)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("fieldName", &self.field_name)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "constant")]
pub struct ConstantPostAggregator {
    pub name: String,
    pub value: f64,
}

/// Applies `fn` left to right over its fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "arithmetic")]
pub struct ArithmeticPostAggregator {
    pub name: String,
    #[serde(rename = "fn")]
    pub function: ArithmeticFunction,
    pub fields: Vec<PostAggregator>,
    /// `numericFirst` sorts nulls and NaN last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "expression")]
pub struct ExpressionPostAggregator {
    pub name: String,
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

/// `doubleGreatest`, `longLeast` and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct GreatestLeastPostAggregator {
    pub name: String,
    pub fields: Vec<PostAggregator>,
    pub output_type: DataType,
    pub greatest: bool,
}

impl Serialize for GreatestLeastPostAggregator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let suffix = if self.greatest { "Greatest" } else { "Least" };
        map.serialize_entry("type", &format!("{}{}", self.output_type.as_str(), suffix))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("fields", &self.fields)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "hyperUniqueCardinality", rename_all = "camelCase")]
pub struct HyperUniqueCardinalityPostAggregator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub field_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "javascript", rename_all = "camelCase")]
pub struct JavascriptPostAggregator {
    pub name: String,
    pub field_names: Vec<String>,
    pub function: String,
}

/// Any post-aggregator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PostAggregator {
    FieldAccess(FieldAccessPostAggregator),
    Constant(ConstantPostAggregator),
    Arithmetic(ArithmeticPostAggregator),
    Expression(ExpressionPostAggregator),
    GreatestLeast(GreatestLeastPostAggregator),
    HyperUniqueCardinality(HyperUniqueCardinalityPostAggregator),
    Javascript(JavascriptPostAggregator),
}

impl PostAggregator {
    pub fn field_access(name: impl Into<String>, field_name: impl Into<String>) -> Self {
        PostAggregator::FieldAccess(FieldAccessPostAggregator {
            name: name.into(),
            field_name: field_name.into(),
            finalizing: false,
        })
    }

    pub fn finalizing_field_access(name: impl Into<String>, field_name: impl Into<String>) -> Self {
        PostAggregator::FieldAccess(FieldAccessPostAggregator {
            name: name.into(),
            field_name: field_name.into(),
            finalizing: true,
        })
    }

    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        PostAggregator::Constant(ConstantPostAggregator {
            name: name.into(),
            value,
        })
    }

    pub fn arithmetic(name: impl Into<String>, function: ArithmeticFunction, fields: Vec<PostAggregator>) -> Self {
        PostAggregator::Arithmetic(ArithmeticPostAggregator {
            name: name.into(),
            function,
            fields,
            ordering: None,
        })
    }

    pub fn expression(name: impl Into<String>, expression: impl Into<String>) -> Self {
        PostAggregator::Expression(ExpressionPostAggregator {
            name: name.into(),
            expression: expression.into(),
            ordering: None,
        })
    }

    /// Largest of `fields`; only `long` and `double` are supported.
    pub fn greatest(name: impl Into<String>, fields: Vec<PostAggregator>, output_type: DataType) -> DruidResult<Self> {
        Self::greatest_least(name, fields, output_type, true)
    }

    /// Smallest of `fields`; only `long` and `double` are supported.
    pub fn least(name: impl Into<String>, fields: Vec<PostAggregator>, output_type: DataType) -> DruidResult<Self> {
        Self::greatest_least(name, fields, output_type, false)
    }

    fn greatest_least(
        name: impl Into<String>,
        fields: Vec<PostAggregator>,
        output_type: DataType,
        greatest: bool,
    ) -> DruidResult<Self> {
        if !matches!(output_type, DataType::Long | DataType::Double) {
            return Err(DruidError::InvalidArgument(format!(
                "greatest/least post aggregations only support long and double, got {}",
                output_type
            )));
        }
        Ok(PostAggregator::GreatestLeast(GreatestLeastPostAggregator {
            name: name.into(),
            fields,
            output_type,
            greatest,
        }))
    }

    pub fn hyper_unique_cardinality(name: Option<String>, field_name: impl Into<String>) -> Self {
        PostAggregator::HyperUniqueCardinality(HyperUniqueCardinalityPostAggregator {
            name,
            field_name: field_name.into(),
        })
    }

    pub fn javascript<I, S>(name: impl Into<String>, field_names: I, function: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PostAggregator::Javascript(JavascriptPostAggregator {
            name: name.into(),
            field_names: field_names.into_iter().map(Into::into).collect(),
            function: function.into(),
        })
    }

    /// Output name, when the post-aggregator has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            PostAggregator::FieldAccess(p) => Some(&p.name),
            PostAggregator::Constant(p) => Some(&p.name),
            PostAggregator::Arithmetic(p) => Some(&p.name),
            PostAggregator::Expression(p) => Some(&p.name),
            PostAggregator::GreatestLeast(p) => Some(&p.name),
            PostAggregator::HyperUniqueCardinality(p) => p.name.as_deref(),
            PostAggregator::Javascript(p) => Some(&p.name),
        }
    }
}
