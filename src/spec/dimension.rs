//! Dimension specs: which columns a query groups by and how they are named.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::extraction::{ExtractionFunction, InlineMap, MissingValue};
use crate::types::DataType;

// =============================================================================
// Default dimension
// =============================================================================

/// A plain dimension, optionally renamed, typed or passed through an
/// extraction function.
///
/// Serializes as `default`, or as `extraction` when an extraction function is
/// attached.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Dimension {
    pub dimension: String,
    pub output_name: Option<String>,
    pub output_type: Option<DataType>,
    pub extraction_fn: Option<ExtractionFunction>,
}

impl Dimension {
    pub fn new(dimension: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            output_name: None,
            output_type: None,
            extraction_fn: None,
        }
    }

    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = Some(output_name.into());
        self
    }

    pub fn with_output_type(mut self, output_type: DataType) -> Self {
        self.output_type = Some(output_type);
        self
    }

    pub fn with_extraction(mut self, extraction_fn: impl Into<ExtractionFunction>) -> Self {
        self.extraction_fn = Some(extraction_fn.into());
        self
    }

    /// The column name in the result: the alias, or the dimension itself.
    pub fn output_name(&self) -> &str {
        self.output_name.as_deref().unwrap_or(&self.dimension)
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let kind = if self.extraction_fn.is_some() {
            "extraction"
        } else {
            "default"
        };
        map.serialize_entry("type", kind)?;
        map.serialize_entry("dimension", &self.dimension)?;
        map.serialize_entry("outputName", self.output_name())?;
        if let Some(output_type) = &self.output_type {
            map.serialize_entry("outputType", output_type)?;
        }
        if let Some(extraction_fn) = &self.extraction_fn {
            map.serialize_entry("extractionFn", extraction_fn)?;
        }
        map.end()
    }
}

// =============================================================================
// Filtered dimensions
// =============================================================================

/// Keeps (or drops, when not a whitelist) the listed values of a
/// multi-value dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "listFiltered", rename_all = "camelCase")]
pub struct ListFilteredDimension {
    pub delegate: Box<DimensionSpec>,
    pub values: Vec<String>,
    pub is_whitelist: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "regexFiltered")]
pub struct RegexFilteredDimension {
    pub delegate: Box<DimensionSpec>,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "prefixFiltered")]
pub struct PrefixFilteredDimension {
    pub delegate: Box<DimensionSpec>,
    pub prefix: String,
}

// =============================================================================
// Lookup dimension
// =============================================================================

/// Where a lookup dimension takes its mapping from.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupSource {
    /// A lookup registered on the cluster, by name.
    Registered(String),
    /// A map carried inline in the query.
    Map {
        map: BTreeMap<String, String>,
        is_one_to_one: bool,
    },
}

/// A dimension whose values are replaced through a lookup.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct LookupDimension {
    pub dimension: String,
    pub output_name: Option<String>,
    pub source: LookupSource,
    pub missing: MissingValue,
}

impl LookupDimension {
    pub fn registered(dimension: impl Into<String>, lookup: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            output_name: None,
            source: LookupSource::Registered(lookup.into()),
            missing: MissingValue::Null,
        }
    }

    pub fn inline<I, K, V>(dimension: impl Into<String>, map: I, is_one_to_one: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            dimension: dimension.into(),
            output_name: None,
            source: LookupSource::Map {
                map: map.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
                is_one_to_one,
            },
            missing: MissingValue::Null,
        }
    }

    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = Some(output_name.into());
        self
    }

    pub fn with_missing(mut self, missing: MissingValue) -> Self {
        self.missing = missing;
        self
    }

    pub fn output_name(&self) -> &str {
        self.output_name.as_deref().unwrap_or(&self.dimension)
    }
}

impl Serialize for LookupDimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "lookup")?;
        map.serialize_entry("dimension", &self.dimension)?;
        map.serialize_entry("outputName", self.output_name())?;
        match &self.source {
            LookupSource::Registered(name) => map.serialize_entry("name", name)?,
            LookupSource::Map {
                map: values,
                is_one_to_one,
            } => map.serialize_entry(
                "lookup",
                &InlineMap {
                    map: values,
                    is_one_to_one: *is_one_to_one,
                },
            )?,
        }
        self.missing.serialize_into(&mut map)?;
        map.end()
    }
}

// =============================================================================
// DimensionSpec
// =============================================================================

/// Any dimension spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DimensionSpec {
    Default(Dimension),
    ListFiltered(ListFilteredDimension),
    RegexFiltered(RegexFilteredDimension),
    PrefixFiltered(PrefixFilteredDimension),
    Lookup(LookupDimension),
}

impl DimensionSpec {
    /// Name of the underlying column.
    pub fn dimension(&self) -> &str {
        match self {
            DimensionSpec::Default(d) => &d.dimension,
            DimensionSpec::ListFiltered(d) => d.delegate.dimension(),
            DimensionSpec::RegexFiltered(d) => d.delegate.dimension(),
            DimensionSpec::PrefixFiltered(d) => d.delegate.dimension(),
            DimensionSpec::Lookup(d) => &d.dimension,
        }
    }

    /// Name of the column in query results.
    pub fn output_name(&self) -> &str {
        match self {
            DimensionSpec::Default(d) => d.output_name(),
            DimensionSpec::ListFiltered(d) => d.delegate.output_name(),
            DimensionSpec::RegexFiltered(d) => d.delegate.output_name(),
            DimensionSpec::PrefixFiltered(d) => d.delegate.output_name(),
            DimensionSpec::Lookup(d) => d.output_name(),
        }
    }

    pub fn list_filtered<I, S>(self, values: I, is_whitelist: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DimensionSpec::ListFiltered(ListFilteredDimension {
            delegate: Box::new(self),
            values: values.into_iter().map(Into::into).collect(),
            is_whitelist,
        })
    }

    pub fn regex_filtered(self, pattern: impl Into<String>) -> Self {
        DimensionSpec::RegexFiltered(RegexFilteredDimension {
            delegate: Box::new(self),
            pattern: pattern.into(),
        })
    }

    pub fn prefix_filtered(self, prefix: impl Into<String>) -> Self {
        DimensionSpec::PrefixFiltered(PrefixFilteredDimension {
            delegate: Box::new(self),
            prefix: prefix.into(),
        })
    }
}

impl From<Dimension> for DimensionSpec {
    fn from(value: Dimension) -> Self {
        DimensionSpec::Default(value)
    }
}

impl From<LookupDimension> for DimensionSpec {
    fn from(value: LookupDimension) -> Self {
        DimensionSpec::Lookup(value)
    }
}

impl From<&str> for DimensionSpec {
    fn from(value: &str) -> Self {
        DimensionSpec::Default(Dimension::new(value))
    }
}

impl From<String> for DimensionSpec {
    fn from(value: String) -> Self {
        DimensionSpec::Default(Dimension::new(value))
    }
}
