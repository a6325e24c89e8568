//! Extraction functions: transforms applied to a dimension value before it
//! is grouped or filtered.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::search::{SearchInput, SearchQuerySpec};
use crate::types::Granularity;

// =============================================================================
// Missing-value policy shared by the lookup extractions
// =============================================================================

/// What a lookup does with values that have no mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MissingValue {
    /// Missing values become null.
    #[default]
    Null,
    /// Keep the original value.
    Retain,
    /// Replace with a fixed string.
    Replace(String),
}

impl MissingValue {
    /// Resolve the two user-facing knobs into one policy.
    ///
    /// A non-empty replacement wins over `retain`.
    pub fn resolve(retain: bool, replace_with: Option<String>) -> Self {
        match replace_with {
            Some(value) if !value.is_empty() => MissingValue::Replace(value),
            _ if retain => MissingValue::Retain,
            _ => MissingValue::Null,
        }
    }

    pub(crate) fn serialize_into<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match self {
            MissingValue::Null => Ok(()),
            MissingValue::Retain => map.serialize_entry("retainMissingValue", &true),
            MissingValue::Replace(value) => map.serialize_entry("replaceMissingValueWith", value),
        }
    }
}

// =============================================================================
// Lookup extractions
// =============================================================================

/// Substitutes values using a lookup registered on the cluster.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct RegisteredLookupExtraction {
    pub lookup: String,
    pub missing: MissingValue,
    pub injective: Option<bool>,
    pub optimize: bool,
}

impl RegisteredLookupExtraction {
    pub fn new(lookup: impl Into<String>) -> Self {
        Self {
            lookup: lookup.into(),
            missing: MissingValue::Null,
            injective: None,
            optimize: true,
        }
    }

    pub fn retain_missing_value(mut self, retain: bool) -> Self {
        let replace = match &self.missing {
            MissingValue::Replace(value) => Some(value.clone()),
            _ => None,
        };
        self.missing = MissingValue::resolve(retain, replace);
        self
    }

    pub fn replace_missing_value_with(mut self, value: impl Into<String>) -> Self {
        let retain = self.missing == MissingValue::Retain;
        self.missing = MissingValue::resolve(retain, Some(value.into()));
        self
    }

    pub fn injective(mut self, injective: bool) -> Self {
        self.injective = Some(injective);
        self
    }

    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}

impl Serialize for RegisteredLookupExtraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "registeredLookup")?;
        map.serialize_entry("lookup", &self.lookup)?;
        self.missing.serialize_into(&mut map)?;
        if let Some(injective) = self.injective {
            map.serialize_entry("injective", &injective)?;
        }
        map.serialize_entry("optimize", &self.optimize)?;
        map.end()
    }
}

/// Substitutes values from a map carried inside the query.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct InlineLookupExtraction {
    pub map: BTreeMap<String, String>,
    pub is_one_to_one: bool,
    pub missing: MissingValue,
    pub injective: Option<bool>,
    pub optimize: bool,
}

impl InlineLookupExtraction {
    pub fn new<I, K, V>(map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: map.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            is_one_to_one: false,
            missing: MissingValue::Null,
            injective: None,
            optimize: true,
        }
    }

    pub fn one_to_one(mut self, one_to_one: bool) -> Self {
        self.is_one_to_one = one_to_one;
        self
    }

    pub fn missing_value(mut self, missing: MissingValue) -> Self {
        self.missing = missing;
        self
    }

    pub fn injective(mut self, injective: bool) -> Self {
        self.injective = Some(injective);
        self
    }

    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}

/// The `{type: map, map, isOneToOne}` object nested in inline lookups.
#[derive(Serialize)]
#[serde(tag = "type", rename = "map", rename_all = "camelCase")]
pub(crate) struct InlineMap<'a> {
    pub map: &'a BTreeMap<String, String>,
    pub is_one_to_one: bool,
}

impl Serialize for InlineLookupExtraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "lookup")?;
        map.serialize_entry(
            "lookup",
            &InlineMap {
                map: &self.map,
                is_one_to_one: self.is_one_to_one,
            },
        )?;
        self.missing.serialize_into(&mut map)?;
        if let Some(injective) = self.injective {
            map.serialize_entry("injective", &injective)?;
        }
        map.serialize_entry("optimize", &self.optimize)?;
        map.end()
    }
}

// =============================================================================
// String extractions
// =============================================================================

/// Returns the first matching group of a regular expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "regex", rename_all = "camelCase")]
#[must_use = "builders have no effect until used"]
pub struct RegexExtraction {
    pub expr: String,
    pub index: u32,
    pub replace_missing_value: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_missing_value_with: Option<String>,
}

impl RegexExtraction {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            index: 1,
            replace_missing_value: false,
            replace_missing_value_with: None,
        }
    }

    pub fn group(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    /// Replace non-matching values instead of passing them through.
    pub fn replace_missing_with(mut self, value: Option<String>) -> Self {
        self.replace_missing_value = true;
        self.replace_missing_value_with = value;
        self
    }
}

/// Passes the value through when it matches, null otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "partial")]
pub struct PartialExtraction {
    pub expr: String,
}

/// Passes the value through when it matches a search query spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "searchQuery")]
pub struct SearchQueryExtraction {
    pub query: SearchQuerySpec,
}

impl SearchQueryExtraction {
    pub fn new(input: impl Into<SearchInput>, case_sensitive: bool) -> Self {
        Self {
            query: SearchQuerySpec::from_input(input, case_sensitive),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "substring")]
pub struct SubstringExtraction {
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "strlen")]
pub struct StrlenExtraction {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "upper")]
pub struct UpperExtraction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "lower")]
pub struct LowerExtraction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// Formats a value with a printf-style pattern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "stringFormat", rename_all = "camelCase")]
pub struct StringFormatExtraction {
    pub format: String,
    /// One of `nullString`, `emptyString` or `returnNull`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_handling: Option<String>,
}

// =============================================================================
// Time extractions
// =============================================================================

/// Formats `__time` (or a timestamp dimension) with a Joda pattern.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename = "timeFormat", rename_all = "camelCase")]
#[must_use = "builders have no effect until used"]
pub struct TimeFormatExtraction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<Granularity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_millis: Option<bool>,
}

impl TimeFormatExtraction {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Default::default()
        }
    }

    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    pub fn as_millis(mut self, as_millis: bool) -> Self {
        self.as_millis = Some(as_millis);
        self
    }
}

/// Parses a date string with one format and renders it with another.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "time", rename_all = "camelCase")]
pub struct TimeParseExtraction {
    pub time_format: String,
    pub result_format: String,
    pub joda: bool,
}

// =============================================================================
// Other extractions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "javascript")]
pub struct JavascriptExtraction {
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injective: Option<bool>,
}

/// Buckets numeric values into ranges of `size` starting at `offset`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "bucket")]
pub struct BucketExtraction {
    pub size: i64,
    pub offset: i64,
}

/// Applies several extraction functions in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "cascade", rename_all = "camelCase")]
pub struct CascadeExtraction {
    pub extraction_fns: Vec<ExtractionFunction>,
}

// =============================================================================
// ExtractionFunction
// =============================================================================

/// Any extraction function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionFunction {
    RegisteredLookup(RegisteredLookupExtraction),
    InlineLookup(InlineLookupExtraction),
    Regex(RegexExtraction),
    Partial(PartialExtraction),
    SearchQuery(SearchQueryExtraction),
    Substring(SubstringExtraction),
    Strlen(StrlenExtraction),
    Upper(UpperExtraction),
    Lower(LowerExtraction),
    StringFormat(StringFormatExtraction),
    TimeFormat(TimeFormatExtraction),
    TimeParse(TimeParseExtraction),
    Javascript(JavascriptExtraction),
    Bucket(BucketExtraction),
    Cascade(CascadeExtraction),
}

impl ExtractionFunction {
    pub fn lookup(name: impl Into<String>) -> RegisteredLookupExtraction {
        RegisteredLookupExtraction::new(name)
    }

    pub fn partial(expr: impl Into<String>) -> Self {
        ExtractionFunction::Partial(PartialExtraction { expr: expr.into() })
    }

    pub fn search(input: impl Into<SearchInput>, case_sensitive: bool) -> Self {
        ExtractionFunction::SearchQuery(SearchQueryExtraction::new(input, case_sensitive))
    }

    pub fn substring(index: u32, length: Option<u32>) -> Self {
        ExtractionFunction::Substring(SubstringExtraction { index, length })
    }

    pub fn strlen() -> Self {
        ExtractionFunction::Strlen(StrlenExtraction {})
    }

    pub fn upper(locale: Option<String>) -> Self {
        ExtractionFunction::Upper(UpperExtraction { locale })
    }

    pub fn lower(locale: Option<String>) -> Self {
        ExtractionFunction::Lower(LowerExtraction { locale })
    }

    pub fn string_format(format: impl Into<String>) -> Self {
        ExtractionFunction::StringFormat(StringFormatExtraction {
            format: format.into(),
            null_handling: None,
        })
    }

    pub fn time_parse(time_format: impl Into<String>, result_format: impl Into<String>, joda: bool) -> Self {
        ExtractionFunction::TimeParse(TimeParseExtraction {
            time_format: time_format.into(),
            result_format: result_format.into(),
            joda,
        })
    }

    pub fn javascript(function: impl Into<String>) -> Self {
        ExtractionFunction::Javascript(JavascriptExtraction {
            function: function.into(),
            injective: None,
        })
    }

    pub fn bucket(size: i64, offset: i64) -> Self {
        ExtractionFunction::Bucket(BucketExtraction { size, offset })
    }

    /// Chain `next` after this function, flattening existing cascades.
    pub fn then(self, next: ExtractionFunction) -> Self {
        let mut fns = match self {
            ExtractionFunction::Cascade(cascade) => cascade.extraction_fns,
            other => vec![other],
        };
        fns.push(next);
        ExtractionFunction::Cascade(CascadeExtraction {
            extraction_fns: fns,
        })
    }
}

impl From<RegisteredLookupExtraction> for ExtractionFunction {
    fn from(value: RegisteredLookupExtraction) -> Self {
        ExtractionFunction::RegisteredLookup(value)
    }
}

impl From<InlineLookupExtraction> for ExtractionFunction {
    fn from(value: InlineLookupExtraction) -> Self {
        ExtractionFunction::InlineLookup(value)
    }
}

impl From<RegexExtraction> for ExtractionFunction {
    fn from(value: RegexExtraction) -> Self {
        ExtractionFunction::Regex(value)
    }
}

impl From<TimeFormatExtraction> for ExtractionFunction {
    fn from(value: TimeFormatExtraction) -> Self {
        ExtractionFunction::TimeFormat(value)
    }
}
