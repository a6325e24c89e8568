//! Search query specs, used by search filters, search queries and the
//! `searchQuery` extraction function.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// What to search for: one value or a list of fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for SearchInput {
    fn from(value: &str) -> Self {
        SearchInput::Single(value.to_string())
    }
}

impl From<String> for SearchInput {
    fn from(value: String) -> Self {
        SearchInput::Single(value)
    }
}

impl From<Vec<String>> for SearchInput {
    fn from(values: Vec<String>) -> Self {
        SearchInput::Many(values)
    }
}

impl From<Vec<&str>> for SearchInput {
    fn from(values: Vec<&str>) -> Self {
        SearchInput::Many(values.into_iter().map(String::from).collect())
    }
}

/// A search query spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuerySpec {
    /// Matches when the value contains the given string.
    Contains { value: String, case_sensitive: bool },
    /// Matches when the value contains every fragment.
    Fragment {
        values: Vec<String>,
        case_sensitive: bool,
    },
    /// Matches a regular expression.
    Regex { pattern: String },
}

impl SearchQuerySpec {
    pub fn contains(value: impl Into<String>, case_sensitive: bool) -> Self {
        SearchQuerySpec::Contains {
            value: value.into(),
            case_sensitive,
        }
    }

    pub fn fragment<I, S>(values: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchQuerySpec::Fragment {
            values: values.into_iter().map(Into::into).collect(),
            case_sensitive,
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        SearchQuerySpec::Regex {
            pattern: pattern.into(),
        }
    }

    /// A list input searches fragments, a single value searches `contains`.
    pub fn from_input(input: impl Into<SearchInput>, case_sensitive: bool) -> Self {
        match input.into() {
            SearchInput::Single(value) => Self::contains(value, case_sensitive),
            SearchInput::Many(values) => Self::fragment(values, case_sensitive),
        }
    }
}

impl Serialize for SearchQuerySpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            SearchQuerySpec::Contains {
                value,
                case_sensitive: true,
            } => {
                map.serialize_entry("type", "contains")?;
                map.serialize_entry("value", value)?;
                map.serialize_entry("caseSensitive", &true)?;
            }
            SearchQuerySpec::Contains {
                value,
                case_sensitive: false,
            } => {
                map.serialize_entry("type", "insensitive_contains")?;
                map.serialize_entry("value", value)?;
            }
            SearchQuerySpec::Fragment {
                values,
                case_sensitive,
            } => {
                map.serialize_entry("type", "fragment")?;
                map.serialize_entry("values", values)?;
                map.serialize_entry("caseSensitive", case_sensitive)?;
            }
            SearchQuerySpec::Regex { pattern } => {
                map.serialize_entry("type", "regex")?;
                map.serialize_entry("pattern", pattern)?;
            }
        }
        map.end()
    }
}
