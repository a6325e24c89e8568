//! Parse specs of URI lookup namespaces.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvParseSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_column: Option<String>,
    pub has_header_row: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_header_rows: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TsvParseSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_delimiter: Option<String>,
    pub has_header_row: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_header_rows: Option<u32>,
}

/// How the rows of a lookup file map to keys and values.
///
/// The discriminator key is `format`, not `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format")]
pub enum ParseSpec {
    #[serde(rename = "csv")]
    Csv(CsvParseSpec),
    #[serde(rename = "tsv")]
    Tsv(TsvParseSpec),
    #[serde(rename = "customJson", rename_all = "camelCase")]
    CustomJson {
        key_field_name: String,
        value_field_name: String,
    },
    #[serde(rename = "simpleJson")]
    SimpleJson,
}

impl ParseSpec {
    pub fn csv<I, S>(columns: Option<I>, key_column: Option<String>, value_column: Option<String>, has_header_row: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParseSpec::Csv(CsvParseSpec {
            columns: columns.map(|c| c.into_iter().map(Into::into).collect()),
            key_column,
            value_column,
            has_header_row,
            skip_header_rows: None,
        })
    }

    pub fn tsv<I, S>(columns: Option<I>, key_column: Option<String>, value_column: Option<String>, has_header_row: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParseSpec::Tsv(TsvParseSpec {
            columns: columns.map(|c| c.into_iter().map(Into::into).collect()),
            key_column,
            value_column,
            has_header_row,
            ..TsvParseSpec::default()
        })
    }

    pub fn custom_json(key_field_name: impl Into<String>, value_field_name: impl Into<String>) -> Self {
        ParseSpec::CustomJson {
            key_field_name: key_field_name.into(),
            value_field_name: value_field_name.into(),
        }
    }
}
