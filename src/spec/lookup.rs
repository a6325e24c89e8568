//! Coordinator lookup definitions.

use std::collections::BTreeMap;

use serde::Serialize;

use super::parse_spec::ParseSpec;

/// Static key/value lookup held in the definition itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "map")]
pub struct MapLookup {
    pub map: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorConfig {
    #[serde(rename = "connectURI")]
    pub connect_uri: String,
    pub user: String,
    pub password: String,
}

/// Lookup backed by a JDBC table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JdbcNamespace {
    pub connector_config: ConnectorConfig,
    pub table: String,
    pub key_column: String,
    pub value_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_period: Option<String>,
}

/// Lookup loaded from a file or a set of files matching a prefix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UriNamespace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_regex: Option<String>,
    pub namespace_parse_spec: ParseSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExtractionNamespace {
    Jdbc(JdbcNamespace),
    Uri(UriNamespace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "cachedNamespace", rename_all = "camelCase")]
pub struct CachedNamespaceLookup {
    pub extraction_namespace: ExtractionNamespace,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_cache_timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injective: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupExtractorFactory {
    Map(MapLookup),
    CachedNamespace(CachedNamespaceLookup),
}

impl LookupExtractorFactory {
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        LookupExtractorFactory::Map(MapLookup {
            map: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        })
    }

    pub fn jdbc(namespace: JdbcNamespace) -> Self {
        Self::cached(ExtractionNamespace::Jdbc(namespace))
    }

    pub fn uri(namespace: UriNamespace) -> Self {
        Self::cached(ExtractionNamespace::Uri(namespace))
    }

    fn cached(extraction_namespace: ExtractionNamespace) -> Self {
        LookupExtractorFactory::CachedNamespace(CachedNamespaceLookup {
            extraction_namespace,
            first_cache_timeout: None,
            injective: None,
        })
    }
}

/// Versioned body posted to the coordinator's lookup config endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupDefinition {
    pub version: String,
    pub lookup_extractor_factory: LookupExtractorFactory,
}

impl LookupDefinition {
    pub fn new(version: impl Into<String>, factory: LookupExtractorFactory) -> Self {
        Self {
            version: version.into(),
            lookup_extractor_factory: factory,
        }
    }
}
