//! Coordinator lookup definitions and their parse specs.

use druid_query::spec::lookup::{ConnectorConfig, JdbcNamespace, UriNamespace};
use druid_query::spec::{LookupDefinition, LookupExtractorFactory, ParseSpec};
use serde_json::json;

#[test]
fn test_map_lookup_definition() {
    let definition = LookupDefinition::new(
        "v2",
        LookupExtractorFactory::map([("NZ", "New Zealand"), ("AU", "Australia")]),
    );
    assert_eq!(
        serde_json::to_value(definition).unwrap(),
        json!({
            "version": "v2",
            "lookupExtractorFactory": {
                "type": "map",
                "map": {"AU": "Australia", "NZ": "New Zealand"}
            }
        })
    );
}

#[test]
fn test_jdbc_lookup() {
    let factory = LookupExtractorFactory::jdbc(JdbcNamespace {
        connector_config: ConnectorConfig {
            connect_uri: "jdbc:postgresql://db:5432/ref".to_string(),
            user: "druid".to_string(),
            password: "secret".to_string(),
        },
        table: "countries".to_string(),
        key_column: "code".to_string(),
        value_column: "name".to_string(),
        filter: None,
        ts_column: Some("updated_at".to_string()),
        poll_period: Some("PT10M".to_string()),
    });
    assert_eq!(
        serde_json::to_value(factory).unwrap(),
        json!({
            "type": "cachedNamespace",
            "extractionNamespace": {
                "type": "jdbc",
                "connectorConfig": {
                    "connectURI": "jdbc:postgresql://db:5432/ref",
                    "user": "druid",
                    "password": "secret"
                },
                "table": "countries",
                "keyColumn": "code",
                "valueColumn": "name",
                "tsColumn": "updated_at",
                "pollPeriod": "PT10M"
            }
        })
    );
}

#[test]
fn test_uri_prefix_lookup_with_csv() {
    let parse_spec = ParseSpec::csv(
        Some(["code", "name"]),
        Some("code".to_string()),
        Some("name".to_string()),
        true,
    );
    let factory = LookupExtractorFactory::uri(UriNamespace {
        uri: None,
        uri_prefix: Some("s3://bucket/lookups/".to_string()),
        file_regex: Some(".*\\.csv".to_string()),
        namespace_parse_spec: parse_spec,
        poll_period: None,
    });
    assert_eq!(
        serde_json::to_value(factory).unwrap(),
        json!({
            "type": "cachedNamespace",
            "extractionNamespace": {
                "type": "uri",
                "uriPrefix": "s3://bucket/lookups/",
                "fileRegex": ".*\\.csv",
                "namespaceParseSpec": {
                    "format": "csv",
                    "columns": ["code", "name"],
                    "keyColumn": "code",
                    "valueColumn": "name",
                    "hasHeaderRow": true
                }
            }
        })
    );
}

#[test]
fn test_parse_spec_formats() {
    assert_eq!(
        serde_json::to_value(ParseSpec::tsv(None::<Vec<String>>, None, None, false)).unwrap(),
        json!({"format": "tsv", "hasHeaderRow": false})
    );
    assert_eq!(
        serde_json::to_value(ParseSpec::SimpleJson).unwrap(),
        json!({"format": "simpleJson"})
    );
}
