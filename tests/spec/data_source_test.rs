//! Wire form of data sources, including nested queries and joins.

use druid_query::query::QueryBuilder;
use druid_query::spec::DataSource;
use druid_query::types::{Granularity, JoinType};
use serde_json::json;

#[test]
fn test_table_from_str() {
    let source: DataSource = "wikipedia".into();
    assert_eq!(source, DataSource::table("wikipedia"));
    assert_eq!(
        serde_json::to_value(source).unwrap(),
        json!({"type": "table", "name": "wikipedia"})
    );
}

#[test]
fn test_lookup_source() {
    assert_eq!(
        serde_json::to_value(DataSource::lookup("countries")).unwrap(),
        json!({"type": "lookup", "name": "countries"})
    );
}

#[test]
fn test_join_with_parsed_join_type() {
    let join = DataSource::join("a", "b", "p.", "p.id = id", "inner".parse::<JoinType>().unwrap());
    assert_eq!(
        serde_json::to_value(join).unwrap(),
        json!({
            "type": "join",
            "left": {"type": "table", "name": "a"},
            "right": {"type": "table", "name": "b"},
            "rightPrefix": "p.",
            "condition": "p.id = id",
            "joinType": "INNER"
        })
    );
}

#[test]
fn test_nested_joins() {
    let inner = DataSource::join("a", "b", "b.", "id == \"b.id\"", JoinType::Left);
    let outer = DataSource::join(inner, DataSource::lookup("c"), "c.", "k == \"c.k\"", JoinType::Full);
    let value = serde_json::to_value(&outer).unwrap();
    assert_eq!(value["joinType"], "FULL");
    assert_eq!(value["left"]["type"], "join");
    assert_eq!(value["left"]["joinType"], "LEFT");
    assert_eq!(value["right"], json!({"type": "lookup", "name": "c"}));
    assert_eq!(outer.name(), Some("a"));
}

#[test]
fn test_query_data_source_embeds_document() {
    let inner = QueryBuilder::new("wikipedia", Granularity::Hour)
        .interval_str("2019-04-15/2019-04-16")
        .unwrap()
        .count("edits")
        .timeseries()
        .unwrap();
    let source = DataSource::query(inner);
    assert_eq!(source.name(), None);
    assert_eq!(
        serde_json::to_value(source).unwrap(),
        json!({
            "type": "query",
            "query": {
                "queryType": "timeseries",
                "dataSource": {"type": "table", "name": "wikipedia"},
                "descending": false,
                "intervals": ["2019-04-15T00:00:00.000Z/2019-04-16T00:00:00.000Z"],
                "granularity": "hour",
                "aggregations": [{"type": "count", "name": "edits"}]
            }
        })
    );
}

#[test]
fn test_union_name_is_first_member() {
    let union = DataSource::union(["one", "two"]);
    assert_eq!(union.name(), Some("one"));
}
