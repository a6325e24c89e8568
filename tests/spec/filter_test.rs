//! Wire form of row-level filters.

use druid_query::spec::{BoundFilter, Dimension, ExtractionFunction, Filter, SpatialBound};
use druid_query::types::{BoundOperator, DataType, Interval, SortingOrder};
use druid_query::DruidError;
use serde_json::json;

#[test]
fn test_selector() {
    let filter = Filter::selector("country", "NZ");
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({"type": "selector", "dimension": "country", "value": "NZ"})
    );
}

#[test]
fn test_null_selector_keeps_value_key() {
    let filter = Filter::is_null_selector("country");
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({"type": "selector", "dimension": "country", "value": null})
    );
}

#[test]
fn test_in_filter() {
    let filter = Filter::in_values("country", ["NZ", "AU"]);
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({"type": "in", "dimension": "country", "values": ["NZ", "AU"]})
    );
}

#[test]
fn test_between_is_inclusive() {
    let filter = Filter::between("age", "18", "65");
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({
            "type": "bound",
            "dimension": "age",
            "lower": "18",
            "upper": "65",
            "lowerStrict": false,
            "upperStrict": false,
            "ordering": "numeric"
        })
    );
}

#[test]
fn test_bound_ordering_override() {
    let filter: Filter = BoundFilter::new("version", BoundOperator::Lt, "1.10")
        .with_ordering(SortingOrder::Version)
        .into();
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({
            "type": "bound",
            "dimension": "version",
            "upper": "1.10",
            "upperStrict": true,
            "ordering": "version"
        })
    );
}

#[test]
fn test_interval_filter() {
    let interval = Interval::parse("2019-04-15/2019-04-16").unwrap();
    let filter = Filter::interval("__time", vec![interval]);
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({
            "type": "interval",
            "dimension": "__time",
            "intervals": ["2019-04-15T00:00:00.000Z/2019-04-16T00:00:00.000Z"]
        })
    );
}

#[test]
fn test_like_uses_backslash_escape() {
    let filter = Filter::like("page", "Main%");
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({"type": "like", "dimension": "page", "pattern": "Main%", "escape": "\\"})
    );
}

#[test]
fn test_search_single_value_is_contains() {
    let insensitive = Filter::search("page", "wiki", false);
    assert_eq!(
        serde_json::to_value(insensitive).unwrap(),
        json!({
            "type": "search",
            "dimension": "page",
            "query": {"type": "insensitive_contains", "value": "wiki"}
        })
    );

    let sensitive = Filter::search("page", "Wiki", true);
    assert_eq!(
        serde_json::to_value(sensitive).unwrap(),
        json!({
            "type": "search",
            "dimension": "page",
            "query": {"type": "contains", "value": "Wiki", "caseSensitive": true}
        })
    );
}

#[test]
fn test_search_list_is_fragment() {
    let filter = Filter::search("page", vec!["wiki", "pedia"], false);
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({
            "type": "search",
            "dimension": "page",
            "query": {"type": "fragment", "values": ["wiki", "pedia"], "caseSensitive": false}
        })
    );
}

#[test]
fn test_column_comparison() {
    let filter = Filter::column_comparison("a", Dimension::new("b").with_output_name("bee"));
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({
            "type": "columnComparison",
            "dimensions": [
                {"type": "default", "dimension": "a", "outputName": "a"},
                {"type": "default", "dimension": "b", "outputName": "bee"}
            ]
        })
    );
}

#[test]
fn test_typed_filters() {
    assert_eq!(
        serde_json::to_value(Filter::null("comment")).unwrap(),
        json!({"type": "null", "column": "comment"})
    );
    assert_eq!(
        serde_json::to_value(Filter::equality("added", DataType::Long, 5)).unwrap(),
        json!({"type": "equality", "column": "added", "matchValueType": "long", "matchValue": 5})
    );
    assert_eq!(
        serde_json::to_value(Filter::expression("added > deleted")).unwrap(),
        json!({"type": "expression", "expression": "added > deleted"})
    );
}

#[test]
fn test_spatial_radius() {
    let filter = Filter::spatial(
        "coords",
        SpatialBound::Radius {
            coords: vec![1.0, 2.0],
            radius: 0.5,
        },
    );
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({
            "type": "spatial",
            "dimension": "coords",
            "bound": {"type": "radius", "coords": [1.0, 2.0], "radius": 0.5}
        })
    );
}

#[test]
fn test_logical_combinators() {
    let filter = Filter::selector("a", "1")
        .or_with(Filter::selector("b", "2"))
        .or_with(Filter::not(Filter::selector("c", "3")));
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({
            "type": "or",
            "fields": [
                {"type": "selector", "dimension": "a", "value": "1"},
                {"type": "selector", "dimension": "b", "value": "2"},
                {"type": "not", "field": {"type": "selector", "dimension": "c", "value": "3"}}
            ]
        })
    );
}

#[test]
fn test_and_with_does_not_merge_into_or() {
    let filter = Filter::or(vec![Filter::selector("a", "1"), Filter::selector("b", "2")])
        .and_with(Filter::selector("c", "3"));
    match filter {
        Filter::And(and) => {
            assert_eq!(and.fields.len(), 2);
            assert!(matches!(and.fields[0], Filter::Or(_)));
        }
        other => panic!("expected and filter, got {other:?}"),
    }
}

#[test]
fn test_extraction_fn_attaches_to_dimension_filters() {
    let filter = Filter::selector("page", "MAIN")
        .with_extraction(ExtractionFunction::upper(None))
        .unwrap();
    assert_eq!(
        serde_json::to_value(filter).unwrap(),
        json!({
            "type": "selector",
            "dimension": "page",
            "value": "MAIN",
            "extractionFn": {"type": "upper"}
        })
    );

}

#[test]
fn test_extraction_fn_rejected_where_unsupported() {
    for filter in [
        Filter::null("page"),
        Filter::expression("added > 1"),
        Filter::and(vec![Filter::selector("page", "a")]),
    ] {
        let kind = filter.type_name();
        let err = filter.with_extraction(ExtractionFunction::strlen()).unwrap_err();
        assert!(matches!(err, DruidError::InvalidArgument(_)));
        assert!(err.to_string().contains(kind));
    }
}
