//! The `default` limit spec and its order-by columns.

use druid_query::collection::OrderByCollection;
use druid_query::spec::{Limit, OrderBy};
use druid_query::types::{OrderByDirection, SortingOrder};
use serde_json::json;

#[test]
fn test_default_limit_has_empty_columns() {
    assert_eq!(
        serde_json::to_value(Limit::default()).unwrap(),
        json!({"type": "default", "columns": []})
    );
}

#[test]
fn test_limit_only() {
    assert_eq!(
        serde_json::to_value(Limit::new(Some(2715))).unwrap(),
        json!({"type": "default", "columns": [], "limit": 2715})
    );
}

#[test]
fn test_mutation_after_construction() {
    let mut limit = Limit::new(Some(2715));
    limit
        .set_limit(9372)
        .add_order_by(OrderBy::new("name", OrderByDirection::Descending, SortingOrder::Numeric));

    assert_eq!(limit.limit(), Some(9372));
    assert_eq!(
        serde_json::to_value(&limit).unwrap(),
        json!({
            "type": "default",
            "limit": 9372,
            "columns": [
                {"dimension": "name", "direction": "descending", "dimensionOrder": "numeric"}
            ]
        })
    );
}

#[test]
fn test_offset_and_prebuilt_columns() {
    let columns = OrderByCollection::new()
        .with(OrderBy::ascending("country"))
        .with(OrderBy::descending("city"));
    let mut limit = Limit::with_order_by(Some(10), columns);
    limit.set_offset(30);

    assert_eq!(limit.offset(), Some(30));
    assert_eq!(limit.order_by().map(|c| c.len()), Some(2));
    assert_eq!(
        serde_json::to_value(&limit).unwrap(),
        json!({
            "type": "default",
            "columns": [
                {"dimension": "country", "direction": "ascending", "dimensionOrder": "lexicographic"},
                {"dimension": "city", "direction": "descending", "dimensionOrder": "lexicographic"}
            ],
            "limit": 10,
            "offset": 30
        })
    );
}
