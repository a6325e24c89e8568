//! Parsing and wire form of the closed enums.

use druid_query::types::{
    ArithmeticFunction, BoundOperator, DataType, Granularity, JoinType, OrderByDirection,
    ScanOrder, ScanResultFormat, SortingOrder,
};
use druid_query::DruidError;

#[test]
fn test_every_member_parses_to_itself() {
    for value in SortingOrder::VALUES {
        assert_eq!(value.as_str().parse::<SortingOrder>().unwrap(), *value);
    }
    for value in OrderByDirection::VALUES {
        assert_eq!(value.as_str().parse::<OrderByDirection>().unwrap(), *value);
    }
    for value in DataType::VALUES {
        assert_eq!(value.as_str().parse::<DataType>().unwrap(), *value);
    }
    for value in BoundOperator::VALUES {
        assert_eq!(value.as_str().parse::<BoundOperator>().unwrap(), *value);
    }
    for value in ArithmeticFunction::VALUES {
        assert_eq!(value.as_str().parse::<ArithmeticFunction>().unwrap(), *value);
    }
    for value in ScanOrder::VALUES {
        assert_eq!(value.as_str().parse::<ScanOrder>().unwrap(), *value);
    }
}

#[test]
fn test_join_type_is_case_normalized_to_uppercase() {
    let join: JoinType = "inner".parse().unwrap();
    assert_eq!(join, JoinType::Inner);
    assert_eq!(serde_json::to_value(join).unwrap(), "INNER");
    assert_eq!(join.to_string(), "INNER");
}

#[test]
fn test_granularity_wire_names() {
    assert_eq!(serde_json::to_value(Granularity::FifteenMinute).unwrap(), "fifteen_minute");
    assert_eq!(Granularity::ThirtyMinute.to_string(), "thirty_minute");
    assert_eq!(Granularity::default(), Granularity::All);
}

#[test]
fn test_invalid_value_lists_allowed_members() {
    let err = "fortnight".parse::<Granularity>().unwrap_err();
    match &err {
        DruidError::InvalidEnumValue { kind, value, allowed } => {
            assert_eq!(*kind, "granularity");
            assert_eq!(value, "fortnight");
            assert_eq!(allowed.len(), Granularity::VALUES.len());
            assert!(allowed.contains(&"hour"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_validation());
}

#[test]
fn test_invalid_join_type_reports_uppercase_members() {
    let err = "sideways".parse::<JoinType>().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("\"sideways\""));
    assert!(msg.contains("INNER, LEFT, RIGHT, FULL"));
}

#[test]
fn test_direction_shorthands() {
    assert_eq!("asc".parse::<OrderByDirection>().unwrap(), OrderByDirection::Ascending);
    assert_eq!("Descending".parse::<OrderByDirection>().unwrap(), OrderByDirection::Descending);
    assert!("up".parse::<OrderByDirection>().is_err());
}

#[test]
fn test_data_type_has_no_extra_members() {
    assert!("int".parse::<DataType>().is_err());
    assert!(DataType::Double.is_numeric());
    assert!(!DataType::String.is_numeric());
}

#[test]
fn test_scan_result_format_wire_name() {
    let format: ScanResultFormat = "compactedList".parse().unwrap();
    assert_eq!(serde_json::to_value(format).unwrap(), "compactedList");
    assert_eq!(ScanResultFormat::default(), ScanResultFormat::List);
    assert_eq!(serde_json::to_value(ScanOrder::default()).unwrap(), "none");

    assert_eq!(" COMPACTEDLIST ".parse::<ScanResultFormat>().unwrap(), ScanResultFormat::CompactedList);
    match "rows".parse::<ScanResultFormat>().unwrap_err() {
        DruidError::InvalidEnumValue { kind, value, allowed } => {
            assert_eq!(kind, "scan result format");
            assert_eq!(value, "rows");
            assert_eq!(allowed, vec!["list", "compactedList"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_arithmetic_symbols() {
    assert_eq!("*".parse::<ArithmeticFunction>().unwrap(), ArithmeticFunction::Multiply);
    assert_eq!("POW".parse::<ArithmeticFunction>().unwrap(), ArithmeticFunction::Pow);
    assert_eq!(serde_json::to_value(ArithmeticFunction::Divide).unwrap(), "/");
}
