//! Coercion of loose JSON values into the typed context fields.

use serde_json::Value;

use crate::error::{DruidError, DruidResult};

/// Lowercase a key and drop `_`, `-` and spaces, so `query_id`, `queryId`
/// and `QUERY-ID` all address the same field.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn coerce_int(key: &str, value: Value) -> DruidResult<i64> {
    let coerced = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| is_whole_i64(*f)).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };
    coerced.ok_or_else(|| DruidError::invalid_context(key, "integer", value))
}

/// Whole and inside the `i64` range; `i64::MAX as f64` rounds up to 2^63.
fn is_whole_i64(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

pub fn coerce_float(key: &str, value: Value) -> DruidResult<f64> {
    let coerced = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    coerced.ok_or_else(|| DruidError::invalid_context(key, "number", value))
}

pub fn coerce_bool(key: &str, value: Value) -> DruidResult<bool> {
    let coerced = match &value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    coerced.ok_or_else(|| DruidError::invalid_context(key, "boolean", value))
}

pub fn coerce_string(key: &str, value: Value) -> DruidResult<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(DruidError::invalid_context(key, "string", other)),
    }
}

/// Nested objects and arrays (partitions spec, index spec, ...) kept as-is.
pub fn coerce_raw(key: &str, value: Value) -> DruidResult<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        other => Err(DruidError::invalid_context(key, "object or array", other)),
    }
}
