//! Loose comparisons over form values.
//!
//! Submitted and stored data arrive as untyped JSON. Choice keys are
//! strings, so bound values are compared through their key form: `1`,
//! `"1"` and `true` all select the choice keyed `"1"`.

use serde_json::Value;

/// Returns the choice-key form of a scalar, or `None` for null and containers.
pub fn value_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Returns the text placed in a `value` attribute or element body.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Truthiness of a submitted value.
///
/// `null`, `false`, `0`, `""`, `"0"`, and empty containers are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Loose equality: booleans compare by truthiness, everything else by key form.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == is_truthy(other),
        _ => match (value_key(a), value_key(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
    }
}

/// Coerces a value to a list: `null` is empty, arrays are kept, objects
/// contribute their values, scalars become a one-element list.
pub fn to_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        Value::Object(map) => map.values().cloned().collect(),
        other => vec![other.clone()],
    }
}

/// The key forms of [`to_list`], skipping entries that have none.
pub fn to_key_list(value: &Value) -> Vec<String> {
    to_list(value).iter().filter_map(value_key).collect()
}
