//! Builders that turn native scalars and slices into JSON nodes.
//!
//! The `new_*` functions return an owned [`Value`]. The `add_*` functions
//! build the same node and move it into a parent object under `key`,
//! replacing (and returning) whatever was stored there before.
//!
//! `NaN` is the in-band representation of null for doubles: a `NaN` input
//! is written as `null`, which [`read_double_array`](crate::read_double_array)
//! reads back as its fill value. JSON has no infinities either, so `±inf`
//! is written as `null` too.

use serde_json::{Map, Number, Value};

/// A double-typed leaf, or `null` for `NaN` and infinities.
pub fn double_or_null(v: f64) -> Value {
    Number::from_f64(v).map_or(Value::Null, Value::Number)
}

/// An array holding `values` in order, `NaN` entries as `null`.
///
/// ```
/// use serde_json::json;
/// use jsonmore_core::new_double_array;
///
/// assert_eq!(new_double_array(&[1.5, f64::NAN]), json!([1.5, null]));
/// ```
pub fn new_double_array(values: &[f64]) -> Value {
    Value::Array(values.iter().copied().map(double_or_null).collect())
}

/// An array holding `values` in order.
pub fn new_int_array(values: &[i64]) -> Value {
    Value::Array(values.iter().copied().map(Value::from).collect())
}

/// Attach [`new_double_array`] of `values` under `key`.
pub fn add_double_array(root: &mut Map<String, Value>, key: &str, values: &[f64]) -> Option<Value> {
    root.insert(key.to_string(), new_double_array(values))
}

/// Attach [`new_int_array`] of `values` under `key`.
pub fn add_int_array(root: &mut Map<String, Value>, key: &str, values: &[i64]) -> Option<Value> {
    root.insert(key.to_string(), new_int_array(values))
}

/// Attach an integer leaf under `key`.
pub fn add_int(root: &mut Map<String, Value>, key: &str, v: i64) -> Option<Value> {
    root.insert(key.to_string(), Value::from(v))
}

/// Attach [`double_or_null`] of `v` under `key`.
pub fn add_double(root: &mut Map<String, Value>, key: &str, v: f64) -> Option<Value> {
    root.insert(key.to_string(), double_or_null(v))
}
