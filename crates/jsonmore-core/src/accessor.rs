//! Typed field accessors over a parsed `serde_json::Value` tree.
//!
//! Each accessor looks up one key on an object and coerces the field into a
//! native value or a caller-supplied buffer. A missing key is not an error:
//! it comes back as `None` (scalars) or `Ok(false)` (arrays) and nothing is
//! logged. Looking a key up on something that is not an object behaves the
//! same way.
//!
//! The scalar accessors are deliberately not symmetric:
//!
//! - [`read_int`] is strict. A field that is not an integer is a
//!   [`TypeMismatch`](JsonMoreError::TypeMismatch).
//! - [`read_double`] is lenient. Any field that is not a floating-point
//!   number, integers included, reads as `NaN`.

use serde_json::Value;

use crate::error::{JsonMoreError, Result};

/// Floating-point view of a node: its value if it is a double-typed number,
/// `NaN` for anything else.
///
/// Integer-typed numbers (`1`, `-7`) also map to `NaN`; only numbers written
/// with a fraction or exponent count as doubles.
pub fn double_or_nan(value: &Value) -> f64 {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Read an integer field.
///
/// ```
/// use serde_json::json;
/// use jsonmore_core::read_int;
///
/// let obj = json!({"count": 3, "ratio": 0.5});
/// assert_eq!(read_int(&obj, "count").unwrap(), Some(3));
/// assert_eq!(read_int(&obj, "missing").unwrap(), None);
/// assert!(read_int(&obj, "ratio").is_err());
/// ```
pub fn read_int(object: &Value, key: &str) -> Result<Option<i64>> {
    let Some(value) = object.get(key) else {
        return Ok(None);
    };
    match value.as_i64() {
        Some(v) => Ok(Some(v)),
        None => {
            tracing::warn!(field = key, "I was looking for an int, instead got '{value}'");
            Err(mismatch(key, "an integer", value))
        }
    }
}

/// Read a double field.
///
/// Returns `None` when the key is absent, otherwise `Some` of
/// [`double_or_nan`] applied to the field. Never fails.
pub fn read_double(object: &Value, key: &str) -> Option<f64> {
    object.get(key).map(double_or_nan)
}

/// Fill `out` from the first `out.len()` elements of an array field.
///
/// Null elements and elements that are not numbers become `when_null`;
/// integers are widened to `f64`. A longer array is truncated to the
/// buffer length.
///
/// Returns `Ok(false)` if the field is absent. If the field is not an array,
/// or holds fewer than `out.len()` elements, the failure is logged, an error
/// is returned, and `out` is left untouched.
pub fn read_double_array(
    object: &Value,
    key: &str,
    out: &mut [f64],
    when_null: f64,
) -> Result<bool> {
    let Some(items) = array_field(object, key, out.len())? else {
        return Ok(false);
    };
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = match item {
            Value::Number(n) => n.as_f64().unwrap_or(when_null),
            _ => when_null,
        };
    }
    Ok(true)
}

/// Fill `out` from the first `out.len()` elements of an array field.
///
/// Only integer elements are taken; everything else, doubles included,
/// becomes `when_null`. Failure handling matches [`read_double_array`].
pub fn read_int_array(
    object: &Value,
    key: &str,
    out: &mut [i64],
    when_null: i64,
) -> Result<bool> {
    let Some(items) = array_field(object, key, out.len())? else {
        return Ok(false);
    };
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_i64().unwrap_or(when_null);
    }
    Ok(true)
}

/// Look up an array field holding at least `n` elements.
fn array_field<'a>(object: &'a Value, key: &str, n: usize) -> Result<Option<&'a [Value]>> {
    let Some(value) = object.get(key) else {
        return Ok(None);
    };
    let Some(items) = value.as_array() else {
        tracing::warn!(field = key, "This is not an array: '{value}'");
        return Err(mismatch(key, "an array", value));
    };
    if items.len() < n {
        tracing::warn!(
            field = key,
            "I expected at least {n} elements, got {}. Array: '{value}'",
            items.len()
        );
        return Err(JsonMoreError::ShortArray {
            field: key.to_string(),
            expected: n,
            found: items.len(),
        });
    }
    Ok(Some(items))
}

fn mismatch(key: &str, expected: &'static str, found: &Value) -> JsonMoreError {
    JsonMoreError::TypeMismatch {
        field: key.to_string(),
        expected,
        found: found.to_string(),
    }
}
