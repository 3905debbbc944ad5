//! Slash-delimited lookup into a decoded secret.
//!
//! `a/b/c` descends through nested objects one key at a time. A missing key
//! (or a JSON `null`) makes the result absent, and an absent result stays
//! absent through the remaining segments. Looking up a key inside a value
//! that is not an object is an error.

use crate::error::StacheError;
use serde_json::Value;

/// Walk `cred_path` into `secret`.
///
/// # Returns
///
/// - `Ok(Some(value))` - the value found at the end of the path
/// - `Ok(None)` - some segment was missing
///
/// # Errors
///
/// [`StacheError::TypeMismatch`] when a segment is looked up in an array,
/// string, number or boolean.
pub fn resolve(secret: Value, cred_path: &str) -> Result<Option<Value>, StacheError> {
    let mut current = Some(secret);

    for segment in cred_path.split('/') {
        current = match current {
            None | Some(Value::Null) => None,
            Some(Value::Object(mut map)) => map.remove(segment),
            Some(other) => {
                return Err(StacheError::TypeMismatch {
                    segment: segment.to_string(),
                    found: kind(&other),
                })
            }
        };
    }

    Ok(current.filter(|value| !value.is_null()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
