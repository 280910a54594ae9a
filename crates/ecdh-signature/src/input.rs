//! Argument validation for loosely typed inputs.
//!
//! Values arriving as JSON (from the binary, or from callers bridging dynamic
//! data) are checked here before they reach a signing context.

use serde_json::Value;

use crate::error::InvalidArgument;

pub const DATA: &str = "data";
pub const SIGNATURE: &str = "signature";

/// Rejects an empty `data` string.
pub fn require_data(data: &str) -> Result<&str, InvalidArgument> {
    if data.is_empty() {
        return Err(InvalidArgument::Required { name: DATA });
    }
    Ok(data)
}

/// Extracts a non-empty `data` string from a JSON value.
///
/// Falsy values (`null`, `false`, `0`, `""`) count as missing; anything else
/// that is not a string is a type error.
pub fn data_from_value(value: &Value) -> Result<&str, InvalidArgument> {
    if is_falsy(value) {
        return Err(InvalidArgument::Required { name: DATA });
    }
    value
        .as_str()
        .ok_or(InvalidArgument::NotAString { name: DATA })
}

/// Extracts a signature string from a JSON value. Only `null` counts as missing.
pub fn signature_from_value(value: &Value) -> Result<&str, InvalidArgument> {
    match value {
        Value::Null => Err(InvalidArgument::Required { name: SIGNATURE }),
        Value::String(signature) => Ok(signature.as_str()),
        _ => Err(InvalidArgument::NotAString { name: SIGNATURE }),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
