//! Parameter parsing and validation for generation options.

use serde_json::{Map, Value};

/// Validate the face crop dilation ratio.
///
/// # Errors
///
/// Returns an error unless the ratio is finite and positive.
pub fn validate_face_crop_ratio(ratio: f64) -> Result<(), String> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(format!("Unsupported face crop ratio '{ratio}'. Must be a positive number"))
    }
}

/// Validate an output dimension.
///
/// # Errors
///
/// Returns an error if the value is zero.
pub fn validate_dimension(name: &str, value: u32) -> Result<(), String> {
    if value == 0 {
        Err(format!("Unsupported {name} '0'. Must be at least 1"))
    } else {
        Ok(())
    }
}

/// Parse `KEY=VALUE` pairs into backend options.
///
/// Values are read as JSON when possible (`steps=30`, `fast=true`,
/// `crop=[1,2]`), otherwise kept as strings. Later keys win.
///
/// # Errors
///
/// Returns an error for a pair without `=` or with an empty key.
pub fn parse_extra<S: AsRef<str>>(pairs: &[S]) -> Result<Map<String, Value>, String> {
    let mut extra = Map::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("Expected KEY=VALUE for --extra, got '{pair}'"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Empty key in --extra '{pair}'"));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        extra.insert(key.to_string(), value);
    }
    Ok(extra)
}
