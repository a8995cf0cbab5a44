//! Argument validation against a tool's input schema.
//!
//! Covers the subset of JSON Schema the tool descriptors use: `required`,
//! property `type`, `enum` (also on array `items`), `minimum` and `maximum`.

use crate::error::{BridgeError, Result};
use serde_json::{Map, Value};

/// Check call arguments against an object schema.
pub fn validate(schema: &Value, args: &Map<String, Value>) -> Result<()> {
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        let missing: Vec<&str> = required
            .iter()
            .filter_map(Value::as_str)
            .filter(|field| args.get(*field).map_or(true, Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(BridgeError::InvalidInvocation(format!(
                "Missing required argument(s): {}",
                missing.join(", ")
            )));
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (field, value) in args {
        // Unknown and null arguments are ignored.
        let Some(property) = properties.get(field) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        check_value(field, property, value)?;
    }

    Ok(())
}

fn check_value(field: &str, property: &Value, value: &Value) -> Result<()> {
    if let Some(expected) = property.get("type").and_then(Value::as_str) {
        if !matches_type(expected, value) {
            return Err(BridgeError::InvalidInvocation(format!(
                "Argument '{}' must be of type {}",
                field, expected
            )));
        }
    }

    if let Some(allowed) = property.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            return Err(BridgeError::InvalidInvocation(format!(
                "Argument '{}' must be one of {}, got {}",
                field,
                render_enum(allowed),
                value
            )));
        }
    }

    if let Some(n) = value.as_f64() {
        if let Some(min) = property.get("minimum").and_then(Value::as_f64) {
            if n < min {
                return Err(BridgeError::InvalidInvocation(format!(
                    "Argument '{}' must be at least {}",
                    field, min
                )));
            }
        }
        if let Some(max) = property.get("maximum").and_then(Value::as_f64) {
            if n > max {
                return Err(BridgeError::InvalidInvocation(format!(
                    "Argument '{}' must be at most {}",
                    field, max
                )));
            }
        }
    }

    if let (Some(items), Some(elements)) = (property.get("items"), value.as_array()) {
        for element in elements {
            check_value(field, items, element)?;
        }
    }

    Ok(())
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn render_enum(allowed: &[Value]) -> String {
    let values: Vec<String> = allowed
        .iter()
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .collect();
    format!("[{}]", values.join(", "))
}
