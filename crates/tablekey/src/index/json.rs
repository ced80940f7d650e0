//! Module: index::json
//! Responsibility: narrow an untyped json value to the scalar type declared
//! for its index field.

use crate::{model::JsonScalarType, types::Number, value::Value};
use serde_json::Value as JsonValue;
use thiserror::Error as ThisError;

///
/// JsonProjectionError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum JsonProjectionError {
    #[error("json {found} cannot be indexed as {expected}")]
    KindMismatch {
        expected: JsonScalarType,
        found: &'static str,
    },

    #[error("json number {literal} does not fit {expected}")]
    OutOfRange {
        expected: JsonScalarType,
        literal: String,
    },
}

/// Project the json value found at an index path (`None` when the path is
/// absent) onto `declared`.
///
/// Absent paths project to EMPTY and explicit `null` to JSON-NULL.
pub fn project(
    value: Option<&JsonValue>,
    declared: JsonScalarType,
) -> Result<Value, JsonProjectionError> {
    let Some(value) = value else {
        return Ok(Value::Empty);
    };

    let mismatch = || JsonProjectionError::KindMismatch {
        expected: declared,
        found: json_kind(value),
    };
    let out_of_range = |literal: &serde_json::Number| JsonProjectionError::OutOfRange {
        expected: declared,
        literal: literal.to_string(),
    };

    match (declared, value) {
        (_, JsonValue::Null) => Ok(Value::JsonNull),
        (JsonScalarType::Integer, JsonValue::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Int)
            .ok_or_else(|| out_of_range(n)),
        (JsonScalarType::Long, JsonValue::Number(n)) => {
            n.as_i64().map(Value::Long).ok_or_else(|| out_of_range(n))
        }
        (JsonScalarType::Double, JsonValue::Number(n)) => {
            n.as_f64().map(Value::Float64).ok_or_else(|| out_of_range(n))
        }
        (JsonScalarType::Number, JsonValue::Number(n)) => n
            .to_string()
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|_| out_of_range(n)),
        (JsonScalarType::String, JsonValue::String(s)) => Ok(Value::Text(s.clone())),
        (JsonScalarType::Boolean, JsonValue::Bool(b)) => Ok(Value::Bool(*b)),
        _ => Err(mismatch()),
    }
}

pub(crate) const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

///
/// TESTS
///
