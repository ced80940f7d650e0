use crate::value::Value;
use std::cmp::Ordering;

/// Total canonical comparator for slot values.
///
/// Ordering rules:
/// 1. Null-like rank: concrete < EMPTY < JSON-NULL < SQL-NULL
/// 2. Variant tag for mismatched concrete variants (deterministic only)
/// 3. Variant-native order for same-variant concrete values
///
/// Floating point values use IEEE total order, so `-0.0 < 0.0`.
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    let rank = null_rank(left).cmp(&null_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    strict_order_cmp(left, right)
        .unwrap_or_else(|| left.canonical_tag().cmp(&right.canonical_tag()))
}

/// Strict comparator for identical variants.
///
/// Returns `None` for mismatched variants.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Blob(a), Value::Blob(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Float32(a), Value::Float32(b)) => Some(a.total_cmp(b)),
        (Value::Float64(a), Value::Float64(b)) => Some(a.total_cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Empty, Value::Empty)
        | (Value::JsonNull, Value::JsonNull)
        | (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

const fn null_rank(value: &Value) -> u8 {
    match value {
        Value::Empty => 1,
        Value::JsonNull => 2,
        Value::Null => 3,
        _ => 0,
    }
}
