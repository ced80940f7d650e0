//! Module: index::key::ordered
//! Responsibility: order-preserving encoding of one index-key slot.
//! Does not own: composite key framing or slot type validation.
//! Boundary: byte order of encoded slots matches canonical `Value` order
//! within one slot type.

mod error;
mod number;
mod parts;
mod semantics;

use crate::{
    model::{IndexConfig, ScalarType},
    types::Timestamp,
    value::Value,
};

pub(crate) use error::{KeyDecodeError, KeyEncodeError};
pub(crate) use parts::KeyCursor;
pub(crate) use semantics::{f32_from_ordered_bits, f64_from_ordered_bits, ordered_f32_bits, ordered_f64_bits};

/// Slot header announcing a concrete value (current version only).
pub(crate) const VALUE_HEADER: u8 = 0x00;
pub(crate) const EMPTY_MARKER: u8 = 0xFD;
pub(crate) const JSON_NULL_MARKER: u8 = 0xFE;
pub(crate) const SQL_NULL_MARKER: u8 = 0xFF;

// Enums with more symbols than this use a two-byte ordinal.
const ONE_BYTE_ENUM_SYMBOLS: u16 = 256;

/// Encode one slot (header plus payload) into `out`.
pub(crate) fn encode_slot(
    out: &mut Vec<u8>,
    value: &Value,
    slot: ScalarType,
    config: &IndexConfig,
) -> Result<(), KeyEncodeError> {
    if !config.encodes(value) {
        return Err(KeyEncodeError::StateNotEncodable {
            state: value.kind_label(),
        });
    }

    let marker = match value {
        Value::Empty => Some(EMPTY_MARKER),
        Value::JsonNull => Some(JSON_NULL_MARKER),
        Value::Null => Some(SQL_NULL_MARKER),
        _ => None,
    };
    if let Some(marker) = marker {
        out.push(marker);
        return Ok(());
    }

    if config.has_slot_header() {
        out.push(VALUE_HEADER);
    }

    encode_payload(out, value, slot)
}

// Encode the type-local payload of a concrete value.
fn encode_payload(out: &mut Vec<u8>, value: &Value, slot: ScalarType) -> Result<(), KeyEncodeError> {
    match (slot, value) {
        (ScalarType::Int, Value::Int(v)) => out.extend_from_slice(&semantics::ordered_i32_bytes(*v)),
        (ScalarType::Long, Value::Long(v)) => {
            out.extend_from_slice(&semantics::ordered_i64_bytes(*v));
        }
        (ScalarType::Float32, Value::Float32(v)) => {
            out.extend_from_slice(&ordered_f32_bits(*v).to_be_bytes());
        }
        (ScalarType::Float64, Value::Float64(v)) => {
            out.extend_from_slice(&ordered_f64_bits(*v).to_be_bytes());
        }
        (ScalarType::Number, Value::Number(v)) => number::push_number_payload(out, v),
        (ScalarType::Text, Value::Text(v)) => parts::push_terminated_bytes(out, v.as_bytes()),
        (ScalarType::Bool, Value::Bool(v)) => out.push(u8::from(*v)),
        (ScalarType::Enum { symbols }, Value::Enum(ordinal)) => {
            if *ordinal >= symbols {
                return Err(KeyEncodeError::EnumOutOfRange {
                    ordinal: *ordinal,
                    symbols,
                });
            }
            match u8::try_from(*ordinal) {
                Ok(byte) if symbols <= ONE_BYTE_ENUM_SYMBOLS => out.push(byte),
                _ => out.extend_from_slice(&ordinal.to_be_bytes()),
            }
        }
        (ScalarType::Timestamp { precision }, Value::Timestamp(v)) => {
            out.extend_from_slice(&semantics::ordered_i64_bytes(v.seconds()));
            if precision > 0 {
                out.extend_from_slice(&v.fraction_units(precision)?.to_be_bytes());
            }
        }
        (ScalarType::Binary, Value::Blob(v)) => parts::push_terminated_bytes(out, v),
        (ScalarType::FixedBinary { size }, Value::Blob(v)) => {
            if v.len() != size {
                return Err(KeyEncodeError::FixedLength {
                    expected: size,
                    found: v.len(),
                });
            }
            out.extend_from_slice(v);
        }
        (expected, found) => {
            return Err(KeyEncodeError::Mismatch {
                expected: expected.to_string(),
                found: found.kind_label(),
            });
        }
    }

    Ok(())
}

/// Decode one slot at the cursor position.
pub(crate) fn decode_slot(
    cursor: &mut KeyCursor<'_>,
    slot: ScalarType,
    config: &IndexConfig,
) -> Result<Value, KeyDecodeError> {
    if config.has_slot_header() {
        let state = match cursor.byte()? {
            VALUE_HEADER => None,
            EMPTY_MARKER => Some(Value::Empty),
            JSON_NULL_MARKER => Some(Value::JsonNull),
            SQL_NULL_MARKER => Some(Value::Null),
            header => {
                return Err(KeyDecodeError::InvalidHeader {
                    slot: cursor.slot(),
                    header,
                });
            }
        };

        if let Some(state) = state {
            if !config.encodes(&state) {
                return Err(KeyDecodeError::StateNotEncodable {
                    slot: cursor.slot(),
                });
            }
            return Ok(state);
        }
    }

    decode_payload(cursor, slot)
}

fn decode_payload(cursor: &mut KeyCursor<'_>, slot: ScalarType) -> Result<Value, KeyDecodeError> {
    let position = cursor.slot();

    let value = match slot {
        ScalarType::Int => Value::Int(semantics::i32_from_ordered(cursor.take_array()?)),
        ScalarType::Long => Value::Long(semantics::i64_from_ordered(cursor.take_array()?)),
        ScalarType::Float32 => {
            Value::Float32(f32_from_ordered_bits(u32::from_be_bytes(cursor.take_array()?)))
        }
        ScalarType::Float64 => {
            Value::Float64(f64_from_ordered_bits(u64::from_be_bytes(cursor.take_array()?)))
        }
        ScalarType::Number => Value::Number(number::read_number_payload(cursor)?),
        ScalarType::Text => {
            let bytes = cursor.read_terminated()?;
            let text = String::from_utf8(bytes)
                .map_err(|_| KeyDecodeError::InvalidUtf8 { slot: position })?;
            Value::Text(text)
        }
        ScalarType::Bool => match cursor.byte()? {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            byte => {
                return Err(KeyDecodeError::InvalidBool {
                    slot: position,
                    byte,
                });
            }
        },
        ScalarType::Enum { symbols } => {
            let ordinal = if symbols <= ONE_BYTE_ENUM_SYMBOLS {
                u16::from(cursor.byte()?)
            } else {
                u16::from_be_bytes(cursor.take_array()?)
            };
            if ordinal >= symbols {
                return Err(KeyDecodeError::EnumOutOfRange {
                    slot: position,
                    ordinal,
                });
            }
            Value::Enum(ordinal)
        }
        ScalarType::Timestamp { precision } => {
            let seconds = semantics::i64_from_ordered(cursor.take_array()?);
            let units = if precision > 0 {
                u32::from_be_bytes(cursor.take_array()?)
            } else {
                0
            };
            let ts = Timestamp::from_fraction_units(seconds, units, precision)
                .map_err(|_| KeyDecodeError::InvalidTimestamp { slot: position })?;
            Value::Timestamp(ts)
        }
        ScalarType::Binary => Value::Blob(cursor.read_terminated()?),
        ScalarType::FixedBinary { size } => Value::Blob(cursor.take(size)?.to_vec()),
    };

    Ok(value)
}

///
/// TESTS
///

#[cfg(test)]
mod tests;
