//! Module: index::key::ordered::number
//! Responsibility: order-preserving payload for arbitrary-precision decimals.

use crate::{
    index::key::ordered::{
        KeyDecodeError,
        parts::{KeyCursor, push_inverted},
        semantics::{i64_from_ordered, ordered_i64_bytes},
    },
    types::Number,
};

const NEGATIVE_MARKER: u8 = 0x00;
const ZERO_MARKER: u8 = 0x01;
const POSITIVE_MARKER: u8 = 0x02;

const POSITIVE_TERMINATOR: u8 = 0x00;
const NEGATIVE_TERMINATOR: u8 = 0xFF;

// Number ordering is sign bucket + exponent + significant digits + terminator.
pub(crate) fn push_number_payload(out: &mut Vec<u8>, value: &Number) {
    if value.is_zero() {
        out.push(ZERO_MARKER);
        return;
    }

    let exponent = ordered_i64_bytes(value.exponent());

    if value.is_negative() {
        out.push(NEGATIVE_MARKER);
        push_inverted(out, &exponent);
        push_inverted(out, value.digits());
        out.push(NEGATIVE_TERMINATOR);
    } else {
        out.push(POSITIVE_MARKER);
        out.extend_from_slice(&exponent);
        out.extend_from_slice(value.digits());
        out.push(POSITIVE_TERMINATOR);
    }
}

pub(crate) fn read_number_payload(cursor: &mut KeyCursor<'_>) -> Result<Number, KeyDecodeError> {
    let invalid = KeyDecodeError::InvalidNumber {
        slot: cursor.slot(),
    };

    let (negative, exponent, digits) = match cursor.byte()? {
        ZERO_MARKER => return Ok(Number::ZERO),
        POSITIVE_MARKER => {
            let exponent = i64_from_ordered(cursor.take_array::<8>()?);
            let digits = cursor.read_until(POSITIVE_TERMINATOR)?.to_vec();
            (false, exponent, digits)
        }
        NEGATIVE_MARKER => {
            let exponent = i64_from_ordered(cursor.take_array::<8>()?.map(|b| !b));
            let digits = cursor
                .read_until(NEGATIVE_TERMINATOR)?
                .iter()
                .map(|b| !b)
                .collect();
            (true, exponent, digits)
        }
        _ => return Err(invalid),
    };

    // Only the normalized form is canonical.
    let canonical = digits.iter().all(u8::is_ascii_digit)
        && digits.first().is_some_and(|d| *d != b'0')
        && digits.last().is_some_and(|d| *d != b'0');
    if !canonical {
        return Err(invalid);
    }

    Number::from_scientific(negative, digits, exponent).map_err(|_| invalid)
}

///
/// TESTS
///
