//! Module: index::key::ordered::semantics
//! Responsibility: fixed-width scalar byte transforms preserving order.
//! Does not own: slot headers or variable-width payloads.

pub(crate) const fn ordered_i32_bytes(value: i32) -> [u8; 4] {
    let biased = value.cast_unsigned() ^ (1u32 << 31);
    biased.to_be_bytes()
}

pub(crate) const fn ordered_i64_bytes(value: i64) -> [u8; 8] {
    let biased = value.cast_unsigned() ^ (1u64 << 63);
    biased.to_be_bytes()
}

pub(crate) const fn i32_from_ordered(bytes: [u8; 4]) -> i32 {
    (u32::from_be_bytes(bytes) ^ (1u32 << 31)).cast_signed()
}

pub(crate) const fn i64_from_ordered(bytes: [u8; 8]) -> i64 {
    (u64::from_be_bytes(bytes) ^ (1u64 << 63)).cast_signed()
}

// Positive floats flip the sign bit; negative floats invert every bit.
pub(crate) const fn ordered_f32_bits(value: f32) -> u32 {
    let bits = value.to_bits();
    if bits & 0x8000_0000 == 0 {
        bits ^ 0x8000_0000
    } else {
        !bits
    }
}

pub(crate) const fn ordered_f64_bits(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & 0x8000_0000_0000_0000 == 0 {
        bits ^ 0x8000_0000_0000_0000
    } else {
        !bits
    }
}

pub(crate) const fn f32_from_ordered_bits(ordered: u32) -> f32 {
    let bits = if ordered & 0x8000_0000 == 0 {
        !ordered
    } else {
        ordered ^ 0x8000_0000
    };

    f32::from_bits(bits)
}

pub(crate) const fn f64_from_ordered_bits(ordered: u64) -> f64 {
    let bits = if ordered & 0x8000_0000_0000_0000 == 0 {
        !ordered
    } else {
        ordered ^ 0x8000_0000_0000_0000
    };

    f64::from_bits(bits)
}

///
/// TESTS
///
