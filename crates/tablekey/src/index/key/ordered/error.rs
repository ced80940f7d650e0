use crate::error::CodecError;
use thiserror::Error as ThisError;

///
/// KeyDecodeError
///
/// Reasons a byte run could not be parsed back into index-key slots.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub(crate) enum KeyDecodeError {
    #[error("truncated slot {slot}")]
    Truncated { slot: usize },

    #[error("unrecognized slot header 0x{header:02x} at slot {slot}")]
    InvalidHeader { slot: usize, header: u8 },

    #[error("null-like state at slot {slot} is not encodable under this index configuration")]
    StateNotEncodable { slot: usize },

    #[error("invalid boolean byte 0x{byte:02x} at slot {slot}")]
    InvalidBool { slot: usize, byte: u8 },

    #[error("enum ordinal {ordinal} out of range at slot {slot}")]
    EnumOutOfRange { slot: usize, ordinal: u16 },

    #[error("invalid escape sequence at slot {slot}")]
    InvalidEscape { slot: usize },

    #[error("text at slot {slot} is not valid UTF-8")]
    InvalidUtf8 { slot: usize },

    #[error("invalid number encoding at slot {slot}")]
    InvalidNumber { slot: usize },

    #[error("invalid timestamp at slot {slot}")]
    InvalidTimestamp { slot: usize },

    #[error("{remaining} trailing bytes after the last slot")]
    TrailingBytes { remaining: usize },

    #[error("key ends after {present} of {expected} slots")]
    MissingSlots { present: usize, expected: usize },
}

impl From<KeyDecodeError> for CodecError {
    fn from(err: KeyDecodeError) -> Self {
        Self::malformed(err)
    }
}

///
/// KeyEncodeError
///
/// Slot values that cannot be written under the slot's declared type or the
/// index configuration.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub(crate) enum KeyEncodeError {
    #[error("{found} value does not match declared slot type {expected}")]
    Mismatch {
        expected: String,
        found: &'static str,
    },

    #[error("{state} is not encodable under this index configuration")]
    StateNotEncodable { state: &'static str },

    #[error("enum ordinal {ordinal} exceeds {symbols} declared symbols")]
    EnumOutOfRange { ordinal: u16, symbols: u16 },

    #[error("unknown enum symbol '{0}'")]
    UnknownSymbol(String),

    #[error("fixed binary expects {expected} bytes, found {found}")]
    FixedLength { expected: usize, found: usize },

    #[error("{0}")]
    Timestamp(#[from] crate::types::TimestampError),
}
