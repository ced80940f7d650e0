use crate::value::Value;

///
/// ValueTag
///
/// Stable value-variant tag used for diagnostics and cross-variant ordering.
///
/// IMPORTANT:
/// Tag values are part of stable behavior and must remain fixed.
///

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ValueTag {
    Blob = 1,
    Bool = 2,
    Enum = 3,
    Float32 = 4,
    Float64 = 5,
    Int = 6,
    Long = 7,
    Number = 8,
    Text = 9,
    Timestamp = 10,
    Empty = 11,
    JsonNull = 12,
    Null = 13,
}

impl ValueTag {
    /// Stable human-readable value kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Blob => "Blob",
            Self::Bool => "Bool",
            Self::Enum => "Enum",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Number => "Number",
            Self::Text => "Text",
            Self::Timestamp => "Timestamp",
            Self::Empty => "EMPTY",
            Self::JsonNull => "JSON-NULL",
            Self::Null => "SQL-NULL",
        }
    }
}

#[must_use]
pub(super) const fn canonical_tag(value: &Value) -> ValueTag {
    match value {
        Value::Blob(_) => ValueTag::Blob,
        Value::Bool(_) => ValueTag::Bool,
        Value::Empty => ValueTag::Empty,
        Value::Enum(_) => ValueTag::Enum,
        Value::Float32(_) => ValueTag::Float32,
        Value::Float64(_) => ValueTag::Float64,
        Value::Int(_) => ValueTag::Int,
        Value::JsonNull => ValueTag::JsonNull,
        Value::Long(_) => ValueTag::Long,
        Value::Null => ValueTag::Null,
        Value::Number(_) => ValueTag::Number,
        Value::Text(_) => ValueTag::Text,
        Value::Timestamp(_) => ValueTag::Timestamp,
    }
}
