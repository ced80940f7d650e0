mod compare;
mod tag;


use crate::types::{Number, Timestamp};
use std::{cmp::Ordering, fmt};

// re-exports
pub use compare::{canonical_cmp, strict_order_cmp};
pub use tag::ValueTag;

///
/// Value
///
/// Tagged scalar held in one index-key slot.
///
/// Empty    → the path did not exist in this row instance.
/// JsonNull → an explicit JSON `null` literal was present.
/// Null     → a typed, nullable field was set to SQL NULL.
///

#[derive(Clone, Debug)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Empty,
    /// Declaration ordinal within the slot's enum definition.
    Enum(u16),
    Float32(f32),
    Float64(f64),
    Int(i32),
    JsonNull,
    Long(i64),
    Null,
    Number(Number),
    Text(String),
    Timestamp(Timestamp),
}

impl Value {
    /// Returns true for EMPTY, JSON-NULL, and SQL-NULL.
    #[must_use]
    pub const fn is_null_like(&self) -> bool {
        matches!(self, Self::Empty | Self::JsonNull | Self::Null)
    }

    #[must_use]
    pub const fn canonical_tag(&self) -> ValueTag {
        tag::canonical_tag(self)
    }

    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        self.canonical_tag().label()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        canonical_cmp(self, other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        canonical_cmp(self, other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blob(bytes) => {
                f.write_str("0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Bool(v) => write!(f, "{v}"),
            Self::Enum(ordinal) => write!(f, "#{ordinal}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
            Self::Timestamp(v) => write!(f, "{v}"),
            Self::Empty | Self::JsonNull | Self::Null => f.write_str(self.kind_label()),
        }
    }
}

macro_rules! impl_from_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    f32 => Float32,
    f64 => Float64,
    i32 => Int,
    i64 => Long,
    Number => Number,
    String => Text,
    &str => Text,
    Timestamp => Timestamp,
    Vec<u8> => Blob,
}
