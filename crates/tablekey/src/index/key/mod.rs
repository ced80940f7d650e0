//! Module: index::key
//! Responsibility: structured index keys, their validating builder, and the
//! composite byte codec.
//! Boundary: `IndexKey` ordering must exactly match serialized byte order.

mod codec;
mod entry;
pub(crate) mod ordered;

#[cfg(test)]
mod tests;

use crate::{
    error::{CodecError, ErrorClass, ErrorOrigin},
    index::{ResolvedField, ResolvedIndex},
    model::{IndexConfig, ScalarType},
    value::Value,
};
use derive_more::Deref;
use ordered::KeyEncodeError;
use std::{cmp::Ordering, fmt};

pub use entry::IndexEntry;

///
/// IndexKey
///
/// Immutable tuple of slot values, one per leading index field.
/// A key with fewer slots than the index has fields is a prefix key.
///

#[repr(transparent)]
#[derive(Clone, Debug, Default, Deref, Eq, Ord, PartialEq, PartialOrd)]
pub struct IndexKey {
    slots: Vec<Value>,
}

impl IndexKey {
    // Slots must already conform to their index fields.
    pub(crate) const fn from_conformed(slots: Vec<Value>) -> Self {
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[Value] {
        &self.slots
    }

    /// Whether the key sets every field of `index`.
    #[must_use]
    pub const fn is_complete(&self, index: &ResolvedIndex) -> bool {
        self.slots.len() == index.field_count()
    }

    /// Leading `len` slots as a prefix key.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            slots: self.slots.iter().take(len).cloned().collect(),
        }
    }

    #[must_use]
    pub fn into_slots(self) -> Vec<Value> {
        self.slots
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{slot}")?;
        }
        f.write_str(")")
    }
}

/// Structured comparison over decoded keys of the same index.
///
/// Agrees with unsigned byte comparison of the serialized keys.
#[must_use]
pub fn compare_keys(left: &IndexKey, right: &IndexKey) -> Ordering {
    left.cmp(right)
}

///
/// IndexKeyBuilder
///
/// Collects slot values and validates them against the index on `build`.
///

pub struct IndexKeyBuilder<'a> {
    index: &'a ResolvedIndex,
    slots: Vec<Value>,
}

impl<'a> IndexKeyBuilder<'a> {
    #[must_use]
    pub const fn new(index: &'a ResolvedIndex) -> Self {
        Self {
            index,
            slots: Vec::new(),
        }
    }

    #[must_use]
    pub fn push(mut self, value: impl Into<Value>) -> Self {
        self.slots.push(value.into());
        self
    }

    /// Validate every slot and produce the key.
    ///
    /// Timestamps are truncated to the slot precision and enum symbols given
    /// as text are replaced by their ordinal.
    pub fn build(self) -> Result<IndexKey, CodecError> {
        let Self { index, slots } = self;

        if slots.len() > index.field_count() {
            return Err(CodecError::new(
                ErrorClass::TypeMismatch,
                ErrorOrigin::Encoder,
                format!(
                    "key has {} slots but index '{}' declares {} fields",
                    slots.len(),
                    index.name(),
                    index.field_count()
                ),
            ));
        }

        let slots = slots
            .into_iter()
            .zip(index.fields())
            .enumerate()
            .map(|(position, (value, field))| {
                conform(value, field, index.config())
                    .map_err(|err| slot_error(ErrorOrigin::Encoder, position, field, err))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(IndexKey::from_conformed(slots))
    }
}

impl ResolvedIndex {
    #[must_use]
    pub const fn key_builder(&self) -> IndexKeyBuilder<'_> {
        IndexKeyBuilder::new(self)
    }

    /// Build a (possibly partial) key from slot values in field order.
    pub fn key<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
    ) -> Result<IndexKey, CodecError> {
        values
            .into_iter()
            .fold(self.key_builder(), |builder, value| builder.push(value))
            .build()
    }
}

/// Normalize one slot value to the canonical form its field stores.
pub(crate) fn conform(
    value: Value,
    field: &ResolvedField,
    config: &IndexConfig,
) -> Result<Value, KeyEncodeError> {
    if value.is_null_like() {
        if !config.encodes(&value) {
            return Err(KeyEncodeError::StateNotEncodable {
                state: value.kind_label(),
            });
        }
        return Ok(value);
    }

    let conformed = match (field.slot_type(), value) {
        (ScalarType::Enum { .. }, Value::Text(symbol)) => {
            let ordinal = field
                .enum_def
                .as_ref()
                .and_then(|def| def.ordinal_of(&symbol))
                .ok_or(KeyEncodeError::UnknownSymbol(symbol))?;
            Value::Enum(ordinal)
        }
        (ScalarType::Enum { symbols }, Value::Enum(ordinal)) => {
            if ordinal >= symbols {
                return Err(KeyEncodeError::EnumOutOfRange { ordinal, symbols });
            }
            Value::Enum(ordinal)
        }
        (ScalarType::Timestamp { precision }, Value::Timestamp(ts)) => {
            Value::Timestamp(ts.truncate_to(precision)?)
        }
        (ScalarType::FixedBinary { size }, Value::Blob(bytes)) => {
            if bytes.len() != size {
                return Err(KeyEncodeError::FixedLength {
                    expected: size,
                    found: bytes.len(),
                });
            }
            Value::Blob(bytes)
        }
        (slot, value) if slot_accepts(slot, &value) => value,
        (slot, value) => {
            return Err(KeyEncodeError::Mismatch {
                expected: slot.to_string(),
                found: value.kind_label(),
            });
        }
    };

    Ok(conformed)
}

const fn slot_accepts(slot: ScalarType, value: &Value) -> bool {
    matches!(
        (slot, value),
        (ScalarType::Int, Value::Int(_))
            | (ScalarType::Long, Value::Long(_))
            | (ScalarType::Float32, Value::Float32(_))
            | (ScalarType::Float64, Value::Float64(_))
            | (ScalarType::Number, Value::Number(_))
            | (ScalarType::Text, Value::Text(_))
            | (ScalarType::Bool, Value::Bool(_))
            | (ScalarType::Binary, Value::Blob(_))
    )
}

// Map a slot encode failure onto the crate error taxonomy.
pub(crate) fn slot_error(
    origin: ErrorOrigin,
    position: usize,
    field: &ResolvedField,
    err: KeyEncodeError,
) -> CodecError {
    match err {
        KeyEncodeError::StateNotEncodable { .. } => CodecError::unsupported(
            origin,
            format!("index field '{}': {err}", field.path()),
        ),
        other => CodecError::type_mismatch(origin, position, field.path(), other),
    }
}
