//! Module: index::key::codec
//! Responsibility: composite key framing. Slots are concatenated in field
//! order with no separators; each slot encoding is self-delimiting.

use crate::{
    error::{CodecError, ErrorOrigin},
    index::{
        IndexKey, ResolvedIndex,
        key::{
            ordered::{KeyCursor, KeyDecodeError, decode_slot, encode_slot},
            slot_error,
        },
    },
    obs::sink::{self, MetricsEvent},
    value::Value,
};

impl ResolvedIndex {
    /// Serialize a full or prefix key built for this index.
    pub fn serialize(&self, key: &IndexKey) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();
        self.serialize_into(&mut out, key.slots())?;

        Ok(out)
    }

    pub(crate) fn serialize_into(
        &self,
        out: &mut Vec<u8>,
        slots: &[Value],
    ) -> Result<(), CodecError> {
        if slots.len() > self.field_count() {
            return Err(CodecError::unsupported(
                ErrorOrigin::Serializer,
                format!(
                    "key has {} slots but index '{}' declares {} fields",
                    slots.len(),
                    self.name(),
                    self.field_count()
                ),
            ));
        }

        for (position, (value, field)) in slots.iter().zip(self.fields()).enumerate() {
            encode_slot(out, value, field.slot_type(), self.config())
                .map_err(|err| slot_error(ErrorOrigin::Serializer, position, field, err))?;
        }

        Ok(())
    }

    /// Parse a serialized key.
    ///
    /// With `allow_partial`, input ending exactly on a slot boundary yields a
    /// prefix key; otherwise every field must be present. Never reads past
    /// the end of `bytes`.
    pub fn deserialize(&self, bytes: &[u8], allow_partial: bool) -> Result<IndexKey, CodecError> {
        let result = self.decode_slots(bytes, allow_partial);

        let event = match &result {
            Ok(_) => MetricsEvent::KeyDecoded { index: self.name() },
            Err(_) => MetricsEvent::KeyDecodeRejected { index: self.name() },
        };
        sink::record(event);

        Ok(IndexKey::from_conformed(result?))
    }

    fn decode_slots(
        &self,
        bytes: &[u8],
        allow_partial: bool,
    ) -> Result<Vec<Value>, KeyDecodeError> {
        let mut cursor = KeyCursor::new(bytes);
        let mut slots = Vec::with_capacity(self.field_count());

        for (position, field) in self.fields().iter().enumerate() {
            if cursor.is_empty() {
                if allow_partial {
                    break;
                }
                return Err(KeyDecodeError::MissingSlots {
                    present: position,
                    expected: self.field_count(),
                });
            }

            cursor.set_slot(position);
            slots.push(decode_slot(&mut cursor, field.slot_type(), self.config())?);
        }

        if !cursor.is_empty() {
            return Err(KeyDecodeError::TrailingBytes {
                remaining: cursor.remaining(),
            });
        }

        Ok(slots)
    }
}
