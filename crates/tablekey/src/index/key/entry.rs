//! Module: index::key::entry
//! Responsibility: stored index entries pairing a serialized key with the
//! primary key of the row it points at.

use crate::{
    error::{CodecError, ErrorOrigin},
    index::{IndexKey, ResolvedIndex},
};

const PK_LEN_SIZE: usize = 2;

///
/// IndexEntry
///
/// `key bytes ‖ primary key ‖ u16 BE primary-key length`.
///
/// Entries group by index key because slot encodings are prefix-free; within
/// one key they order by primary-key bytes.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct IndexEntry {
    bytes: Vec<u8>,
    pk_len: usize,
}

impl IndexEntry {
    pub fn new(key: &[u8], primary_key: &[u8]) -> Result<Self, CodecError> {
        let len = u16::try_from(primary_key.len()).map_err(|_| {
            CodecError::unsupported(
                ErrorOrigin::Serializer,
                format!(
                    "primary key of {} bytes exceeds {} bytes",
                    primary_key.len(),
                    u16::MAX
                ),
            )
        })?;

        let mut bytes = Vec::with_capacity(key.len() + primary_key.len() + PK_LEN_SIZE);
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(primary_key);
        bytes.extend_from_slice(&len.to_be_bytes());

        Ok(Self {
            bytes,
            pk_len: primary_key.len(),
        })
    }

    /// Split stored entry bytes, validating the trailer.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CodecError> {
        let body_len = bytes
            .len()
            .checked_sub(PK_LEN_SIZE)
            .ok_or_else(|| CodecError::malformed("index entry is missing its length trailer"))?;

        let mut trailer = [0u8; PK_LEN_SIZE];
        trailer.copy_from_slice(&bytes[body_len..]);
        let pk_len = usize::from(u16::from_be_bytes(trailer));
        if pk_len > body_len {
            return Err(CodecError::malformed(format!(
                "index entry primary key length {pk_len} exceeds {body_len} available bytes"
            )));
        }

        Ok(Self { bytes, pk_len })
    }

    #[must_use]
    pub fn key_bytes(&self) -> &[u8] {
        &self.bytes[..self.body_len() - self.pk_len]
    }

    #[must_use]
    pub fn primary_key(&self) -> &[u8] {
        &self.bytes[self.body_len() - self.pk_len..self.body_len()]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    const fn body_len(&self) -> usize {
        self.bytes.len() - PK_LEN_SIZE
    }
}

impl ResolvedIndex {
    /// Decode the full index key carried by an entry.
    pub fn decode_entry(&self, entry: &IndexEntry) -> Result<IndexKey, CodecError> {
        self.deserialize(entry.key_bytes(), false)
    }
}

///
/// TESTS
///
