//! Module: index::key::ordered::parts
//! Responsibility: variable-width byte framing shared by scalar payloads.
//! Boundary: every decode read goes through `KeyCursor`, which never reads
//! past the end of its buffer.

use crate::index::key::ordered::KeyDecodeError;

const ESCAPE: u8 = 0x00;
const ESCAPED_ZERO: u8 = 0xFF;
const TERMINATOR: u8 = 0x00;

// Byte strings are escaped so slot boundaries remain unambiguous.
pub(crate) fn push_terminated_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        if byte == ESCAPE {
            out.extend_from_slice(&[ESCAPE, ESCAPED_ZERO]);
        } else {
            out.push(byte);
        }
    }

    out.extend_from_slice(&[ESCAPE, TERMINATOR]);
}

pub(crate) fn push_inverted(out: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        out.push(!byte);
    }
}

///
/// KeyCursor
///
/// Bounds-checked reader over one serialized key.
///

pub(crate) struct KeyCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    slot: usize,
}

impl<'a> KeyCursor<'a> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            slot: 0,
        }
    }

    /// Slot position reported in decode errors.
    pub(crate) const fn set_slot(&mut self, slot: usize) {
        self.slot = slot;
    }

    pub(crate) const fn slot(&self) -> usize {
        self.slot
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub(crate) fn byte(&mut self) -> Result<u8, KeyDecodeError> {
        let byte = self
            .bytes
            .get(self.offset)
            .copied()
            .ok_or(KeyDecodeError::Truncated { slot: self.slot })?;
        self.offset += 1;

        Ok(byte)
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], KeyDecodeError> {
        let truncated = KeyDecodeError::Truncated { slot: self.slot };
        let end = self.offset.checked_add(len).ok_or(truncated.clone())?;
        let out = self.bytes.get(self.offset..end).ok_or(truncated)?;
        self.offset = end;

        Ok(out)
    }

    pub(crate) fn take_array<const N: usize>(&mut self) -> Result<[u8; N], KeyDecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);

        Ok(out)
    }

    /// Read an escaped, terminated byte run written by `push_terminated_bytes`.
    pub(crate) fn read_terminated(&mut self) -> Result<Vec<u8>, KeyDecodeError> {
        let mut out = Vec::new();

        loop {
            let byte = self.byte()?;
            if byte != ESCAPE {
                out.push(byte);
                continue;
            }

            match self.byte()? {
                TERMINATOR => return Ok(out),
                ESCAPED_ZERO => out.push(0),
                _ => return Err(KeyDecodeError::InvalidEscape { slot: self.slot }),
            }
        }
    }

    /// Read bytes up to (and consuming) `terminator`.
    pub(crate) fn read_until(&mut self, terminator: u8) -> Result<&'a [u8], KeyDecodeError> {
        let rest = self.bytes.get(self.offset..).unwrap_or_default();
        let len = rest
            .iter()
            .position(|b| *b == terminator)
            .ok_or(KeyDecodeError::Truncated { slot: self.slot })?;
        let out = self.take(len)?;
        self.offset += 1;

        Ok(out)
    }
}

///
/// TESTS
///
