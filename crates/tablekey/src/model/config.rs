use crate::{DEFAULT_MAX_KEYS_PER_ROW, value::Value};
use serde::{Deserialize, Serialize};

///
/// IndexVersion
///
/// Persisted per-index key format version.
/// Changing it requires rebuilding the index.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexVersion {
    /// No per-slot header; null-like states are never encoded and rows
    /// carrying them are left out of the index.
    Legacy,
    /// Every slot carries a one-byte header distinguishing concrete values
    /// from EMPTY, JSON-NULL, and SQL-NULL.
    #[default]
    Current,
}

///
/// IndexConfig
///
/// Explicit per-index configuration threaded through every codec call.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct IndexConfig {
    pub version: IndexVersion,
    /// Enables EMPTY and JSON-NULL slots (current version only).
    pub null_support: bool,
    /// Per-row cap on multi-key fan-out.
    pub max_keys: usize,
}

impl IndexConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            version: IndexVersion::Current,
            null_support: true,
            max_keys: DEFAULT_MAX_KEYS_PER_ROW,
        }
    }

    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            version: IndexVersion::Legacy,
            null_support: false,
            max_keys: DEFAULT_MAX_KEYS_PER_ROW,
        }
    }

    #[must_use]
    pub const fn with_null_support(mut self, enabled: bool) -> Self {
        self.null_support = enabled;
        self
    }

    #[must_use]
    pub const fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys;
        self
    }

    /// Whether each slot is framed by a one-byte value/null header.
    #[must_use]
    pub const fn has_slot_header(&self) -> bool {
        matches!(self.version, IndexVersion::Current)
    }

    /// Whether EMPTY and JSON-NULL may appear in a key.
    #[must_use]
    pub const fn supports_absent_states(&self) -> bool {
        self.has_slot_header() && self.null_support
    }

    /// Whether a slot value is representable under this configuration.
    #[must_use]
    pub const fn encodes(&self, value: &Value) -> bool {
        match value {
            Value::Null => self.has_slot_header(),
            Value::Empty | Value::JsonNull => self.supports_absent_states(),
            _ => true,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}
