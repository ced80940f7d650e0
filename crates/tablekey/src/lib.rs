//! Secondary-index key codec for a table-oriented storage engine.
//!
//! Turns an index definition plus a row's field values into binary keys whose
//! unsigned byte order matches the semantic order of the indexed values, and
//! parses those keys back into structured [`index::IndexKey`] values for range
//! scans and equality lookups.
#![warn(unreachable_pub)]

pub mod error;
pub mod index;
pub mod model;
pub mod obs;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// CONSTANTS
///

/// Maximum number of fields one index may declare.
///
/// Keeps composite keys and successor carry chains bounded.
pub const MAX_INDEX_FIELDS: usize = 16;

/// Default cap on the number of keys a single row may fan out into.
pub const DEFAULT_MAX_KEYS_PER_ROW: usize = 10_000;

///
/// Prelude
///
/// Domain vocabulary only; errors and codec entrypoints live in their modules.
///

pub mod prelude {
    pub use crate::{
        index::{IndexKey, IndexRange, ResolvedIndex},
        model::{
            FieldDef, FieldType, IndexConfig, IndexDef, IndexFieldSpec, IndexVersion,
            JsonScalarType, Row, RowValue, ScalarType, TableDef,
        },
        types::{Number, Timestamp},
        value::Value,
    };
}
