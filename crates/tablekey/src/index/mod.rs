//! Module: index
//! Responsibility: resolved index definitions and everything that turns rows
//! into ordered keys and keys back into values.
//! Does not own: storage, scans, or the table catalog.
//! Boundary: callers only see key bytes, structured keys, and scan bounds.

mod extract;
pub mod json;
mod key;
mod path;
mod range;
mod resolved;
mod successor;

// re-exports
pub use json::{JsonProjectionError, project};
pub use key::{IndexEntry, IndexKey, IndexKeyBuilder, compare_keys};
pub use range::{IndexRange, ScanBounds, prefix_successor};
pub use resolved::{ResolvedField, ResolvedIndex};
