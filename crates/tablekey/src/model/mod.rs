//! Runtime descriptors consumed by the codec: table types, rows, index
//! definitions, and per-index configuration.

mod config;
mod index;
mod row;
pub(crate) mod table;


pub use config::{IndexConfig, IndexVersion};
pub use index::{IndexDef, IndexFieldSpec, JsonScalarType, ScalarType};
pub(crate) use row::record_get;
pub use row::{Row, RowValue};
pub use table::{EnumDef, FieldDef, FieldType, TableDef};
