use crate::model::index::ScalarType;
use serde::{Deserialize, Serialize};

///
/// TableDef
///
/// Type definition of one table, as supplied by the catalog.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl TableDef {
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Case-insensitive top-level field lookup.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        find_field(&self.fields, name)
    }
}

///
/// FieldDef
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub ty: FieldType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

const fn default_nullable() -> bool {
    true
}

impl FieldDef {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
        }
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

pub(crate) fn find_field<'a>(fields: &'a [FieldDef], name: &str) -> Option<&'a FieldDef> {
    fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
}

///
/// EnumDef
///
/// Enumeration symbols in declaration order; ordinals follow this order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EnumDef {
    pub symbols: Vec<String>,
}

impl EnumDef {
    #[must_use]
    pub fn new<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn ordinal_of(&self, symbol: &str) -> Option<u16> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .and_then(|pos| u16::try_from(pos).ok())
    }
}

///
/// FieldType
///
/// Declared type of a table field.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Int,
    Long,
    Float32,
    Float64,
    Number,
    Text,
    Bool,
    Enum(EnumDef),
    Timestamp { precision: u8 },
    Binary,
    FixedBinary { size: usize },
    Record { fields: Vec<FieldDef> },
    Array { element: Box<FieldType> },
    Map { value: Box<FieldType> },
    Json,
}

impl FieldType {
    #[must_use]
    pub fn array(element: Self) -> Self {
        Self::Array {
            element: Box::new(element),
        }
    }

    #[must_use]
    pub fn map(value: Self) -> Self {
        Self::Map {
            value: Box::new(value),
        }
    }

    #[must_use]
    pub const fn record(fields: Vec<FieldDef>) -> Self {
        Self::Record { fields }
    }

    #[must_use]
    pub fn enumeration<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self::Enum(EnumDef::new(symbols))
    }

    /// Slot type when this field is indexable as a scalar.
    #[must_use]
    pub fn scalar_type(&self) -> Option<ScalarType> {
        Some(match self {
            Self::Int => ScalarType::Int,
            Self::Long => ScalarType::Long,
            Self::Float32 => ScalarType::Float32,
            Self::Float64 => ScalarType::Float64,
            Self::Number => ScalarType::Number,
            Self::Text => ScalarType::Text,
            Self::Bool => ScalarType::Bool,
            Self::Enum(def) => ScalarType::Enum {
                symbols: u16::try_from(def.symbols.len()).ok()?,
            },
            Self::Timestamp { precision } => ScalarType::Timestamp {
                precision: *precision,
            },
            Self::Binary => ScalarType::Binary,
            Self::FixedBinary { size } => ScalarType::FixedBinary { size: *size },
            Self::Record { .. } | Self::Array { .. } | Self::Map { .. } | Self::Json => {
                return None;
            }
        })
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Long => "long",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Number => "number",
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Enum(_) => "enum",
            Self::Timestamp { .. } => "timestamp",
            Self::Binary => "binary",
            Self::FixedBinary { .. } => "fixed_binary",
            Self::Record { .. } => "record",
            Self::Array { .. } => "array",
            Self::Map { .. } => "map",
            Self::Json => "json",
        }
    }
}
