use crate::model::config::IndexConfig;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// IndexDef
///
/// Logical index definition: an ordered, non-empty list of field paths plus
/// the persisted key-format configuration.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexDef {
    pub name: String,
    pub fields: Vec<IndexFieldSpec>,
    #[serde(default)]
    pub config: IndexConfig,
}

impl IndexDef {
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<IndexFieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
            config: IndexConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }
}

impl Display for IndexDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(ToString::to_string).collect();

        write!(f, "{}({})", self.name, fields.join(", "))
    }
}

///
/// IndexFieldSpec
///
/// One index field: a path such as `address.city`, `tags[]`, `m.keys()`,
/// or `m.values().x`, with a declared type when the path ends inside JSON.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexFieldSpec {
    pub path: String,
    #[serde(default, rename = "as")]
    pub json_type: Option<JsonScalarType>,
}

impl IndexFieldSpec {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            json_type: None,
        }
    }

    #[must_use]
    pub fn json(path: impl Into<String>, json_type: JsonScalarType) -> Self {
        Self {
            path: path.into(),
            json_type: Some(json_type),
        }
    }
}

impl Display for IndexFieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.json_type {
            Some(ty) => write!(f, "{} AS {ty}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

///
/// JsonScalarType
///
/// Scalar type declared for an index path that ends inside untyped JSON.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonScalarType {
    Integer,
    Long,
    Double,
    Number,
    String,
    Boolean,
}

impl JsonScalarType {
    #[must_use]
    pub const fn scalar_type(self) -> ScalarType {
        match self {
            Self::Integer => ScalarType::Int,
            Self::Long => ScalarType::Long,
            Self::Double => ScalarType::Float64,
            Self::Number => ScalarType::Number,
            Self::String => ScalarType::Text,
            Self::Boolean => ScalarType::Bool,
        }
    }
}

impl Display for JsonScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Integer => "INTEGER",
            Self::Long => "LONG",
            Self::Double => "DOUBLE",
            Self::Number => "NUMBER",
            Self::String => "STRING",
            Self::Boolean => "BOOLEAN",
        };
        f.write_str(label)
    }
}

///
/// ScalarType
///
/// Resolved type of one index-key slot.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarType {
    Int,
    Long,
    Float32,
    Float64,
    Number,
    Text,
    Bool,
    /// Number of declared symbols.
    Enum { symbols: u16 },
    Timestamp { precision: u8 },
    Binary,
    FixedBinary { size: usize },
}

impl ScalarType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::Number => "Number",
            Self::Text => "Text",
            Self::Bool => "Bool",
            Self::Enum { .. } => "Enum",
            Self::Timestamp { .. } => "Timestamp",
            Self::Binary => "Binary",
            Self::FixedBinary { .. } => "FixedBinary",
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum { symbols } => write!(f, "Enum({symbols})"),
            Self::Timestamp { precision } => write!(f, "Timestamp({precision})"),
            Self::FixedBinary { size } => write!(f, "FixedBinary({size})"),
            other => f.write_str(other.label()),
        }
    }
}
