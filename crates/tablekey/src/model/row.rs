use crate::value::Value;
use std::collections::BTreeMap;

///
/// Row
///
/// Top-level record of one table row, addressed by field name.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, RowValue)>,
}

impl Row {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style field assignment; replaces an existing field of the same name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RowValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<RowValue>) {
        let name = name.into();
        let value = value.into();

        match self
            .fields
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Case-insensitive field lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RowValue> {
        record_get(&self.fields, name)
    }

    #[must_use]
    pub fn fields(&self) -> &[(String, RowValue)] {
        &self.fields
    }
}

///
/// RowValue
///
/// Value of one field inside a row: a scalar, SQL NULL, a nested record,
/// array, or map, or an untyped JSON document.
///

#[derive(Clone, Debug, PartialEq)]
pub enum RowValue {
    Null,
    Scalar(Value),
    Record(Vec<(String, Self)>),
    Array(Vec<Self>),
    Map(BTreeMap<String, Self>),
    Json(serde_json::Value),
}

impl RowValue {
    #[must_use]
    pub fn record<N: Into<String>, V: Into<Self>>(fields: impl IntoIterator<Item = (N, V)>) -> Self {
        Self::Record(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn array<V: Into<Self>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn map<K: Into<String>, V: Into<Self>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    #[must_use]
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(value) => value.kind_label(),
            Self::Record(_) => "record",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Json(_) => "json",
        }
    }
}

pub(crate) fn record_get<'a>(fields: &'a [(String, RowValue)], name: &str) -> Option<&'a RowValue> {
    fields
        .iter()
        .find(|(field, _)| field.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

impl From<Value> for RowValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            other => Self::Scalar(other),
        }
    }
}

impl From<serde_json::Value> for RowValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

macro_rules! impl_from_scalar {
    ( $( $type:ty ),* $(,)? ) => {
        $(
            impl From<$type> for RowValue {
                fn from(v: $type) -> Self {
                    Self::Scalar(Value::from(v))
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool,
    f32,
    f64,
    i32,
    i64,
    String,
    &str,
    Vec<u8>,
    crate::types::Number,
    crate::types::Timestamp,
);
