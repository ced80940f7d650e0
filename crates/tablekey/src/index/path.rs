//! Module: index::path
//! Responsibility: parse index-field paths and resolve them against a table
//! type definition.
//! Does not own: row traversal (see `extract`).

use crate::{
    model::{EnumDef, FieldDef, FieldType, ScalarType, table::find_field},
    types::MAX_TIMESTAMP_PRECISION,
};
use thiserror::Error as ThisError;

const ELEMENTS_SUFFIX: &str = "[]";
const KEYS_STEP: &str = "keys()";
const VALUES_STEP: &str = "values()";

///
/// PathError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub(crate) enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("malformed path segment '{0}'")]
    Malformed(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("{0} field cannot be indexed as a whole")]
    Unnarrowed(&'static str),

    #[error("'{step}' cannot be applied to a {kind} field")]
    InvalidStep { step: String, kind: &'static str },

    #[error("paths inside json require a declared type")]
    MissingJsonType,

    #[error("declared type is only allowed on paths ending inside json")]
    UnexpectedJsonType,

    #[error("enum declares too many symbols")]
    EnumTooLarge,

    #[error("timestamp precision {0} is not supported")]
    TimestampPrecision(u8),
}

///
/// PathStep
///
/// One resolved navigation step. Record field names are stored in their
/// declared spelling; map keys and json member names are case-sensitive.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) enum PathStep {
    Field { name: String, nullable: bool },
    Elements,
    /// Fans out once per map entry; `EntryKey`/`EntryValue` project from it.
    MapEntries,
    EntryKey,
    EntryValue,
    MapEntry(String),
    JsonField(String),
    JsonElements,
}

impl PathStep {
    /// Whether this step fans out into zero or more values per input.
    pub(crate) const fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            Self::Elements | Self::MapEntries | Self::JsonElements
        )
    }
}

///
/// ResolvedPath
///
/// Precompiled accessor for one index field.
///

#[derive(Clone, Debug)]
pub(crate) struct ResolvedPath {
    pub(crate) steps: Vec<PathStep>,
    pub(crate) slot: ScalarType,
    pub(crate) ends_in_json: bool,
    pub(crate) enum_def: Option<EnumDef>,
}

enum Token<'a> {
    Name(&'a str),
    Elements,
    Keys,
    Values,
}

impl Token<'_> {
    fn label(&self) -> String {
        match self {
            Self::Name(name) => (*name).to_string(),
            Self::Elements => ELEMENTS_SUFFIX.to_string(),
            Self::Keys => KEYS_STEP.to_string(),
            Self::Values => VALUES_STEP.to_string(),
        }
    }
}

// Position of the walk inside the table's type tree.
#[derive(Clone, Copy)]
enum Node<'a> {
    Record(&'a [FieldDef]),
    Field(&'a FieldType),
    MapKey,
    Json,
}

impl<'a> Node<'a> {
    const fn of(ty: &'a FieldType) -> Self {
        match ty {
            FieldType::Record { fields } => Self::Record(fields.as_slice()),
            FieldType::Json => Self::Json,
            other => Self::Field(other),
        }
    }

    const fn kind(self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Field(ty) => ty.label(),
            Self::MapKey => "map key",
            Self::Json => "json",
        }
    }
}

fn tokenize(path: &str) -> Result<Vec<Token<'_>>, PathError> {
    if path.trim().is_empty() {
        return Err(PathError::Empty);
    }

    let mut tokens = Vec::new();
    for segment in path.split('.') {
        match segment {
            KEYS_STEP => tokens.push(Token::Keys),
            VALUES_STEP => tokens.push(Token::Values),
            _ => {
                let name_end = segment.find('[').unwrap_or(segment.len());
                let (name, mut suffix) = segment.split_at(name_end);
                let well_formed = !name.is_empty()
                    && !name.contains(['(', ')', ']'])
                    && name.trim() == name;
                if !well_formed {
                    return Err(PathError::Malformed(segment.to_string()));
                }

                tokens.push(Token::Name(name));
                while !suffix.is_empty() {
                    suffix = suffix
                        .strip_prefix(ELEMENTS_SUFFIX)
                        .ok_or_else(|| PathError::Malformed(segment.to_string()))?;
                    tokens.push(Token::Elements);
                }
            }
        }
    }

    Ok(tokens)
}

/// Resolve one index-field path against a table's top-level fields.
///
/// `declared_json` tells whether the index field carries an `AS <type>`
/// declaration; it is required exactly when the path ends inside json.
pub(crate) fn resolve_path(
    fields: &[FieldDef],
    path: &str,
    declared_json: Option<ScalarType>,
) -> Result<ResolvedPath, PathError> {
    let mut node = Node::Record(fields);
    let mut steps = Vec::new();

    for token in tokenize(path)? {
        let (step, next) = match (node, &token) {
            (Node::Record(fields), Token::Name(name)) => {
                let def = find_field(fields, name)
                    .ok_or_else(|| PathError::UnknownField((*name).to_string()))?;
                let step = PathStep::Field {
                    name: def.name.clone(),
                    nullable: def.nullable,
                };
                (step, Node::of(&def.ty))
            }
            (Node::Field(FieldType::Array { element }), Token::Elements) => {
                (PathStep::Elements, Node::of(element))
            }
            // keys() and values() share the entry fan-out so they stay paired
            (Node::Field(FieldType::Map { .. }), Token::Keys) => {
                steps.push(PathStep::MapEntries);
                (PathStep::EntryKey, Node::MapKey)
            }
            (Node::Field(FieldType::Map { value }), Token::Values) => {
                steps.push(PathStep::MapEntries);
                (PathStep::EntryValue, Node::of(value))
            }
            (Node::Field(FieldType::Map { value }), Token::Name(key)) => {
                (PathStep::MapEntry((*key).to_string()), Node::of(value))
            }
            (Node::Json, Token::Name(name)) => (PathStep::JsonField((*name).to_string()), Node::Json),
            (Node::Json, Token::Elements) => (PathStep::JsonElements, Node::Json),
            (node, token) => {
                return Err(PathError::InvalidStep {
                    step: token.label(),
                    kind: node.kind(),
                });
            }
        };

        steps.push(step);
        node = next;
    }

    let (slot, ends_in_json, enum_def) = match node {
        Node::Json => (declared_json.ok_or(PathError::MissingJsonType)?, true, None),
        _ if declared_json.is_some() => return Err(PathError::UnexpectedJsonType),
        Node::MapKey => (ScalarType::Text, false, None),
        Node::Record(_) => return Err(PathError::Unnarrowed("record")),
        Node::Field(ty) => {
            let slot = ty.scalar_type().ok_or(match ty {
                FieldType::Enum(_) => PathError::EnumTooLarge,
                other => PathError::Unnarrowed(other.label()),
            })?;
            if let ScalarType::Timestamp { precision } = slot
                && precision > MAX_TIMESTAMP_PRECISION
            {
                return Err(PathError::TimestampPrecision(precision));
            }
            let enum_def = match ty {
                FieldType::Enum(def) => Some(def.clone()),
                _ => None,
            };
            (slot, false, enum_def)
        }
    };

    Ok(ResolvedPath {
        steps,
        slot,
        ends_in_json,
        enum_def,
    })
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::people_table;

    fn resolve(path: &str) -> Result<ResolvedPath, PathError> {
        resolve_path(&people_table().fields, path, None)
    }

    fn field(name: &str) -> PathStep {
        PathStep::Field {
            name: name.into(),
            nullable: true,
        }
    }

    #[test]
    fn nested_record_and_array_paths_resolve() {
        let city = resolve("address.city").expect("address.city");
        assert_eq!(city.steps, vec![field("address"), field("city")]);
        assert_eq!(city.slot, ScalarType::Text);

        let tags = resolve("tags[]").expect("tags[]");
        assert_eq!(tags.steps.last(), Some(&PathStep::Elements));
    }

    #[test]
    fn field_names_are_case_insensitive_and_canonicalized() {
        let resolved = resolve("ADDRESS.City").expect("case-insensitive");
        assert_eq!(resolved.steps, vec![field("address"), field("city")]);
    }

    #[test]
    fn map_steps_resolve() {
        let keys = resolve("scores.keys()").expect("keys");
        assert_eq!(keys.slot, ScalarType::Text);
        assert_eq!(keys.steps[1..], [PathStep::MapEntries, PathStep::EntryKey]);

        let values = resolve("scores.values()").expect("values");
        assert_eq!(values.slot, ScalarType::Int);
        assert_eq!(values.steps[1..], [PathStep::MapEntries, PathStep::EntryValue]);

        let entry = resolve("scores.Math").expect("map entry");
        assert_eq!(entry.steps.last(), Some(&PathStep::MapEntry("Math".into())));
    }

    #[test]
    fn field_steps_carry_declared_nullability() {
        let id = resolve("id").expect("id");
        assert_eq!(
            id.steps,
            vec![PathStep::Field {
                name: "id".into(),
                nullable: false,
            }]
        );
    }

    #[test]
    fn json_paths_require_a_declared_type() {
        assert_eq!(resolve("doc.a.b").unwrap_err(), PathError::MissingJsonType);

        let typed = resolve_path(&people_table().fields, "doc.a[].b", Some(ScalarType::Long))
            .expect("typed json path");
        assert!(typed.ends_in_json);
        assert_eq!(typed.slot, ScalarType::Long);
        assert_eq!(
            resolve_path(&people_table().fields, "age", Some(ScalarType::Long)).unwrap_err(),
            PathError::UnexpectedJsonType
        );
    }

    #[test]
    fn whole_collections_and_bad_steps_are_rejected() {
        assert_eq!(resolve("tags").unwrap_err(), PathError::Unnarrowed("array"));
        assert_eq!(resolve("scores").unwrap_err(), PathError::Unnarrowed("map"));
        assert_eq!(resolve("address").unwrap_err(), PathError::Unnarrowed("record"));
        assert!(matches!(resolve("age[]"), Err(PathError::InvalidStep { .. })));
        assert!(matches!(resolve("tags.keys()"), Err(PathError::InvalidStep { .. })));
        assert!(matches!(resolve("scores.keys().x"), Err(PathError::InvalidStep { .. })));
        assert_eq!(resolve("nope").unwrap_err(), PathError::UnknownField("nope".into()));
    }

    #[test]
    fn malformed_segments_are_rejected() {
        for bad in ["", "a..b", "tags[", "tags[]x", "(x)", " age"] {
            assert!(resolve(bad).is_err(), "'{bad}' should be rejected");
        }
    }
}
