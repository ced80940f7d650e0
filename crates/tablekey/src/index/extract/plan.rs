//! Module: index::extract::plan
//! Responsibility: shared path trie over all index fields and the row walk
//! that expands it into slot tuples.
//! Boundary: fields sharing a multi-valued ancestor are evaluated per
//! ancestor element, so their values stay correlated.

use crate::{
    error::{CodecError, ErrorOrigin},
    index::{
        ResolvedField, ResolvedIndex,
        json::{json_kind, project},
        key::{conform, slot_error},
        path::PathStep,
    },
    model::{RowValue, record_get},
    value::Value,
};
use serde_json::Value as JsonValue;

///
/// PlanNode
///
/// Trie node keyed by resolved path step.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct PlanNode {
    leaves: Vec<usize>,
    children: Vec<(PathStep, Self)>,
    // first field routed through this node; names type errors
    first_field: usize,
}

impl PlanNode {
    pub(crate) fn build(fields: &[ResolvedField]) -> Self {
        let mut root = Self::default();

        for (position, field) in fields.iter().enumerate() {
            let mut node = &mut root;
            for step in &field.steps {
                let at = match node.children.iter().position(|(s, _)| s == step) {
                    Some(at) => at,
                    None => {
                        let child = Self {
                            first_field: position,
                            ..Self::default()
                        };
                        node.children.push((step.clone(), child));
                        node.children.len() - 1
                    }
                };
                node = &mut node.children[at].1;
            }
            node.leaves.push(position);
        }

        root
    }
}

/// Sparse slot assignments produced by one branch of the walk.
pub(crate) type Tuple = Vec<(usize, Value)>;

// Position of the walk inside one row.
#[derive(Clone, Copy)]
enum Cursor<'a> {
    Missing,
    SqlNull,
    Record(&'a [(String, RowValue)]),
    Row(&'a RowValue),
    Json(&'a JsonValue),
    Key(&'a str),
    Entry(&'a str, &'a RowValue),
}

impl<'a> Cursor<'a> {
    fn of(value: &'a RowValue) -> Self {
        match value {
            RowValue::Null | RowValue::Scalar(Value::Null) => Self::SqlNull,
            RowValue::Record(fields) => Self::Record(fields),
            RowValue::Json(json) => Self::Json(json),
            other => Self::Row(other),
        }
    }

    fn kind(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::SqlNull => "null",
            Self::Record(_) => "record",
            Self::Row(value) => value.kind_label(),
            Self::Json(json) => json_kind(json),
            Self::Key(_) => "map key",
            Self::Entry(..) => "map entry",
        }
    }
}

// Values reached by a multi-valued step.
enum Fanout<'a> {
    // absent, empty, or null collection: one branch carrying this cursor
    Absent(Cursor<'a>),
    Items(Vec<Cursor<'a>>),
}

///
/// Walk
///
/// One row's expansion against an index plan.
///

pub(crate) struct Walk<'i> {
    index: &'i ResolvedIndex,
    limit: usize,
}

impl<'i> Walk<'i> {
    pub(crate) const fn new(index: &'i ResolvedIndex) -> Self {
        Self {
            index,
            limit: index.config().max_keys,
        }
    }

    pub(crate) fn run(
        &self,
        plan: &PlanNode,
        fields: &[(String, RowValue)],
    ) -> Result<Vec<Tuple>, CodecError> {
        self.eval(plan, Cursor::Record(fields))
    }

    fn eval(&self, node: &PlanNode, cursor: Cursor<'_>) -> Result<Vec<Tuple>, CodecError> {
        let mut base = Tuple::with_capacity(node.leaves.len());
        for &position in &node.leaves {
            base.push((position, self.leaf(position, cursor)?));
        }

        let mut tuples = vec![base];
        for (step, child) in &node.children {
            let branch = if step.is_multi_valued() {
                match self.fan_out(step, cursor, child.first_field)? {
                    Fanout::Absent(cursor) => self.eval(child, cursor)?,
                    Fanout::Items(items) => {
                        let mut out = Vec::new();
                        for item in items {
                            out.extend(self.eval(child, item)?);
                            self.check_limit(out.len())?;
                        }
                        out
                    }
                }
            } else {
                self.eval(child, self.navigate(step, cursor, child.first_field)?)?
            };

            tuples = self.cross(tuples, branch)?;
        }

        Ok(tuples)
    }

    fn cross(&self, left: Vec<Tuple>, right: Vec<Tuple>) -> Result<Vec<Tuple>, CodecError> {
        if right.len() == 1 {
            let extra = right.into_iter().next().unwrap_or_default();
            return Ok(left
                .into_iter()
                .map(|mut tuple| {
                    tuple.extend(extra.iter().cloned());
                    tuple
                })
                .collect());
        }

        let produced = left.len().saturating_mul(right.len());
        self.check_limit(produced)?;

        let mut out = Vec::with_capacity(produced);
        for l in &left {
            for r in &right {
                let mut tuple = l.clone();
                tuple.extend(r.iter().cloned());
                out.push(tuple);
            }
        }

        Ok(out)
    }

    fn check_limit(&self, produced: usize) -> Result<(), CodecError> {
        if produced > self.limit {
            return Err(CodecError::resource_limit(
                self.index.name(),
                self.limit,
                produced,
            ));
        }

        Ok(())
    }

    fn navigate<'a>(
        &self,
        step: &PathStep,
        cursor: Cursor<'a>,
        position: usize,
    ) -> Result<Cursor<'a>, CodecError> {
        let next = match (step, cursor) {
            (_, Cursor::Missing | Cursor::SqlNull) => cursor,
            (PathStep::Field { name, nullable }, Cursor::Record(fields)) => {
                let next = record_get(fields, name).map_or(Cursor::Missing, Cursor::of);
                if !nullable && matches!(next, Cursor::SqlNull) {
                    return Err(self.not_null_error(position, name));
                }
                next
            }
            (PathStep::EntryKey, Cursor::Entry(key, _)) => Cursor::Key(key),
            (PathStep::EntryValue, Cursor::Entry(_, value)) => Cursor::of(value),
            (PathStep::MapEntry(key), Cursor::Row(RowValue::Map(entries))) => {
                entries.get(key).map_or(Cursor::Missing, Cursor::of)
            }
            (PathStep::JsonField(name), Cursor::Json(JsonValue::Object(members))) => {
                members.get(name).map_or(Cursor::Missing, Cursor::Json)
            }
            // member access on a json scalar or array finds nothing
            (PathStep::JsonField(_), Cursor::Json(_)) => Cursor::Missing,
            (step, cursor) => return Err(self.shape_error(position, step, cursor)),
        };

        Ok(next)
    }

    fn fan_out<'a>(
        &self,
        step: &PathStep,
        cursor: Cursor<'a>,
        position: usize,
    ) -> Result<Fanout<'a>, CodecError> {
        let items: Vec<Cursor<'a>> = match (step, cursor) {
            (_, Cursor::Missing | Cursor::SqlNull) => return Ok(Fanout::Absent(cursor)),
            (PathStep::Elements, Cursor::Row(RowValue::Array(items))) => {
                items.iter().map(Cursor::of).collect()
            }
            (PathStep::MapEntries, Cursor::Row(RowValue::Map(entries))) => entries
                .iter()
                .map(|(key, value)| Cursor::Entry(key.as_str(), value))
                .collect(),
            (PathStep::JsonElements, Cursor::Json(JsonValue::Array(items))) => {
                items.iter().map(Cursor::Json).collect()
            }
            // a json non-array under [] is its own single element
            (PathStep::JsonElements, Cursor::Json(_)) => vec![cursor],
            (step, cursor) => return Err(self.shape_error(position, step, cursor)),
        };

        if items.is_empty() {
            return Ok(Fanout::Absent(Cursor::Missing));
        }

        Ok(Fanout::Items(items))
    }

    fn leaf(&self, position: usize, cursor: Cursor<'_>) -> Result<Value, CodecError> {
        let Some(field) = self.index.field(position) else {
            return Err(CodecError::unsupported(
                ErrorOrigin::Extractor,
                format!("index field {position} is not part of index '{}'", self.index.name()),
            ));
        };

        if let Some(declared) = field.json_type() {
            let json = match cursor {
                Cursor::Missing => None,
                Cursor::SqlNull => return Ok(Value::Null),
                Cursor::Json(json) => Some(json),
                other => return Err(self.leaf_error(position, field, other)),
            };

            return project(json, declared).map_err(|err| {
                CodecError::type_mismatch(ErrorOrigin::Projector, position, field.path(), err)
            });
        }

        match cursor {
            Cursor::Missing => Ok(Value::Empty),
            Cursor::SqlNull => Ok(Value::Null),
            Cursor::Key(key) => Ok(Value::Text(key.to_string())),
            Cursor::Row(RowValue::Scalar(value)) if value.is_null_like() => Ok(value.clone()),
            Cursor::Row(RowValue::Scalar(value)) => {
                conform(value.clone(), field, self.index.config())
                    .map_err(|err| slot_error(ErrorOrigin::Extractor, position, field, err))
            }
            other => Err(self.leaf_error(position, field, other)),
        }
    }

    fn leaf_error(&self, position: usize, field: &ResolvedField, cursor: Cursor<'_>) -> CodecError {
        let expected = field
            .json_type()
            .map_or_else(|| field.slot_type().to_string(), |ty| format!("json {ty}"));

        CodecError::type_mismatch(
            ErrorOrigin::Extractor,
            position,
            field.path(),
            format!("expected {expected}, found {}", cursor.kind()),
        )
    }

    fn not_null_error(&self, position: usize, name: &str) -> CodecError {
        let path = self
            .index
            .field(position)
            .map_or_else(String::new, |field| field.path().to_string());

        CodecError::type_mismatch(
            ErrorOrigin::Extractor,
            position,
            path,
            format!("field '{name}' is declared NOT NULL but holds NULL"),
        )
    }

    fn shape_error(&self, position: usize, step: &PathStep, cursor: Cursor<'_>) -> CodecError {
        let path = self
            .index
            .field(position)
            .map_or_else(String::new, |field| field.path().to_string());
        let expected = match step {
            PathStep::Field { .. } => "record",
            PathStep::Elements => "array",
            PathStep::MapEntries | PathStep::MapEntry(_) => "map",
            PathStep::EntryKey | PathStep::EntryValue => "map entry",
            PathStep::JsonField(_) | PathStep::JsonElements => "json",
        };

        CodecError::type_mismatch(
            ErrorOrigin::Extractor,
            position,
            path,
            format!("expected {expected}, found {}", cursor.kind()),
        )
    }
}
