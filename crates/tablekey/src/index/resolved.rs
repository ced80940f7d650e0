//! Module: index::resolved
//! Responsibility: precompiled, validated form of one index definition.
//! Boundary: every codec entrypoint runs against a `ResolvedIndex`; raw
//! `IndexDef` values are never interpreted per row.

use crate::{
    MAX_INDEX_FIELDS,
    error::CodecError,
    index::{
        extract::PlanNode,
        path::{PathStep, resolve_path},
    },
    model::{EnumDef, IndexConfig, IndexDef, JsonScalarType, ScalarType, TableDef},
};
use std::fmt;

///
/// ResolvedIndex
///
/// Index definition resolved against a table: one accessor per field plus
/// the per-index configuration. Built once at index-creation time.
///

#[derive(Clone, Debug)]
pub struct ResolvedIndex {
    name: String,
    config: IndexConfig,
    fields: Vec<ResolvedField>,
    pub(crate) plan: PlanNode,
}

impl ResolvedIndex {
    /// Resolve `def` against `table`, rejecting invalid definitions.
    pub fn resolve(table: &TableDef, def: &IndexDef) -> Result<Self, CodecError> {
        if def.name.trim().is_empty() {
            return Err(CodecError::index_definition("index name must not be empty"));
        }
        if def.fields.is_empty() {
            return Err(CodecError::index_definition(format!(
                "index '{}' declares no fields",
                def.name
            )));
        }
        if def.fields.len() > MAX_INDEX_FIELDS {
            return Err(CodecError::index_definition(format!(
                "index '{}' declares {} fields (limit {MAX_INDEX_FIELDS})",
                def.name,
                def.fields.len()
            )));
        }

        let mut fields: Vec<ResolvedField> = Vec::with_capacity(def.fields.len());
        for spec in &def.fields {
            let declared = spec.json_type.map(JsonScalarType::scalar_type);
            let resolved = resolve_path(&table.fields, &spec.path, declared)
                .map_err(|err| CodecError::definition(&spec.path, err))?;

            if fields.iter().any(|f| f.steps == resolved.steps) {
                return Err(CodecError::definition(&spec.path, "duplicate index field"));
            }

            fields.push(ResolvedField {
                path: spec.path.clone(),
                steps: resolved.steps,
                slot: resolved.slot,
                json_type: spec.json_type.filter(|_| resolved.ends_in_json),
                enum_def: resolved.enum_def,
            });
        }

        Ok(Self {
            name: def.name.clone(),
            config: def.config,
            plan: PlanNode::build(&fields),
            fields,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn config(&self) -> &IndexConfig {
        &self.config
    }

    #[must_use]
    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    #[must_use]
    pub const fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Whether any field crosses an array or map boundary.
    #[must_use]
    pub fn is_multi_key(&self) -> bool {
        self.fields.iter().any(ResolvedField::is_multi_valued)
    }

    pub(crate) fn field(&self, position: usize) -> Option<&ResolvedField> {
        self.fields.get(position)
    }
}

impl fmt::Display for ResolvedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.path, field.slot))
            .collect();

        write!(f, "{}({})", self.name, fields.join(", "))
    }
}

///
/// ResolvedField
///
/// One index field: the path as written, its resolved steps, and the slot
/// type of the values it produces.
///

#[derive(Clone, Debug)]
pub struct ResolvedField {
    path: String,
    pub(crate) steps: Vec<PathStep>,
    slot: ScalarType,
    json_type: Option<JsonScalarType>,
    pub(crate) enum_def: Option<EnumDef>,
}

impl ResolvedField {
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn slot_type(&self) -> ScalarType {
        self.slot
    }

    /// Declared json projection type, when the path ends inside json.
    #[must_use]
    pub const fn json_type(&self) -> Option<JsonScalarType> {
        self.json_type
    }

    #[must_use]
    pub fn is_multi_valued(&self) -> bool {
        self.steps.iter().any(PathStep::is_multi_valued)
    }
}

///
/// TESTS
///
