use crate::{
    index::ResolvedIndex,
    model::{FieldDef, FieldType, IndexConfig, IndexDef, IndexFieldSpec, JsonScalarType, TableDef},
};

/// Table covering every field kind the resolver understands.
pub(crate) fn people_table() -> TableDef {
    TableDef::new(
        "people",
        vec![
            FieldDef::new("id", FieldType::Long).not_null(),
            FieldDef::new("name", FieldType::Text),
            FieldDef::new("age", FieldType::Int),
            FieldDef::new(
                "address",
                FieldType::record(vec![
                    FieldDef::new("city", FieldType::Text),
                    FieldDef::new("zip", FieldType::Text),
                ]),
            ),
            FieldDef::new("tags", FieldType::array(FieldType::Text)),
            FieldDef::new("nums", FieldType::array(FieldType::Int)),
            FieldDef::new("scores", FieldType::map(FieldType::Int)),
            FieldDef::new("doc", FieldType::Json),
            FieldDef::new(
                "jobs",
                FieldType::array(FieldType::record(vec![
                    FieldDef::new("company", FieldType::Text),
                    FieldDef::new("phones", FieldType::array(FieldType::Text)),
                ])),
            ),
            FieldDef::new(
                "kind",
                FieldType::enumeration(["draft", "active", "archived"]),
            ),
            FieldDef::new("created", FieldType::Timestamp { precision: 3 }),
            FieldDef::new("ratio", FieldType::Float64),
            FieldDef::new("amount", FieldType::Number),
            FieldDef::new("flag", FieldType::Bool),
            FieldDef::new("hash", FieldType::FixedBinary { size: 4 }),
            FieldDef::new("blob", FieldType::Binary),
            FieldDef::new("matrix", FieldType::array(FieldType::array(FieldType::Int))),
        ],
    )
}

/// Index over `people` with the default configuration.
pub(crate) fn people_index(paths: &[&str]) -> ResolvedIndex {
    people_index_with(paths, IndexConfig::default())
}

pub(crate) fn people_index_with(paths: &[&str], config: IndexConfig) -> ResolvedIndex {
    let fields = paths.iter().map(|path| parse_spec(path)).collect();
    let def = IndexDef::new("idx_people", fields).with_config(config);

    ResolvedIndex::resolve(&people_table(), &def).expect("fixture index should resolve")
}

/// Index over a synthetic table whose fields `f0..fn` have the given types.
pub(crate) fn typed_index(types: &[FieldType], config: IndexConfig) -> ResolvedIndex {
    let fields = types
        .iter()
        .enumerate()
        .map(|(i, ty)| FieldDef::new(format!("f{i}"), ty.clone()))
        .collect();
    let table = TableDef::new("synthetic", fields);
    let specs = (0..types.len())
        .map(|i| IndexFieldSpec::new(format!("f{i}")))
        .collect();
    let def = IndexDef::new("idx_synthetic", specs).with_config(config);

    ResolvedIndex::resolve(&table, &def).expect("fixture index should resolve")
}

// `path AS type` shorthand for json paths.
fn parse_spec(raw: &str) -> IndexFieldSpec {
    let Some((path, ty)) = raw.split_once(" AS ") else {
        return IndexFieldSpec::new(raw);
    };
    let ty = match ty {
        "INTEGER" => JsonScalarType::Integer,
        "LONG" => JsonScalarType::Long,
        "DOUBLE" => JsonScalarType::Double,
        "NUMBER" => JsonScalarType::Number,
        "STRING" => JsonScalarType::String,
        "BOOLEAN" => JsonScalarType::Boolean,
        other => panic!("unknown json type {other}"),
    };

    IndexFieldSpec::json(path, ty)
}
