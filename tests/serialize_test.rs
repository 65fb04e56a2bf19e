//! Integration tests for catalog JSON export.
//!
//! Covers:
//! - Self-referencing and mutually referencing tables
//! - Back-reference filtering at every depth
//! - Token consistency (@id before @ref, unique @id)
//! - Error paths: missing destination, malformed catalog, failing writer

use serde_json::{Map, Value};
use sql_catalog::catalog::{
    Catalog, Column, ColumnId, ColumnRef, DatabaseInfo, ForeignKey, ForeignKeyRule, Table,
    TableId,
};
use sql_catalog::serialize::{
    serialize, serialize_with, ExportEngine, ExportOptions, FieldFilter, IdentityStrategy,
    JsonSerializedCatalog, SerializationError,
};
use std::collections::HashSet;
use std::io::{self, Read, Seek, SeekFrom, Write};

fn self_referencing_catalog() -> Catalog {
    let mut catalog = Catalog::new("scenario", DatabaseInfo::new("SQLite", "sqlite"));
    let main = catalog.add_schema("main");

    let mut table = Table::new("T");
    let id = table.add_column(Column::new("id", "INTEGER"));
    let fk = table.add_column(Column::new("fk", "INTEGER"));
    table.set_primary_key("pk_T", vec![id]);
    let t = catalog.add_table(main, table);

    let mut key = ForeignKey::new("fk_T_T", t, t);
    key.add_column_reference(fk, id);
    catalog.add_foreign_key(key);
    catalog
}

fn mutually_referencing_catalog() -> Catalog {
    let mut catalog = Catalog::new("cycle", DatabaseInfo::new("SQLite", "sqlite"));
    let main = catalog.add_schema("main");

    let mut a = Table::new("A");
    let a_id = a.add_column(Column::new("id", "INTEGER"));
    let a_b = a.add_column(Column::new("b_id", "INTEGER"));
    a.set_primary_key("pk_A", vec![a_id]);
    let a = catalog.add_table(main, a);

    let mut b = Table::new("B");
    let b_id = b.add_column(Column::new("id", "INTEGER"));
    let b_a = b.add_column(Column::new("a_id", "INTEGER"));
    b.set_primary_key("pk_B", vec![b_id]);
    let b = catalog.add_table(main, b);

    let mut a_to_b = ForeignKey::new("fk_A_B", a, b);
    a_to_b.add_column_reference(a_b, b_id);
    a_to_b.delete_rule = ForeignKeyRule::Cascade;
    catalog.add_foreign_key(a_to_b);

    let mut b_to_a = ForeignKey::new("fk_B_A", b, a);
    b_to_a.add_column_reference(b_a, a_id);
    catalog.add_foreign_key(b_to_a);
    catalog
}

fn export(catalog: &Catalog) -> String {
    let mut out = Vec::new();
    serialize(catalog, Some(&mut out)).unwrap();
    String::from_utf8(out).unwrap()
}

fn export_value(catalog: &Catalog) -> Value {
    serde_json::from_str(&export(catalog)).unwrap()
}

/// Visit every object in document order
fn walk<'a>(value: &'a Value, visit: &mut dyn FnMut(&'a Map<String, Value>)) {
    match value {
        Value::Object(map) => {
            visit(map);
            for child in map.values() {
                walk(child, visit);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, visit);
            }
        }
        _ => {}
    }
}

fn all_keys(value: &Value) -> HashSet<String> {
    let mut keys = HashSet::new();
    walk(value, &mut |map| keys.extend(map.keys().cloned()));
    keys
}

// =============================================================================
// Scenario and invariants
// =============================================================================

#[test]
fn test_self_referencing_table_scenario() {
    let json = export_value(&self_referencing_catalog());

    let table = &json["schemas"][0]["tables"][0];
    assert_eq!(table["name"], "T");
    assert_eq!(table["fullName"], "main.T");

    let columns = table["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 2);
    assert!(columns.iter().all(|c| c.get("parent").is_none()));
    assert_eq!(columns[0]["name"], "id");
    assert_eq!(columns[1]["name"], "fk");

    // fk points back into T through a reference, not a second copy
    assert_eq!(columns[1]["referencedColumn"]["@ref"], columns[0]["@id"]);
    assert_eq!(columns[1]["partOfForeignKey"], true);
    assert_eq!(columns[0]["partOfPrimaryKey"], true);
    assert_eq!(columns[0]["referencedColumn"], Value::Null);

    // the catalog-level table list sees T again
    assert_eq!(json["tables"][0]["@ref"], table["@id"]);
}

#[test]
fn test_export_is_deterministic() {
    let catalog = mutually_referencing_catalog();
    let first = export(&catalog);
    let second = export(&catalog);
    assert_eq!(first, second);
}

#[test]
fn test_mutual_references_emit_each_table_once() {
    let json = export_value(&mutually_referencing_catalog());

    let mut full_tables = Vec::new();
    walk(&json, &mut |map| {
        if map.contains_key("@id") && map.get("tableType").is_some() {
            full_tables.push(map["name"].as_str().unwrap().to_string());
        }
    });
    full_tables.sort();
    assert_eq!(full_tables, vec!["A", "B"]);
}

#[test]
fn test_back_references_never_appear() {
    let keys = all_keys(&export_value(&mutually_referencing_catalog()));
    assert!(!keys.contains("parent"));
    assert!(!keys.contains("importedForeignKeys"));
    assert!(!keys.contains("exportedForeignKeys"));
    assert!(keys.contains("foreignKeys"));
    assert!(keys.contains("columnReferences"));
}

#[test]
fn test_every_ref_points_to_an_earlier_id() {
    let json = export_value(&mutually_referencing_catalog());

    let mut seen = HashSet::new();
    let mut duplicate_ids = Vec::new();
    let mut dangling_refs = Vec::new();
    walk(&json, &mut |map| {
        if let Some(id) = map.get("@id").and_then(Value::as_str) {
            if !seen.insert(id.to_string()) {
                duplicate_ids.push(id.to_string());
            }
        }
        if let Some(token) = map.get("@ref").and_then(Value::as_str) {
            assert_eq!(map.len(), 1, "a reference carries no other keys");
            if !seen.contains(token) {
                dangling_refs.push(token.to_string());
            }
        }
    });

    assert!(duplicate_ids.is_empty(), "duplicate ids: {:?}", duplicate_ids);
    assert!(dangling_refs.is_empty(), "dangling refs: {:?}", dangling_refs);
}

#[test]
fn test_keys_are_alphabetical_in_output() {
    let text = export(&self_referencing_catalog());
    let root_keys: Vec<&str> = text
        .lines()
        .filter(|l| l.starts_with("  \"") && !l.starts_with("   "))
        .filter_map(|l| l.trim().split('"').nth(1))
        .collect();
    assert_eq!(
        root_keys,
        vec!["@id", "attributes", "databaseInfo", "name", "schemas", "tables"]
    );
}

#[test]
fn test_enumerated_values_render_as_labels() {
    let json = export_value(&mutually_referencing_catalog());
    let table = &json["schemas"][0]["tables"][0];
    let fk = &table["foreignKeys"][0];

    assert_eq!(fk["constraintType"], "FOREIGN_KEY");
    assert_eq!(fk["deleteRule"], "cascade");
    assert_eq!(fk["updateRule"], "unknown");
    assert_eq!(table["tableType"], "TABLE");
    assert_eq!(table["primaryKey"]["constraintType"], "PRIMARY_KEY");
    assert_eq!(fk["columnReferences"][0]["keySequence"], 1);
}

#[test]
fn test_equal_named_columns_get_distinct_tokens() {
    let json = export_value(&mutually_referencing_catalog());

    let mut id_columns = Vec::new();
    walk(&json, &mut |map| {
        if map.get("columnDataType").is_some() && map["name"] == "id" {
            id_columns.push((
                map["fullName"].as_str().unwrap().to_string(),
                map["@id"].as_str().unwrap().to_string(),
            ));
        }
    });
    id_columns.sort();

    assert_eq!(id_columns.len(), 2);
    assert_eq!(id_columns[0].0, "A.id");
    assert_eq!(id_columns[1].0, "B.id");
    assert_ne!(id_columns[0].1, id_columns[1].1);
}

#[test]
fn test_uuid_identity_strategy() {
    let catalog = self_referencing_catalog();
    let options = ExportOptions {
        identity: IdentityStrategy::Uuid,
        ..ExportOptions::default()
    };
    let mut out = Vec::new();
    serialize_with(&catalog, Some(&mut out), &options).unwrap();
    let json: Value = serde_json::from_slice(&out).unwrap();

    let id = json["@id"].as_str().unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(json["tables"][0]["@ref"], json["schemas"][0]["tables"][0]["@id"]);
}

#[test]
fn test_concurrent_exports_do_not_share_tokens() {
    let catalog = mutually_referencing_catalog();
    let expected = export(&catalog);

    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| export(&catalog))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(outputs.iter().all(|o| *o == expected));
}

#[test]
fn test_custom_filter_through_engine() {
    let catalog = self_referencing_catalog();
    let filter = FieldFilter::serialize_all_except("lean", ["parent", "remarks", "attributes"]);
    let mut out = Vec::new();
    ExportEngine::new(&catalog, &filter, ExportOptions::default())
        .write(&catalog, &mut out)
        .unwrap();

    let keys = all_keys(&serde_json::from_slice(&out).unwrap());
    assert!(!keys.contains("remarks"));
    assert!(!keys.contains("attributes"));
    // not excluded by this filter
    assert!(keys.contains("importedForeignKeys"));
}

// =============================================================================
// Destinations and errors
// =============================================================================

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }
}

#[test]
fn test_missing_destination_writes_nothing() {
    let err = serialize(&self_referencing_catalog(), None::<&mut Vec<u8>>).unwrap_err();
    assert!(matches!(err, SerializationError::MissingDestination));
    assert!(err.is_precondition_violation());
    assert_eq!(err.to_string(), "no output destination provided");
}

#[test]
fn test_malformed_catalog_fails_before_writing() {
    let mut catalog = self_referencing_catalog();
    catalog.tables[0].columns[1].referenced_column =
        Some(ColumnRef::new(TableId(9), ColumnId(0)));

    let mut out = Vec::new();
    let err = serialize(&catalog, Some(&mut out)).unwrap_err();

    assert!(matches!(err, SerializationError::InvalidCatalog(_)));
    assert!(err.is_precondition_violation());
    assert!(out.is_empty());
}

#[test]
fn test_write_failure_is_wrapped() {
    let err = serialize(&self_referencing_catalog(), Some(FailingWriter)).unwrap_err();

    assert!(matches!(err, SerializationError::Serialize(_)));
    assert!(!err.is_precondition_violation());
    assert_eq!(err.to_string(), "could not serialize catalog");

    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("disk full"));
}

#[test]
fn test_destination_stays_open_after_save() {
    let serialized = JsonSerializedCatalog::new(self_referencing_catalog());
    let mut file = tempfile::tempfile().unwrap();

    serialized.save(&mut file).unwrap();
    file.write_all(b"\n-- trailer\n").unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();

    let (json, trailer) = contents.split_once("\n-- ").unwrap();
    assert!(serde_json::from_str::<Value>(json).is_ok());
    assert_eq!(trailer, "trailer\n");
}

#[test]
fn test_json_serialized_catalog_exposes_catalog() {
    let mut catalog = self_referencing_catalog();
    catalog
        .attributes
        .insert("source".to_string(), "scenario.sql".to_string());
    let serialized = JsonSerializedCatalog::new(catalog);

    assert_eq!(serialized.lookup_attribute("source"), Some("scenario.sql"));
    assert_eq!(serialized.len(), 1);

    let json: Value = serde_json::from_str(&serialized.to_json_string().unwrap()).unwrap();
    assert_eq!(json["attributes"]["source"], "scenario.sql");
    assert_eq!(serialized.into_inner().name, "scenario");
}
