//! In-memory database catalog model.
//!
//! This module provides:
//! - An arena-owned graph of schemas, tables, columns and constraints
//! - Typed ids for cross references (tables → schemas, columns → columns, ...)
//! - Derived views such as imported/exported foreign keys
//! - Validation that every id in the graph resolves
//!
//! Entities never hold pointers to each other. Back references (a column's
//! parent table, a table's schema) are ids resolved through the owning
//! [`Catalog`], which keeps the graph cyclic without shared ownership.

mod object;

pub use object::*;

use ahash::AHashMap;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Unique identifier for a schema within a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaId(pub u32);

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaId({})", self.0)
    }
}

/// Unique identifier for a table within a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

/// Unique identifier for a column within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub u16);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnId({})", self.0)
    }
}

/// Unique identifier for a foreign key within a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignKeyId(pub u32);

impl fmt::Display for ForeignKeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignKeyId({})", self.0)
    }
}

/// Fully qualified column address: owning table plus position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: TableId,
    pub column: ColumnId,
}

impl ColumnRef {
    pub fn new(table: TableId, column: ColumnId) -> Self {
        Self { table, column }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Errors raised when the catalog graph contains ids that do not resolve
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("{owner} references unknown schema {id}")]
    UnknownSchema { owner: String, id: SchemaId },

    #[error("{owner} references unknown table {id}")]
    UnknownTable { owner: String, id: TableId },

    #[error("{owner} references unknown column {column}")]
    UnknownColumn { owner: String, column: ColumnRef },

    #[error("{kind} stored at position {position} carries id {id}")]
    MisplacedEntity {
        kind: &'static str,
        position: usize,
        id: u32,
    },
}

/// SQL column type classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Integer types: INT, INTEGER, TINYINT, SMALLINT, MEDIUMINT
    Int,
    /// Big integer types: BIGINT
    BigInt,
    /// Text types: CHAR, VARCHAR, TEXT, etc.
    Text,
    /// UUID types (detected by column name or type)
    Uuid,
    /// Decimal/numeric types
    Decimal,
    /// Date/time types
    DateTime,
    /// Boolean type
    Bool,
    /// Binary types: BLOB, BYTEA, VARBINARY
    Binary,
    /// Any other type
    Other(String),
}

impl ColumnType {
    /// Classify a declared SQL type.
    /// Supports MySQL, PostgreSQL, and SQLite spellings.
    pub fn from_sql_type(type_str: &str) -> Self {
        let type_lower = type_str.to_lowercase();
        let base_type = type_lower.split('(').next().unwrap_or(&type_lower).trim();

        match base_type {
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "int4" | "int2" => {
                ColumnType::Int
            }
            "serial" | "smallserial" => ColumnType::Int,
            "bigint" | "int8" | "bigserial" => ColumnType::BigInt,
            "char" | "varchar" | "text" | "tinytext" | "mediumtext" | "longtext" | "enum"
            | "set" | "character" | "clob" | "nvarchar" | "nchar" => ColumnType::Text,
            "decimal" | "numeric" | "float" | "double" | "real" | "float4" | "float8" | "money" => {
                ColumnType::Decimal
            }
            "date" | "datetime" | "timestamp" | "time" | "year" | "timestamptz" | "timetz"
            | "interval" => ColumnType::DateTime,
            "bool" | "boolean" => ColumnType::Bool,
            "binary" | "varbinary" | "blob" | "bytea" => {
                // binary(16) is the usual UUID storage
                if type_lower.contains("16") {
                    ColumnType::Uuid
                } else {
                    ColumnType::Binary
                }
            }
            "uuid" => ColumnType::Uuid,
            _ => ColumnType::Other(type_str.to_string()),
        }
    }

    /// Display label used in exported documents
    pub fn label(&self) -> &str {
        match self {
            ColumnType::Int => "INT",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Text => "TEXT",
            ColumnType::Uuid => "UUID",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Bool => "BOOL",
            ColumnType::Binary => "BINARY",
            ColumnType::Other(name) => name,
        }
    }
}

/// Kind of relation a table entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableType {
    #[default]
    Table,
    View,
}

impl TableType {
    pub fn label(&self) -> &'static str {
        match self {
            TableType::Table => "TABLE",
            TableType::View => "VIEW",
        }
    }
}

/// Constraint classification shared by primary keys, unique indexes and foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableConstraintType {
    PrimaryKey,
    ForeignKey,
    Unique,
}

impl TableConstraintType {
    pub fn label(&self) -> &'static str {
        match self {
            TableConstraintType::PrimaryKey => "PRIMARY_KEY",
            TableConstraintType::ForeignKey => "FOREIGN_KEY",
            TableConstraintType::Unique => "UNIQUE",
        }
    }
}

/// Referential action for ON UPDATE / ON DELETE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForeignKeyRule {
    #[default]
    Unknown,
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
}

impl ForeignKeyRule {
    /// Parse the action keywords of an ON UPDATE / ON DELETE clause
    pub fn from_sql(action: &str) -> Self {
        let normalized = action.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_uppercase().as_str() {
            "NO ACTION" => ForeignKeyRule::NoAction,
            "CASCADE" => ForeignKeyRule::Cascade,
            "SET NULL" => ForeignKeyRule::SetNull,
            "SET DEFAULT" => ForeignKeyRule::SetDefault,
            "RESTRICT" => ForeignKeyRule::Restrict,
            _ => ForeignKeyRule::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ForeignKeyRule::Unknown => "unknown",
            ForeignKeyRule::NoAction => "no action",
            ForeignKeyRule::Cascade => "cascade",
            ForeignKeyRule::SetNull => "set null",
            ForeignKeyRule::SetDefault => "set default",
            ForeignKeyRule::Restrict => "restrict",
        }
    }
}

/// Index access method
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IndexType {
    #[default]
    Unknown,
    BTree,
    Hash,
    Other(String),
}

impl IndexType {
    /// Parse the method named in `USING <method>`
    pub fn from_sql(method: &str) -> Self {
        match method.to_uppercase().as_str() {
            "BTREE" => IndexType::BTree,
            "HASH" => IndexType::Hash,
            "" => IndexType::Unknown,
            other => IndexType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            IndexType::Unknown => "unknown",
            IndexType::BTree => "BTREE",
            IndexType::Hash => "HASH",
            IndexType::Other(method) => method,
        }
    }
}

/// Product information for the database the catalog was read from
#[derive(Debug, Clone, Default)]
pub struct DatabaseInfo {
    /// Product name, e.g. "SQLite"
    pub product_name: String,
    /// Product version when known
    pub product_version: Option<String>,
    /// Connector server type id, e.g. "sqlite"
    pub server_type: String,
}

impl DatabaseInfo {
    pub fn new(product_name: impl Into<String>, server_type: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            product_version: None,
            server_type: server_type.into(),
        }
    }
}

/// Schema (namespace) holding tables
#[derive(Debug, Clone)]
pub struct Schema {
    pub id: SchemaId,
    /// Catalog-level qualifier, if the database has one
    pub catalog_name: Option<String>,
    pub name: String,
    /// Tables in declaration order
    pub tables: Vec<TableId>,
}

/// Column definition within a table
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Owning table (set when the table is added to a catalog)
    pub table: TableId,
    /// Position in table (0-indexed)
    pub ordinal: ColumnId,
    /// Type as written in the DDL, e.g. "VARCHAR(255)"
    pub declared_type: String,
    /// Classified type
    pub col_type: ColumnType,
    /// Whether this column allows NULL values
    pub is_nullable: bool,
    /// Whether this column is part of the primary key
    pub is_primary_key: bool,
    /// DEFAULT expression as written
    pub default_value: Option<String>,
    /// Column referenced through a foreign key, if any
    pub referenced_column: Option<ColumnRef>,
}

impl Column {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        Self {
            name: name.into(),
            table: TableId(0),
            ordinal: ColumnId(0),
            col_type: ColumnType::from_sql_type(&declared_type),
            declared_type,
            is_nullable: true,
            is_primary_key: false,
            default_value: None,
            referenced_column: None,
        }
    }
}

/// Primary key constraint
#[derive(Debug, Clone)]
pub struct PrimaryKey {
    pub name: String,
    pub table: TableId,
    /// Key columns in key order
    pub columns: Vec<ColumnId>,
}

/// Index definition
#[derive(Debug, Clone)]
pub struct Index {
    pub name: String,
    pub table: TableId,
    /// Indexed columns in index order
    pub columns: Vec<ColumnId>,
    pub is_unique: bool,
    pub index_type: IndexType,
}

/// Complete table definition
#[derive(Debug, Clone)]
pub struct Table {
    pub id: TableId,
    pub schema: SchemaId,
    pub name: String,
    pub table_type: TableType,
    /// Column definitions in order
    pub columns: Vec<Column>,
    pub primary_key: Option<PrimaryKey>,
    pub indexes: Vec<Index>,
    pub remarks: String,
    pub attributes: BTreeMap<String, String>,
}

impl Table {
    /// Create a new empty table; ids are assigned by [`Catalog::add_table`]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TableId(0),
            schema: SchemaId(0),
            name: name.into(),
            table_type: TableType::Table,
            columns: Vec::new(),
            primary_key: None,
            indexes: Vec::new(),
            remarks: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Append a column, returning its position
    pub fn add_column(&mut self, mut column: Column) -> ColumnId {
        let id = ColumnId(self.columns.len() as u16);
        column.ordinal = id;
        column.table = self.id;
        self.columns.push(column);
        id
    }

    /// Get a column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get column ID by name
    pub fn get_column_id(&self, name: &str) -> Option<ColumnId> {
        self.get_column(name).map(|c| c.ordinal)
    }

    /// Get column by ID
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.get(id.0 as usize)
    }

    /// Declare the primary key, flagging its columns
    pub fn set_primary_key(&mut self, name: impl Into<String>, columns: Vec<ColumnId>) {
        for id in &columns {
            if let Some(column) = self.columns.get_mut(id.0 as usize) {
                column.is_primary_key = true;
                column.is_nullable = false;
            }
        }
        self.primary_key = Some(PrimaryKey {
            name: name.into(),
            table: self.id,
            columns,
        });
    }

    /// Check if column is part of the primary key
    pub fn is_pk_column(&self, col_id: ColumnId) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.columns.contains(&col_id))
    }

    fn assign_id(&mut self, id: TableId, schema: SchemaId) {
        self.id = id;
        self.schema = schema;
        for column in &mut self.columns {
            column.table = id;
        }
        if let Some(pk) = &mut self.primary_key {
            pk.table = id;
        }
        for index in &mut self.indexes {
            index.table = id;
        }
    }
}

/// One column pair of a foreign key
#[derive(Debug, Clone)]
pub struct ColumnReference {
    /// 1-based position within the key
    pub key_sequence: u16,
    pub foreign_key_column: ColumnRef,
    pub primary_key_column: ColumnRef,
}

/// Foreign key constraint
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub id: ForeignKeyId,
    pub name: String,
    /// Referencing (child) table
    pub table: TableId,
    /// Referenced (parent) table
    pub referenced_table: TableId,
    pub column_references: Vec<ColumnReference>,
    pub update_rule: ForeignKeyRule,
    pub delete_rule: ForeignKeyRule,
}

impl ForeignKey {
    pub fn new(name: impl Into<String>, table: TableId, referenced_table: TableId) -> Self {
        Self {
            id: ForeignKeyId(0),
            name: name.into(),
            table,
            referenced_table,
            column_references: Vec::new(),
            update_rule: ForeignKeyRule::Unknown,
            delete_rule: ForeignKeyRule::Unknown,
        }
    }

    /// Append a column pair; key sequence follows insertion order
    pub fn add_column_reference(&mut self, foreign_key_column: ColumnId, primary_key_column: ColumnId) {
        let key_sequence = self.column_references.len() as u16 + 1;
        self.column_references.push(ColumnReference {
            key_sequence,
            foreign_key_column: ColumnRef::new(self.table, foreign_key_column),
            primary_key_column: ColumnRef::new(self.referenced_table, primary_key_column),
        });
    }
}

/// Complete database catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    pub name: String,
    pub database_info: DatabaseInfo,
    /// Schemas indexed by SchemaId
    pub schemas: Vec<Schema>,
    /// Tables indexed by TableId
    pub tables: Vec<Table>,
    /// Foreign keys indexed by ForeignKeyId
    pub foreign_keys: Vec<ForeignKey>,
    /// Free-form crawl attributes
    pub attributes: BTreeMap<String, String>,
    /// Map from table name to table ID
    table_names: AHashMap<String, TableId>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new(name: impl Into<String>, database_info: DatabaseInfo) -> Self {
        Self {
            name: name.into(),
            database_info,
            schemas: Vec::new(),
            tables: Vec::new(),
            foreign_keys: Vec::new(),
            attributes: BTreeMap::new(),
            table_names: AHashMap::new(),
        }
    }

    /// Add a schema, returning its ID
    pub fn add_schema(&mut self, name: impl Into<String>) -> SchemaId {
        let id = SchemaId(self.schemas.len() as u32);
        self.schemas.push(Schema {
            id,
            catalog_name: None,
            name: name.into(),
            tables: Vec::new(),
        });
        id
    }

    /// Add a table to a schema, returning its ID.
    ///
    /// Column, primary key and index back references are rewritten to the
    /// new id.
    pub fn add_table(&mut self, schema: SchemaId, mut table: Table) -> TableId {
        let id = TableId(self.tables.len() as u32);
        table.assign_id(id, schema);
        if let Some(s) = self.schemas.get_mut(schema.0 as usize) {
            s.tables.push(id);
        }
        self.table_names.insert(table.name.clone(), id);
        self.tables.push(table);
        id
    }

    /// Add a foreign key, returning its ID.
    ///
    /// Each referencing column gets its `referenced_column` set.
    pub fn add_foreign_key(&mut self, mut fk: ForeignKey) -> ForeignKeyId {
        let id = ForeignKeyId(self.foreign_keys.len() as u32);
        fk.id = id;
        for reference in &fk.column_references {
            if let Some(column) = self.column_mut(reference.foreign_key_column) {
                column.referenced_column = Some(reference.primary_key_column);
            }
        }
        self.foreign_keys.push(fk);
        id
    }

    pub fn schema(&self, id: SchemaId) -> Option<&Schema> {
        self.schemas.get(id.0 as usize)
    }

    /// Get table by ID
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0 as usize)
    }

    /// Get mutable table by ID
    pub fn table_mut(&mut self, id: TableId) -> Option<&mut Table> {
        self.tables.get_mut(id.0 as usize)
    }

    /// Get table ID by name (case-insensitive)
    pub fn get_table_id(&self, name: &str) -> Option<TableId> {
        if let Some(&id) = self.table_names.get(name) {
            return Some(id);
        }
        let name_lower = name.to_lowercase();
        self.table_names
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, &id)| id)
    }

    /// Get table by name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.get_table_id(name).and_then(|id| self.table(id))
    }

    pub fn column(&self, column: ColumnRef) -> Option<&Column> {
        self.table(column.table).and_then(|t| t.column(column.column))
    }

    fn column_mut(&mut self, column: ColumnRef) -> Option<&mut Column> {
        self.table_mut(column.table)
            .and_then(|t| t.columns.get_mut(column.column.0 as usize))
    }

    pub fn foreign_key(&self, id: ForeignKeyId) -> Option<&ForeignKey> {
        self.foreign_keys.get(id.0 as usize)
    }

    /// Foreign keys declared on this table
    pub fn imported_foreign_keys(&self, table: TableId) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys.iter().filter(move |fk| fk.table == table)
    }

    /// Foreign keys in any table that reference this table
    pub fn exported_foreign_keys(&self, table: TableId) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.referenced_table == table)
    }

    /// All foreign keys touching this table, each listed once
    pub fn table_foreign_keys(&self, table: TableId) -> impl Iterator<Item = &ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.table == table || fk.referenced_table == table)
    }

    /// Whether any foreign key uses this column on its referencing side
    pub fn is_fk_column(&self, column: ColumnRef) -> bool {
        self.imported_foreign_keys(column.table).any(|fk| {
            fk.column_references
                .iter()
                .any(|r| r.foreign_key_column == column)
        })
    }

    /// Look up a crawl attribute
    pub fn lookup_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Get the number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if catalog has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate over all tables
    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Check that every id stored in the graph resolves.
    ///
    /// Export relies on this: an unresolvable reference is reported here
    /// instead of surfacing as a missing object halfway through a document.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (position, schema) in self.schemas.iter().enumerate() {
            if schema.id.0 as usize != position {
                return Err(CatalogError::MisplacedEntity {
                    kind: "schema",
                    position,
                    id: schema.id.0,
                });
            }
            for &table in &schema.tables {
                self.require_table(table, || format!("schema '{}'", schema.name))?;
            }
        }

        for (position, table) in self.tables.iter().enumerate() {
            if table.id.0 as usize != position {
                return Err(CatalogError::MisplacedEntity {
                    kind: "table",
                    position,
                    id: table.id.0,
                });
            }
            let owner = || format!("table '{}'", table.name);
            if self.schema(table.schema).is_none() {
                return Err(CatalogError::UnknownSchema {
                    owner: owner(),
                    id: table.schema,
                });
            }
            for column in &table.columns {
                let column_owner = || format!("column '{}.{}'", table.name, column.name);
                self.require_table(column.table, column_owner)?;
                if let Some(referenced) = column.referenced_column {
                    self.require_column(referenced, column_owner)?;
                }
            }
            if let Some(pk) = &table.primary_key {
                self.require_table(pk.table, owner)?;
                for &column in &pk.columns {
                    self.require_column(ColumnRef::new(pk.table, column), owner)?;
                }
            }
            for index in &table.indexes {
                self.require_table(index.table, owner)?;
                for &column in &index.columns {
                    self.require_column(ColumnRef::new(index.table, column), owner)?;
                }
            }
        }

        for (position, fk) in self.foreign_keys.iter().enumerate() {
            if fk.id.0 as usize != position {
                return Err(CatalogError::MisplacedEntity {
                    kind: "foreign key",
                    position,
                    id: fk.id.0,
                });
            }
            let owner = || format!("foreign key '{}'", fk.name);
            self.require_table(fk.table, owner)?;
            self.require_table(fk.referenced_table, owner)?;
            for reference in &fk.column_references {
                self.require_column(reference.foreign_key_column, owner)?;
                self.require_column(reference.primary_key_column, owner)?;
            }
        }

        Ok(())
    }

    fn require_table(
        &self,
        id: TableId,
        owner: impl Fn() -> String,
    ) -> Result<&Table, CatalogError> {
        self.table(id)
            .ok_or_else(|| CatalogError::UnknownTable { owner: owner(), id })
    }

    fn require_column(
        &self,
        column: ColumnRef,
        owner: impl Fn() -> String,
    ) -> Result<&Column, CatalogError> {
        self.column(column)
            .ok_or_else(|| CatalogError::UnknownColumn {
                owner: owner(),
                column,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_table_catalog() -> Catalog {
        let mut catalog = Catalog::new("shop", DatabaseInfo::new("SQLite", "sqlite"));
        let main = catalog.add_schema("main");

        let mut users = Table::new("users");
        let user_id = users.add_column(Column::new("id", "INTEGER"));
        users.add_column(Column::new("email", "TEXT"));
        users.set_primary_key("pk_users", vec![user_id]);
        let users = catalog.add_table(main, users);

        let mut orders = Table::new("orders");
        orders.add_column(Column::new("id", "INTEGER"));
        let order_user = orders.add_column(Column::new("user_id", "INTEGER"));
        let orders = catalog.add_table(main, orders);

        let mut fk = ForeignKey::new("fk_orders_users", orders, users);
        fk.add_column_reference(order_user, user_id);
        catalog.add_foreign_key(fk);
        catalog
    }

    #[test]
    fn test_column_type_parsing() {
        assert_eq!(ColumnType::from_sql_type("int(11)"), ColumnType::Int);
        assert_eq!(ColumnType::from_sql_type("VARCHAR(255)"), ColumnType::Text);
        assert_eq!(ColumnType::from_sql_type("BLOB"), ColumnType::Binary);
        assert_eq!(ColumnType::from_sql_type("binary(16)"), ColumnType::Uuid);
        assert_eq!(
            ColumnType::from_sql_type("GEOMETRY"),
            ColumnType::Other("GEOMETRY".to_string())
        );
        assert_eq!(ColumnType::from_sql_type("GEOMETRY").label(), "GEOMETRY");
    }

    #[test]
    fn test_add_table_rewrites_back_references() {
        let catalog = two_table_catalog();
        let orders = catalog.get_table("ORDERS").unwrap();
        assert_eq!(orders.id, TableId(1));
        assert!(orders.columns.iter().all(|c| c.table == TableId(1)));
        assert_eq!(catalog.schemas[0].tables, vec![TableId(0), TableId(1)]);
    }

    #[test]
    fn test_foreign_key_sets_referenced_column() {
        let catalog = two_table_catalog();
        let user_id = catalog.get_table("orders").unwrap().get_column("user_id").unwrap();
        assert_eq!(
            user_id.referenced_column,
            Some(ColumnRef::new(TableId(0), ColumnId(0)))
        );
        assert!(catalog.is_fk_column(ColumnRef::new(TableId(1), ColumnId(1))));
        assert!(!catalog.is_fk_column(ColumnRef::new(TableId(1), ColumnId(0))));
    }

    #[test]
    fn test_imported_and_exported_foreign_keys() {
        let catalog = two_table_catalog();
        assert_eq!(catalog.imported_foreign_keys(TableId(1)).count(), 1);
        assert_eq!(catalog.exported_foreign_keys(TableId(1)).count(), 0);
        assert_eq!(catalog.exported_foreign_keys(TableId(0)).count(), 1);
        assert_eq!(catalog.table_foreign_keys(TableId(0)).count(), 1);
    }

    #[test]
    fn test_validate_accepts_well_formed_catalog() {
        assert_eq!(two_table_catalog().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_dangling_column_reference() {
        let mut catalog = two_table_catalog();
        catalog.tables[1].columns[1].referenced_column =
            Some(ColumnRef::new(TableId(7), ColumnId(0)));
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, CatalogError::UnknownColumn { .. }));
        assert!(err.to_string().contains("orders.user_id"));
    }

    #[test]
    fn test_validate_rejects_misplaced_table() {
        let mut catalog = two_table_catalog();
        catalog.tables[0].id = TableId(5);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::MisplacedEntity { kind: "table", .. })
        ));
    }

    #[test]
    fn test_foreign_key_rule_parsing() {
        assert_eq!(ForeignKeyRule::from_sql("cascade"), ForeignKeyRule::Cascade);
        assert_eq!(ForeignKeyRule::from_sql("SET  NULL"), ForeignKeyRule::SetNull);
        assert_eq!(ForeignKeyRule::from_sql("no action").label(), "no action");
        assert_eq!(ForeignKeyRule::from_sql("bogus"), ForeignKeyRule::Unknown);
    }
}
