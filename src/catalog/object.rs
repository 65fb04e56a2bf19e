//! Property enumeration for catalog entities.
//!
//! Every entity lists its properties explicitly, in declaration order. The
//! exporter sorts and filters them; entities never decide what is written.

use super::{
    Catalog, Column, ColumnId, ColumnRef, ColumnReference, DatabaseInfo, ForeignKey, Index,
    PrimaryKey, Schema, Table, TableConstraintType, TableId,
};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A named object in the catalog graph
pub trait CatalogObject {
    /// Entity kind, e.g. "table". Distinct per implementing type.
    fn kind(&self) -> &'static str;

    /// Properties in declaration order. References to other entities are
    /// resolved through `catalog`.
    fn properties<'a>(&'a self, catalog: &'a Catalog) -> Vec<Property<'a>>;
}

/// One named property of an entity
#[derive(Debug)]
pub struct Property<'a> {
    pub name: &'static str,
    pub value: PropertyValue<'a>,
}

impl<'a> Property<'a> {
    pub fn new(name: &'static str, value: PropertyValue<'a>) -> Self {
        Self { name, value }
    }
}

/// Typed property value
pub enum PropertyValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Text(Cow<'a, str>),
    /// Display label of an enumerated value
    Label(&'a str),
    Object(&'a dyn CatalogObject),
    /// Ordered sequence; order is preserved on export
    List(Vec<PropertyValue<'a>>),
    Attributes(&'a BTreeMap<String, String>),
}

impl std::fmt::Debug for PropertyValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "Null"),
            PropertyValue::Bool(b) => write!(f, "Bool({b})"),
            PropertyValue::Int(i) => write!(f, "Int({i})"),
            PropertyValue::Text(s) => write!(f, "Text({s:?})"),
            PropertyValue::Label(s) => write!(f, "Label({s})"),
            PropertyValue::Object(o) => write!(f, "Object({})", o.kind()),
            PropertyValue::List(items) => f.debug_list().entries(items).finish(),
            PropertyValue::Attributes(map) => write!(f, "Attributes({map:?})"),
        }
    }
}

impl<'a> PropertyValue<'a> {
    pub fn text(value: &'a str) -> Self {
        PropertyValue::Text(Cow::Borrowed(value))
    }

    pub fn optional_text(value: Option<&'a str>) -> Self {
        value.map_or(PropertyValue::Null, PropertyValue::text)
    }

    pub fn object(value: Option<&'a dyn CatalogObject>) -> Self {
        value.map_or(PropertyValue::Null, PropertyValue::Object)
    }

    pub fn objects<T, I>(items: I) -> Self
    where
        T: CatalogObject + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        PropertyValue::List(
            items
                .into_iter()
                .map(|item| PropertyValue::Object(item as &dyn CatalogObject))
                .collect(),
        )
    }
}

fn column_list<'a>(table: &'a Table, columns: &[ColumnId]) -> PropertyValue<'a> {
    PropertyValue::List(
        columns
            .iter()
            .map(|&id| PropertyValue::object(table.column(id).map(|c| c as &dyn CatalogObject)))
            .collect(),
    )
}

fn column_object(catalog: &Catalog, column: ColumnRef) -> PropertyValue<'_> {
    PropertyValue::object(catalog.column(column).map(|c| c as &dyn CatalogObject))
}

fn table_object(catalog: &Catalog, table: TableId) -> PropertyValue<'_> {
    PropertyValue::object(catalog.table(table).map(|t| t as &dyn CatalogObject))
}

impl CatalogObject for Catalog {
    fn kind(&self) -> &'static str {
        "catalog"
    }

    fn properties<'a>(&'a self, _catalog: &'a Catalog) -> Vec<Property<'a>> {
        vec![
            Property::new("name", PropertyValue::text(&self.name)),
            Property::new(
                "databaseInfo",
                PropertyValue::Object(&self.database_info),
            ),
            Property::new("schemas", PropertyValue::objects(&self.schemas)),
            Property::new("tables", PropertyValue::objects(&self.tables)),
            Property::new("attributes", PropertyValue::Attributes(&self.attributes)),
        ]
    }
}

impl CatalogObject for DatabaseInfo {
    fn kind(&self) -> &'static str {
        "databaseInfo"
    }

    fn properties<'a>(&'a self, _catalog: &'a Catalog) -> Vec<Property<'a>> {
        vec![
            Property::new("name", PropertyValue::text(&self.product_name)),
            Property::new(
                "productVersion",
                PropertyValue::optional_text(self.product_version.as_deref()),
            ),
            Property::new("serverType", PropertyValue::text(&self.server_type)),
        ]
    }
}

impl CatalogObject for Schema {
    fn kind(&self) -> &'static str {
        "schema"
    }

    fn properties<'a>(&'a self, catalog: &'a Catalog) -> Vec<Property<'a>> {
        let full_name = match &self.catalog_name {
            Some(catalog_name) => Cow::Owned(format!("{}.{}", catalog_name, self.name)),
            None => Cow::Borrowed(self.name.as_str()),
        };
        vec![
            Property::new("name", PropertyValue::text(&self.name)),
            Property::new(
                "catalogName",
                PropertyValue::optional_text(self.catalog_name.as_deref()),
            ),
            Property::new("fullName", PropertyValue::Text(full_name)),
            Property::new("parent", PropertyValue::Object(catalog)),
            Property::new(
                "tables",
                PropertyValue::List(
                    self.tables
                        .iter()
                        .map(|&id| table_object(catalog, id))
                        .collect(),
                ),
            ),
        ]
    }
}

impl CatalogObject for Table {
    fn kind(&self) -> &'static str {
        "table"
    }

    fn properties<'a>(&'a self, catalog: &'a Catalog) -> Vec<Property<'a>> {
        let schema = catalog.schema(self.schema);
        let full_name = match schema {
            Some(schema) => format!("{}.{}", schema.name, self.name),
            None => self.name.clone(),
        };
        vec![
            Property::new("name", PropertyValue::text(&self.name)),
            Property::new("fullName", PropertyValue::Text(Cow::Owned(full_name))),
            Property::new("tableType", PropertyValue::Label(self.table_type.label())),
            Property::new(
                "parent",
                PropertyValue::object(schema.map(|s| s as &dyn CatalogObject)),
            ),
            Property::new("columns", PropertyValue::objects(&self.columns)),
            Property::new(
                "primaryKey",
                PropertyValue::object(self.primary_key.as_ref().map(|pk| pk as &dyn CatalogObject)),
            ),
            Property::new("indexes", PropertyValue::objects(&self.indexes)),
            Property::new(
                "foreignKeys",
                PropertyValue::objects(catalog.table_foreign_keys(self.id)),
            ),
            Property::new(
                "importedForeignKeys",
                PropertyValue::objects(catalog.imported_foreign_keys(self.id)),
            ),
            Property::new(
                "exportedForeignKeys",
                PropertyValue::objects(catalog.exported_foreign_keys(self.id)),
            ),
            Property::new("remarks", PropertyValue::text(&self.remarks)),
            Property::new("attributes", PropertyValue::Attributes(&self.attributes)),
        ]
    }
}

impl CatalogObject for Column {
    fn kind(&self) -> &'static str {
        "column"
    }

    fn properties<'a>(&'a self, catalog: &'a Catalog) -> Vec<Property<'a>> {
        let table = catalog.table(self.table);
        let full_name = match table {
            Some(table) => format!("{}.{}", table.name, self.name),
            None => self.name.clone(),
        };
        let referenced_column = match self.referenced_column {
            Some(column) => column_object(catalog, column),
            None => PropertyValue::Null,
        };
        vec![
            Property::new("name", PropertyValue::text(&self.name)),
            Property::new("fullName", PropertyValue::Text(Cow::Owned(full_name))),
            Property::new(
                "parent",
                PropertyValue::object(table.map(|t| t as &dyn CatalogObject)),
            ),
            Property::new("ordinalPosition", PropertyValue::Int(self.ordinal.0 as i64 + 1)),
            Property::new("columnDataType", PropertyValue::text(&self.declared_type)),
            Property::new("typeCategory", PropertyValue::Label(self.col_type.label())),
            Property::new("nullable", PropertyValue::Bool(self.is_nullable)),
            Property::new(
                "defaultValue",
                PropertyValue::optional_text(self.default_value.as_deref()),
            ),
            Property::new("partOfPrimaryKey", PropertyValue::Bool(self.is_primary_key)),
            Property::new(
                "partOfForeignKey",
                PropertyValue::Bool(catalog.is_fk_column(ColumnRef::new(self.table, self.ordinal))),
            ),
            Property::new("referencedColumn", referenced_column),
        ]
    }
}

impl CatalogObject for PrimaryKey {
    fn kind(&self) -> &'static str {
        "primaryKey"
    }

    fn properties<'a>(&'a self, catalog: &'a Catalog) -> Vec<Property<'a>> {
        let table = catalog.table(self.table);
        let columns = match table {
            Some(table) => column_list(table, &self.columns),
            None => PropertyValue::List(Vec::new()),
        };
        vec![
            Property::new("name", PropertyValue::text(&self.name)),
            Property::new(
                "constraintType",
                PropertyValue::Label(TableConstraintType::PrimaryKey.label()),
            ),
            Property::new(
                "parent",
                PropertyValue::object(table.map(|t| t as &dyn CatalogObject)),
            ),
            Property::new("columns", columns),
        ]
    }
}

impl CatalogObject for Index {
    fn kind(&self) -> &'static str {
        "index"
    }

    fn properties<'a>(&'a self, catalog: &'a Catalog) -> Vec<Property<'a>> {
        let table = catalog.table(self.table);
        let columns = match table {
            Some(table) => column_list(table, &self.columns),
            None => PropertyValue::List(Vec::new()),
        };
        let constraint_type = if self.is_unique {
            PropertyValue::Label(TableConstraintType::Unique.label())
        } else {
            PropertyValue::Null
        };
        vec![
            Property::new("name", PropertyValue::text(&self.name)),
            Property::new("constraintType", constraint_type),
            Property::new("indexType", PropertyValue::Label(self.index_type.label())),
            Property::new("unique", PropertyValue::Bool(self.is_unique)),
            Property::new(
                "parent",
                PropertyValue::object(table.map(|t| t as &dyn CatalogObject)),
            ),
            Property::new("columns", columns),
        ]
    }
}

impl CatalogObject for ForeignKey {
    fn kind(&self) -> &'static str {
        "foreignKey"
    }

    fn properties<'a>(&'a self, catalog: &'a Catalog) -> Vec<Property<'a>> {
        vec![
            Property::new("name", PropertyValue::text(&self.name)),
            Property::new(
                "constraintType",
                PropertyValue::Label(TableConstraintType::ForeignKey.label()),
            ),
            Property::new("parent", table_object(catalog, self.table)),
            Property::new(
                "columnReferences",
                PropertyValue::objects(&self.column_references),
            ),
            Property::new("updateRule", PropertyValue::Label(self.update_rule.label())),
            Property::new("deleteRule", PropertyValue::Label(self.delete_rule.label())),
        ]
    }
}

impl CatalogObject for ColumnReference {
    fn kind(&self) -> &'static str {
        "columnReference"
    }

    fn properties<'a>(&'a self, catalog: &'a Catalog) -> Vec<Property<'a>> {
        vec![
            Property::new("keySequence", PropertyValue::Int(self.key_sequence as i64)),
            Property::new(
                "foreignKeyColumn",
                column_object(catalog, self.foreign_key_column),
            ),
            Property::new(
                "primaryKeyColumn",
                column_object(catalog, self.primary_key_column),
            ),
        ]
    }
}
