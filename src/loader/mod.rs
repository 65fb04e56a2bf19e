//! Catalog construction from SQL DDL dumps.
//!
//! Statements are read one at a time, classified, and schema statements are
//! folded into a [`Catalog`]. Foreign keys are kept pending until every table
//! has been seen, since dumps commonly declare a child table before its
//! parent or add constraints at the end with ALTER TABLE.

mod ddl;

pub use ddl::{
    parse_column_list, parse_create_index, parse_create_table_body, parse_foreign_keys,
    split_table_body, strip_comments, ColumnDef, ForeignKeyDef, Identifiers, IndexDef, TableDef,
};

use crate::catalog::{
    Catalog, Column, ColumnId, DatabaseInfo, ForeignKey, Index, SchemaId, Table, TableId,
    TableType,
};
use crate::connector::SchemaRetrievalOptions;
use crate::parser::{statement_type, Parser, StatementType, SMALL_BUFFER_SIZE};
use ahash::AHashMap;
use std::io::Read;

/// Counters reported after a load
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub statements: u64,
    pub schema_statements: u64,
    pub skipped: u64,
    pub unresolved_foreign_keys: u64,
}

#[derive(Debug)]
struct PendingForeignKey {
    table: TableId,
    def: ForeignKeyDef,
}

/// Incremental builder for a single-schema catalog
pub struct CatalogBuilder {
    catalog: Catalog,
    schema: SchemaId,
    identifiers: Identifiers,
    pending: Vec<PendingForeignKey>,
    stats: LoadStats,
}

impl CatalogBuilder {
    pub fn new(
        catalog_name: impl Into<String>,
        schema_name: impl Into<String>,
        options: &SchemaRetrievalOptions,
    ) -> Self {
        let server = &options.server_type;
        let mut catalog = Catalog::new(
            catalog_name,
            DatabaseInfo::new(server.name.clone(), server.id.clone()),
        );
        let schema = catalog.add_schema(schema_name);

        Self {
            catalog,
            schema,
            identifiers: Identifiers::new(options.identifier_quote_string.clone()),
            pending: Vec::new(),
            stats: LoadStats::default(),
        }
    }

    /// Fold one statement into the catalog.
    ///
    /// Returns the table the statement created or altered, if any.
    pub fn process_statement(&mut self, stmt: &str) -> Option<TableId> {
        self.stats.statements += 1;
        let stripped = strip_comments(stmt);
        let stmt = stripped.as_ref();
        let kind = statement_type(stmt.as_bytes());
        if !kind.is_schema() {
            self.stats.skipped += 1;
            return None;
        }
        self.stats.schema_statements += 1;

        let result = match kind {
            StatementType::CreateTable => self.parse_create_table(stmt),
            StatementType::CreateView => self.parse_create_view(stmt),
            StatementType::AlterTable => self.parse_alter_table(stmt),
            StatementType::CreateIndex => self.parse_create_index(stmt),
            StatementType::Insert | StatementType::Unknown => None,
        };

        match (result, kind) {
            (None, StatementType::CreateTable) => {
                log::warn!("Could not interpret CREATE TABLE statement; table skipped");
            }
            (None, _) => log::debug!("Could not interpret {:?} statement", kind),
            _ => {}
        }
        result
    }

    pub fn parse_create_table(&mut self, stmt: &str) -> Option<TableId> {
        let name = ddl::extract_create_table_name(stmt, &self.identifiers)?;
        if let Some(existing) = self.catalog.get_table_id(&name) {
            log::warn!("Table '{}' declared twice; keeping the first definition", name);
            return Some(existing);
        }

        let def = parse_create_table_body(stmt, &self.identifiers)?;
        let mut table = Table::new(&name);

        for column in &def.columns {
            let mut c = Column::new(&column.name, &column.declared_type);
            c.is_nullable = column.is_nullable;
            c.default_value = column.default_value.clone();
            table.add_column(c);
        }

        let primary_key = match &def.primary_key {
            Some((constraint, columns)) => {
                let resolved = resolve_columns(&table, columns);
                if resolved.is_none() {
                    log::warn!("Primary key of '{}' names unknown columns; skipped", name);
                }
                resolved.map(|columns| (constraint.clone(), columns))
            }
            None => {
                let inline: Vec<ColumnId> = def
                    .columns
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.is_primary_key)
                    .map(|(i, _)| ColumnId(i as u16))
                    .collect();
                (!inline.is_empty()).then_some((None, inline))
            }
        };
        if let Some((constraint, columns)) = primary_key {
            table.set_primary_key(constraint.unwrap_or_else(|| format!("pk_{}", name)), columns);
        }

        for (position, index) in def.indexes.iter().enumerate() {
            let Some(columns) = resolve_columns(&table, &index.columns) else {
                log::warn!("Index on '{}' names unknown columns; skipped", name);
                continue;
            };
            table.indexes.push(Index {
                name: index
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("uq_{}_{}", name, position + 1)),
                table: TableId(0),
                columns,
                is_unique: index.is_unique,
                index_type: index.index_type.clone(),
            });
        }

        if let Some(remarks) = def.remarks {
            table.remarks = remarks;
        }

        let id = self.catalog.add_table(self.schema, table);
        self.pending.extend(
            def.foreign_keys
                .into_iter()
                .map(|def| PendingForeignKey { table: id, def }),
        );
        Some(id)
    }

    /// Record a view; its column list is not derived from the query
    pub fn parse_create_view(&mut self, stmt: &str) -> Option<TableId> {
        let name = ddl::extract_create_view_name(stmt, &self.identifiers)?;
        if let Some(existing) = self.catalog.get_table_id(&name) {
            return Some(existing);
        }
        let mut view = Table::new(name);
        view.table_type = TableType::View;
        Some(self.catalog.add_table(self.schema, view))
    }

    /// Collect foreign keys added through ALTER TABLE
    pub fn parse_alter_table(&mut self, stmt: &str) -> Option<TableId> {
        let name = ddl::extract_alter_table_name(stmt, &self.identifiers)?;
        let Some(table) = self.catalog.get_table_id(&name) else {
            log::warn!("ALTER TABLE for unknown table '{}' ignored", name);
            return None;
        };

        self.pending.extend(
            parse_foreign_keys(stmt, &self.identifiers)
                .into_iter()
                .map(|def| PendingForeignKey { table, def }),
        );
        Some(table)
    }

    pub fn parse_create_index(&mut self, stmt: &str) -> Option<TableId> {
        let def = parse_create_index(stmt, &self.identifiers)?;
        let table_name = def.table.as_deref()?;
        let id = self.catalog.get_table_id(table_name)?;
        let table = self.catalog.table_mut(id)?;
        let columns = resolve_columns(table, &def.columns)?;

        let name = def
            .name
            .unwrap_or_else(|| format!("idx_{}_{}", table.name, table.indexes.len() + 1));
        table.indexes.push(Index {
            name,
            table: id,
            columns,
            is_unique: def.is_unique,
            index_type: def.index_type,
        });
        Some(id)
    }

    /// Resolve pending foreign keys and return the finished catalog with the
    /// load counters.
    ///
    /// A foreign key whose table or columns cannot be found is dropped with a
    /// warning so the resulting graph always validates.
    pub fn build(mut self) -> (Catalog, LoadStats) {
        let pending = std::mem::take(&mut self.pending);
        let mut per_table: AHashMap<TableId, usize> = AHashMap::new();

        for fk in pending {
            let ordinal = per_table.entry(fk.table).or_insert(0);
            *ordinal += 1;
            match self.resolve_foreign_key(&fk, *ordinal) {
                Some(resolved) => {
                    self.catalog.add_foreign_key(resolved);
                }
                None => {
                    self.stats.unresolved_foreign_keys += 1;
                    log::warn!(
                        "Foreign key on '{}' referencing '{}' could not be resolved; skipped",
                        self.catalog
                            .table(fk.table)
                            .map(|t| t.name.as_str())
                            .unwrap_or("?"),
                        fk.def.referenced_table
                    );
                }
            }
        }

        log::debug!(
            "Built catalog '{}': {} tables, {} foreign keys ({} statements, {} skipped)",
            self.catalog.name,
            self.catalog.len(),
            self.catalog.foreign_keys.len(),
            self.stats.statements,
            self.stats.skipped
        );
        (self.catalog, self.stats)
    }

    fn resolve_foreign_key(&self, pending: &PendingForeignKey, ordinal: usize) -> Option<ForeignKey> {
        let table = self.catalog.table(pending.table)?;
        let referenced_id = self.catalog.get_table_id(&pending.def.referenced_table)?;
        let referenced = self.catalog.table(referenced_id)?;

        let columns = resolve_columns(table, &pending.def.columns)?;
        let referenced_columns = if pending.def.referenced_columns.is_empty() {
            referenced.primary_key.as_ref()?.columns.clone()
        } else {
            resolve_columns(referenced, &pending.def.referenced_columns)?
        };
        if columns.len() != referenced_columns.len() {
            return None;
        }

        let name = pending
            .def
            .name
            .clone()
            .unwrap_or_else(|| format!("fk_{}_{}", table.name, ordinal));
        let mut fk = ForeignKey::new(name, pending.table, referenced_id);
        for (column, referenced_column) in columns.into_iter().zip(referenced_columns) {
            fk.add_column_reference(column, referenced_column);
        }
        fk.update_rule = pending.def.update_rule;
        fk.delete_rule = pending.def.delete_rule;
        Some(fk)
    }
}

fn resolve_columns(table: &Table, names: &[String]) -> Option<Vec<ColumnId>> {
    names.iter().map(|n| table.get_column_id(n)).collect()
}

/// Read every statement from `reader` into `builder` and build the catalog
pub fn load_catalog<R: Read>(
    reader: R,
    mut builder: CatalogBuilder,
) -> std::io::Result<(Catalog, LoadStats)> {
    let mut parser = Parser::new(reader, SMALL_BUFFER_SIZE);

    while let Some(stmt) = parser.read_statement()? {
        let stmt = String::from_utf8_lossy(&stmt);
        builder.process_statement(&stmt);
    }

    Ok(builder.build())
}
