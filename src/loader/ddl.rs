//! DDL parsing for catalog construction.
//!
//! Parses CREATE TABLE, CREATE VIEW, ALTER TABLE and CREATE INDEX statements
//! to extract:
//! - Column definitions with types, nullability and defaults
//! - Primary key constraints (inline and table level)
//! - Foreign key constraints (inline REFERENCES and table level)
//! - Indexes and UNIQUE constraints

use crate::catalog::{ForeignKeyRule, IndexType};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// One identifier: "double quoted", `backticked`, [bracketed] or bare
const IDENT: &str = r#"(?:"(?:[^"]|"")*"|`(?:[^`]|``)*`|\[[^\]]*\]|[^\s(),;."`\[\]]+)"#;

fn qualified(name_group: &str) -> String {
    format!(r"(?:{IDENT}\s*\.\s*)*({name_group})")
}

static CREATE_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)CREATE\s+(?:TEMP(?:ORARY)?\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?{}",
        qualified(IDENT)
    ))
    .unwrap()
});

static CREATE_VIEW_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)CREATE\s+(?:TEMP(?:ORARY)?\s+)?VIEW\s+(?:IF\s+NOT\s+EXISTS\s+)?{}",
        qualified(IDENT)
    ))
    .unwrap()
});

static ALTER_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)ALTER\s+TABLE\s+(?:ONLY\s+)?(?:IF\s+EXISTS\s+)?{}",
        qualified(IDENT)
    ))
    .unwrap()
});

/// Column name followed by a type, e.g. `"id" INTEGER` or `price DECIMAL(10, 2) unsigned`
static COLUMN_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*({IDENT})\s+(\w+(?:\s*\([^)]*\))?(?:\s+unsigned)?)"
    ))
    .unwrap()
});

/// First identifier of a list item, ignoring ASC/DESC/COLLATE suffixes
static LEADING_IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^\s*({IDENT})")).unwrap());

/// Table body entries that declare a constraint rather than a column
static CONSTRAINT_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:PRIMARY\s+KEY|FOREIGN\s+KEY|CONSTRAINT|UNIQUE|KEY|INDEX|FULLTEXT|SPATIAL|CHECK)\b",
    )
    .unwrap()
});

static CONSTRAINT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)^\s*CONSTRAINT\s+({IDENT})")).unwrap());

/// Supports MSSQL CLUSTERED/NONCLUSTERED keywords: PRIMARY KEY CLUSTERED ([col])
static PRIMARY_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)PRIMARY\s+KEY\s*(?:CLUSTERED\s+|NONCLUSTERED\s+)?\(([^)]+)\)").unwrap()
});

static INLINE_PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

/// FOREIGN KEY constraint; the referenced column list may be omitted
static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?:CONSTRAINT\s+({IDENT})\s+)?FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s+{}\s*(?:\(([^)]+)\))?",
        qualified(IDENT)
    ))
    .unwrap()
});

/// Column-level `REFERENCES parent(col)`
static INLINE_REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\bREFERENCES\s+{}\s*(?:\(([^)]+)\))?",
        qualified(IDENT)
    ))
    .unwrap()
});

static ON_DELETE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bON\s+DELETE\s+(CASCADE|SET\s+NULL|SET\s+DEFAULT|RESTRICT|NO\s+ACTION)")
        .unwrap()
});

static ON_UPDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bON\s+UPDATE\s+(CASCADE|SET\s+NULL|SET\s+DEFAULT|RESTRICT|NO\s+ACTION)")
        .unwrap()
});

static NOT_NULL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").unwrap());

static DEFAULT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bDEFAULT\s+('(?:[^']|'')*'|\([^)]*\)|[^\s,]+)").unwrap()
});

/// Inline INDEX/KEY in CREATE TABLE: INDEX idx_name (col1, col2), UNIQUE KEY idx (col1)
static INLINE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(UNIQUE)\s+)?(?:INDEX|KEY)\s+({IDENT})\s*\(([^)]+)\)"
    ))
    .unwrap()
});

/// Table-level UNIQUE (cols), optionally named through CONSTRAINT
static UNIQUE_CONSTRAINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:CONSTRAINT\s+({IDENT})\s+)?UNIQUE\s*\(([^)]+)\)"
    ))
    .unwrap()
});

/// CREATE [UNIQUE] [CLUSTERED|NONCLUSTERED] INDEX [IF NOT EXISTS] idx ON table [USING method] (columns)
static CREATE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)CREATE\s+(UNIQUE\s+)?(?:CLUSTERED\s+|NONCLUSTERED\s+)?INDEX\s+(?:IF\s+NOT\s+EXISTS\s+)?{}\s+ON\s+{}\s*(?:USING\s+(\w+)\s*)?\(([^)]+)\)",
        qualified(IDENT),
        qualified(IDENT)
    ))
    .unwrap()
});

/// MySQL table option COMMENT='...'
static TABLE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bCOMMENT\s*=?\s*'((?:[^']|'')*)'").unwrap());

/// Identifier quoting convention of one database engine
#[derive(Debug, Clone)]
pub struct Identifiers {
    quote: String,
}

impl Identifiers {
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
        }
    }

    pub fn quote_string(&self) -> &str {
        &self.quote
    }

    /// Strip quoting from an identifier.
    ///
    /// The engine's own quote string also un-doubles embedded quotes; other
    /// quoting styles are stripped as-is.
    pub fn unquote(&self, ident: &str) -> String {
        let ident = ident.trim();
        let q = self.quote.as_str();
        if !q.is_empty()
            && ident.len() >= 2 * q.len()
            && ident.starts_with(q)
            && ident.ends_with(q)
        {
            let inner = &ident[q.len()..ident.len() - q.len()];
            return inner.replace(&q.repeat(2), q);
        }
        if ident.len() >= 2 {
            let bytes = ident.as_bytes();
            let (first, last) = (bytes[0], bytes[ident.len() - 1]);
            if matches!((first, last), (b'"', b'"') | (b'`', b'`') | (b'[', b']')) {
                return ident[1..ident.len() - 1].to_string();
            }
        }
        ident.to_string()
    }
}

/// Column parsed from a table body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub declared_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub default_value: Option<String>,
}

/// Index or UNIQUE constraint parsed from DDL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: Option<String>,
    pub table: Option<String>,
    pub columns: Vec<String>,
    pub is_unique: bool,
    pub index_type: IndexType,
}

/// Foreign key parsed from DDL, before table and column resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub referenced_table: String,
    /// Empty when the DDL relies on the referenced primary key
    pub referenced_columns: Vec<String>,
    pub update_rule: ForeignKeyRule,
    pub delete_rule: ForeignKeyRule,
}

/// Everything a CREATE TABLE body declares
#[derive(Debug, Clone, Default)]
pub struct TableDef {
    pub columns: Vec<ColumnDef>,
    pub primary_key: Option<(Option<String>, Vec<String>)>,
    pub indexes: Vec<IndexDef>,
    pub foreign_keys: Vec<ForeignKeyDef>,
    pub remarks: Option<String>,
}

/// Extract table name from CREATE TABLE statement
pub fn extract_create_table_name(stmt: &str, ids: &Identifiers) -> Option<String> {
    capture_name(&CREATE_TABLE_NAME_RE, stmt, ids)
}

/// Extract view name from CREATE VIEW statement
pub fn extract_create_view_name(stmt: &str, ids: &Identifiers) -> Option<String> {
    capture_name(&CREATE_VIEW_NAME_RE, stmt, ids)
}

/// Extract table name from ALTER TABLE statement
pub fn extract_alter_table_name(stmt: &str, ids: &Identifiers) -> Option<String> {
    capture_name(&ALTER_TABLE_NAME_RE, stmt, ids)
}

fn capture_name(re: &Regex, stmt: &str, ids: &Identifiers) -> Option<String> {
    re.captures(stmt)
        .and_then(|c| c.get(1))
        .map(|m| ids.unquote(m.as_str()))
}

/// Parse a full CREATE TABLE statement body and trailing table options
pub fn parse_create_table_body(stmt: &str, ids: &Identifiers) -> Option<TableDef> {
    let (body, end) = extract_table_body(stmt)?;
    let mut def = TableDef::default();

    for part in split_table_body(body) {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }

        if CONSTRAINT_START_RE.is_match(trimmed) {
            parse_constraint(trimmed, ids, &mut def);
        } else if let Some(column) = parse_column_def(trimmed, ids) {
            if let Some(fk) = parse_inline_reference(trimmed, &column.name, ids) {
                def.foreign_keys.push(fk);
            }
            def.columns.push(column);
        }
    }

    def.remarks = TABLE_COMMENT_RE
        .captures(&stmt[end..])
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace("''", "'"));

    Some(def)
}

fn parse_constraint(constraint: &str, ids: &Identifiers, def: &mut TableDef) {
    let constraint_name = CONSTRAINT_NAME_RE
        .captures(constraint)
        .and_then(|c| c.get(1))
        .map(|m| ids.unquote(m.as_str()));

    if let Some(caps) = PRIMARY_KEY_RE.captures(constraint) {
        if let Some(cols) = caps.get(1) {
            def.primary_key = Some((constraint_name.clone(), parse_column_list(cols.as_str(), ids)));
        }
    }

    def.foreign_keys.extend(parse_foreign_keys(constraint, ids));

    if let Some(idx) = parse_inline_index(constraint, ids) {
        def.indexes.push(idx);
    } else if let Some(caps) = UNIQUE_CONSTRAINT_RE.captures(constraint) {
        let name = caps
            .get(1)
            .map(|m| ids.unquote(m.as_str()))
            .or(constraint_name);
        if let Some(cols) = caps.get(2) {
            def.indexes.push(IndexDef {
                name,
                table: None,
                columns: parse_column_list(cols.as_str(), ids),
                is_unique: true,
                index_type: IndexType::Unknown,
            });
        }
    }
}

/// Remove `--` and `/* */` comments that sit outside quoted strings and identifiers
pub fn strip_comments(stmt: &str) -> Cow<'_, str> {
    if !stmt.contains("--") && !stmt.contains("/*") {
        return Cow::Borrowed(stmt);
    }

    let mut out = String::with_capacity(stmt.len());
    let mut chars = stmt.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == '\\' && q == '\'' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                out.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                out.push(' ');
            }
            _ => out.push(ch),
        }
    }

    Cow::Owned(out)
}

/// Tracks whether a scan position is inside a quoted string or identifier
#[derive(Default)]
struct QuoteState {
    quote: Option<u8>,
    escape_next: bool,
}

impl QuoteState {
    /// Feed one byte; returns true while the byte belongs to a quoted run
    fn consume(&mut self, b: u8) -> bool {
        if self.escape_next {
            self.escape_next = false;
            return true;
        }
        match self.quote {
            Some(q) => {
                if b == b'\\' && q == b'\'' {
                    self.escape_next = true;
                } else if b == q {
                    self.quote = None;
                }
                true
            }
            None if matches!(b, b'\'' | b'"' | b'`') => {
                self.quote = Some(b);
                true
            }
            None => false,
        }
    }
}

/// Extract the body of a CREATE TABLE statement (between first ( and matching )),
/// returning it with the byte offset just past the closing parenthesis
fn extract_table_body(stmt: &str) -> Option<(&str, usize)> {
    let mut depth = 0;
    let mut start = None;
    let mut quotes = QuoteState::default();

    for (i, &b) in stmt.as_bytes().iter().enumerate() {
        if quotes.consume(b) {
            continue;
        }

        if b == b'(' {
            if depth == 0 {
                start = Some(i + 1);
            }
            depth += 1;
        } else if b == b')' {
            depth -= 1;
            if depth == 0 {
                if let Some(s) = start {
                    return Some((&stmt[s..i], i + 1));
                }
            }
        }
    }

    None
}

/// Split table body by commas, respecting nested parentheses, strings and
/// quoted identifiers
pub fn split_table_body(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0;
    let mut item_start = 0;
    let mut quotes = QuoteState::default();

    for (i, &b) in body.as_bytes().iter().enumerate() {
        if quotes.consume(b) {
            continue;
        }

        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(body[item_start..i].trim().to_string());
                item_start = i + 1;
            }
            _ => {}
        }
    }

    let rest = body[item_start..].trim();
    if !rest.is_empty() {
        parts.push(rest.to_string());
    }

    parts
}

fn parse_column_def(def: &str, ids: &Identifiers) -> Option<ColumnDef> {
    let caps = COLUMN_DEF_RE.captures(def)?;
    let name = ids.unquote(caps.get(1)?.as_str());
    let declared_type = caps.get(2)?.as_str().to_string();
    let is_primary_key = INLINE_PRIMARY_KEY_RE.is_match(def);

    Some(ColumnDef {
        name,
        declared_type,
        is_nullable: !is_primary_key && !NOT_NULL_RE.is_match(def),
        is_primary_key,
        default_value: DEFAULT_RE
            .captures(def)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
    })
}

fn parse_inline_reference(def: &str, column: &str, ids: &Identifiers) -> Option<ForeignKeyDef> {
    let caps = INLINE_REFERENCES_RE.captures(def)?;
    let referenced_table = ids.unquote(caps.get(1)?.as_str());
    let referenced_columns = caps
        .get(2)
        .map(|m| parse_column_list(m.as_str(), ids))
        .unwrap_or_default();

    Some(ForeignKeyDef {
        name: None,
        columns: vec![column.to_string()],
        referenced_table,
        referenced_columns,
        update_rule: parse_rule(&ON_UPDATE_RE, def),
        delete_rule: parse_rule(&ON_DELETE_RE, def),
    })
}

fn parse_inline_index(constraint: &str, ids: &Identifiers) -> Option<IndexDef> {
    let caps = INLINE_INDEX_RE.captures(constraint)?;

    Some(IndexDef {
        name: Some(ids.unquote(caps.get(2)?.as_str())),
        table: None,
        columns: parse_column_list(caps.get(3)?.as_str(), ids),
        is_unique: caps.get(1).is_some(),
        index_type: IndexType::Unknown,
    })
}

/// Parse FOREIGN KEY constraints from a statement or constraint clause
pub fn parse_foreign_keys(stmt: &str, ids: &Identifiers) -> Vec<ForeignKeyDef> {
    let mut fks = Vec::new();

    for caps in FOREIGN_KEY_RE.captures_iter(stmt) {
        let name = caps.get(1).map(|m| ids.unquote(m.as_str()));
        let columns = caps
            .get(2)
            .map(|m| parse_column_list(m.as_str(), ids))
            .unwrap_or_default();
        let referenced_table = caps
            .get(3)
            .map(|m| ids.unquote(m.as_str()))
            .unwrap_or_default();
        let referenced_columns = caps
            .get(4)
            .map(|m| parse_column_list(m.as_str(), ids))
            .unwrap_or_default();
        // Rules belong to this constraint only: stop at the next FOREIGN KEY
        let tail = caps.get(0).map(|m| &stmt[m.end()..]).unwrap_or_default();
        let tail = FOREIGN_KEY_RE
            .find(tail)
            .map(|next| &tail[..next.start()])
            .unwrap_or(tail);

        if !columns.is_empty() && !referenced_table.is_empty() {
            fks.push(ForeignKeyDef {
                name,
                columns,
                referenced_table,
                referenced_columns,
                update_rule: parse_rule(&ON_UPDATE_RE, tail),
                delete_rule: parse_rule(&ON_DELETE_RE, tail),
            });
        }
    }

    fks
}

fn parse_rule(re: &Regex, text: &str) -> ForeignKeyRule {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| ForeignKeyRule::from_sql(m.as_str()))
        .unwrap_or_default()
}

/// Parse a CREATE INDEX statement
pub fn parse_create_index(stmt: &str, ids: &Identifiers) -> Option<IndexDef> {
    let caps = CREATE_INDEX_RE.captures(stmt)?;

    Some(IndexDef {
        name: Some(ids.unquote(caps.get(2)?.as_str())),
        table: Some(ids.unquote(caps.get(3)?.as_str())),
        columns: parse_column_list(caps.get(5)?.as_str(), ids),
        is_unique: caps.get(1).is_some(),
        index_type: caps
            .get(4)
            .map(|m| IndexType::from_sql(m.as_str()))
            .unwrap_or_default(),
    })
}

/// Parse a comma-separated column list, unquoting each name
pub fn parse_column_list(s: &str, ids: &Identifiers) -> Vec<String> {
    s.split(',')
        .filter_map(|item| {
            LEADING_IDENT_RE
                .captures(item)
                .and_then(|c| c.get(1))
                .map(|m| ids.unquote(m.as_str()))
        })
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sqlite() -> Identifiers {
        Identifiers::new("\"")
    }

    #[test]
    fn test_unquote() {
        let ids = sqlite();
        assert_eq!(ids.unquote("\"order items\""), "order items");
        assert_eq!(ids.unquote("\"say \"\"hi\"\"\""), "say \"hi\"");
        assert_eq!(ids.unquote("`users`"), "users");
        assert_eq!(ids.unquote("[users]"), "users");
        assert_eq!(ids.unquote("users"), "users");
    }

    #[test]
    fn test_extract_names() {
        let ids = sqlite();
        assert_eq!(
            extract_create_table_name("CREATE TABLE IF NOT EXISTS main.\"Order Items\" (id INT);", &ids),
            Some("Order Items".to_string())
        );
        assert_eq!(
            extract_create_view_name("CREATE VIEW v_users AS SELECT * FROM users;", &ids),
            Some("v_users".to_string())
        );
        assert_eq!(
            extract_alter_table_name("ALTER TABLE ONLY public.orders ADD CONSTRAINT x;", &ids),
            Some("orders".to_string())
        );
    }

    #[test]
    fn test_parse_table_body_columns() {
        let def = parse_create_table_body(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, name VARCHAR(50) NOT NULL DEFAULT 'x', note TEXT);",
            &sqlite(),
        )
        .unwrap();

        assert_eq!(def.columns.len(), 3);
        assert!(def.columns[0].is_primary_key);
        assert!(!def.columns[0].is_nullable);
        assert_eq!(def.columns[1].declared_type, "VARCHAR(50)");
        assert!(!def.columns[1].is_nullable);
        assert_eq!(def.columns[1].default_value.as_deref(), Some("'x'"));
        assert!(def.columns[2].is_nullable);
    }

    #[test]
    fn test_keyword_prefixed_column_is_a_column() {
        let def = parse_create_table_body(
            "CREATE TABLE t (check_date DATE, unique_code TEXT, CHECK (check_date > 0));",
            &sqlite(),
        )
        .unwrap();
        let names: Vec<_> = def.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["check_date", "unique_code"]);
    }

    #[test]
    fn test_inline_reference() {
        let def = parse_create_table_body(
            "CREATE TABLE t (id INTEGER PRIMARY KEY, parent_id INTEGER REFERENCES t(id) ON DELETE CASCADE);",
            &sqlite(),
        )
        .unwrap();

        assert_eq!(def.foreign_keys.len(), 1);
        let fk = &def.foreign_keys[0];
        assert_eq!(fk.columns, vec!["parent_id"]);
        assert_eq!(fk.referenced_table, "t");
        assert_eq!(fk.referenced_columns, vec!["id"]);
        assert_eq!(fk.delete_rule, ForeignKeyRule::Cascade);
        assert_eq!(fk.update_rule, ForeignKeyRule::Unknown);
    }

    #[test]
    fn test_table_level_constraints() {
        let def = parse_create_table_body(
            r#"CREATE TABLE "order_items" (
                "order_id" INTEGER NOT NULL,
                "product_id" INTEGER NOT NULL,
                CONSTRAINT pk_items PRIMARY KEY ("order_id", "product_id"),
                CONSTRAINT fk_items_orders FOREIGN KEY ("order_id") REFERENCES "orders" ("id") ON UPDATE SET NULL,
                UNIQUE ("product_id", "order_id")
            );"#,
            &sqlite(),
        )
        .unwrap();

        assert_eq!(
            def.primary_key,
            Some((
                Some("pk_items".to_string()),
                vec!["order_id".to_string(), "product_id".to_string()]
            ))
        );
        assert_eq!(def.foreign_keys[0].name.as_deref(), Some("fk_items_orders"));
        assert_eq!(def.foreign_keys[0].update_rule, ForeignKeyRule::SetNull);
        assert_eq!(def.indexes.len(), 1);
        assert!(def.indexes[0].is_unique);
        assert_eq!(def.indexes[0].columns, vec!["product_id", "order_id"]);
    }

    #[test]
    fn test_mysql_comment_and_keys() {
        let ids = Identifiers::new("`");
        let def = parse_create_table_body(
            "CREATE TABLE `users` (`id` int(11) NOT NULL, `email` varchar(255), UNIQUE KEY `uq_email` (`email`)) ENGINE=InnoDB COMMENT='App users';",
            &ids,
        )
        .unwrap();

        assert_eq!(def.columns[0].name, "id");
        assert_eq!(def.indexes[0].name.as_deref(), Some("uq_email"));
        assert_eq!(def.remarks.as_deref(), Some("App users"));
    }

    #[test]
    fn test_parse_create_index() {
        let idx = parse_create_index(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_email ON users USING btree (email DESC);",
            &sqlite(),
        )
        .unwrap();

        assert_eq!(idx.name.as_deref(), Some("idx_email"));
        assert_eq!(idx.table.as_deref(), Some("users"));
        assert_eq!(idx.columns, vec!["email"]);
        assert!(idx.is_unique);
        assert_eq!(idx.index_type, IndexType::BTree);
    }

    #[test]
    fn test_alter_table_foreign_keys() {
        let fks = parse_foreign_keys(
            "ALTER TABLE orders ADD CONSTRAINT fk_a FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE, ADD CONSTRAINT fk_b FOREIGN KEY (product_id) REFERENCES products (id);",
            &sqlite(),
        );

        assert_eq!(fks.len(), 2);
        assert_eq!(fks[0].delete_rule, ForeignKeyRule::Cascade);
        assert_eq!(fks[1].delete_rule, ForeignKeyRule::Unknown);
        assert_eq!(fks[1].referenced_table, "products");
    }

    #[test]
    fn test_strip_comments_keeps_quoted_text() {
        let sql = "CREATE TABLE t ( -- user's table\n  a TEXT DEFAULT '--not a comment', /* block ' */ b INT\n);";
        let stripped = strip_comments(sql);

        assert!(!stripped.contains("user's table"));
        assert!(!stripped.contains("block"));
        assert!(stripped.contains("'--not a comment'"));
        assert!(stripped.contains(" b INT"));
        assert!(matches!(strip_comments("CREATE TABLE t (id INT);"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_split_respects_quoted_identifiers() {
        let parts = split_table_body(r#""a,b" TEXT, `c(d` INT, e VARCHAR(10) DEFAULT 'x,y'"#);
        assert_eq!(
            parts,
            vec![r#""a,b" TEXT"#, "`c(d` INT", "e VARCHAR(10) DEFAULT 'x,y'"]
        );
    }

    #[test]
    fn test_table_name_with_parenthesis() {
        let stmt = r#"CREATE TABLE "odd(name" (id INTEGER PRIMARY KEY, ")" TEXT);"#;
        assert_eq!(
            extract_create_table_name(stmt, &sqlite()).as_deref(),
            Some("odd(name")
        );

        let def = parse_create_table_body(stmt, &sqlite()).unwrap();
        let names: Vec<_> = def.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", ")"]);
    }
}
