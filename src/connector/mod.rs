//! Database connector descriptors.
//!
//! A connector describes one database engine:
//! - which connection URLs it recognizes
//! - how identifiers are quoted
//! - the options shown in its help command
//! - how a connection URL is assembled from parameters
//! - the information schema queries bundled for it
//!
//! Connectors are registered in a [`ConnectorRegistry`] and selected by server
//! id or by URL.

mod mysql;
mod postgres;
mod sqlite;
mod url;

pub use mysql::MySqlConnector;
pub use postgres::PostgresConnector;
pub use sqlite::SqliteConnector;
pub use url::ConnectionUrlBuilder;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectorError {
    #[error("no connector registered for server '{0}'")]
    UnknownServer(String),

    #[error("no connector supports URL '{0}'")]
    UnsupportedUrl(String),

    #[error("no connectors registered")]
    NoConnectors,

    #[error("missing value for URL variable '{name}' in '{template}'")]
    MissingUrlParameter { name: String, template: String },
}

/// Database engine identity: short id plus display name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DatabaseServerType {
    pub id: String,
    pub name: String,
}

impl DatabaseServerType {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DatabaseServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Settings that shape how a catalog is read for one engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRetrievalOptions {
    pub identifier_quote_string: String,
    pub server_type: DatabaseServerType,
}

/// Value kind accepted by a help-command option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionValueType {
    String,
    Integer,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOption {
    pub name: String,
    pub help: String,
    pub value_type: OptionValueType,
}

/// Help text and options a connector contributes to the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginCommand {
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
}

impl PluginCommand {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Add an option, replacing any earlier option of the same name in place
    pub fn add_option(
        mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        value_type: OptionValueType,
    ) -> Self {
        let option = CommandOption {
            name: name.into(),
            help: help.into(),
            value_type,
        };
        match self.options.iter_mut().find(|o| o.name == option.name) {
            Some(existing) => *existing = option,
            None => self.options.push(option),
        }
        self
    }

    pub fn option(&self, name: &str) -> Option<&CommandOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// Help command every connector starts from: a `--server` selector
pub fn base_help_command(server_type: &DatabaseServerType) -> PluginCommand {
    PluginCommand::new(
        &server_type.id,
        format!("** Connect to {}", server_type.name),
    )
    .add_option(
        "server",
        format!(
            "--server={}\nLoads plug-in for {}",
            server_type.id, server_type.name
        ),
        OptionValueType::String,
    )
}

/// Named SQL queries bundled with a connector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InformationSchemaViews {
    pub resource_folder: String,
    pub views: BTreeMap<String, String>,
}

impl InformationSchemaViews {
    pub fn from_resources(folder: impl Into<String>, views: &[(&str, &str)]) -> Self {
        Self {
            resource_folder: folder.into(),
            views: views
                .iter()
                .map(|(name, sql)| (name.to_string(), sql.trim().to_string()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.views.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// Plug-in descriptor for one database engine
pub trait DatabaseConnector: Send + Sync {
    fn server_type(&self) -> &DatabaseServerType;

    /// Whether this connector handles `url`
    fn supports_url(&self, url: &str) -> bool;

    fn identifier_quote_string(&self) -> &str {
        "\""
    }

    fn schema_retrieval_options(&self) -> SchemaRetrievalOptions {
        SchemaRetrievalOptions {
            identifier_quote_string: self.identifier_quote_string().to_string(),
            server_type: self.server_type().clone(),
        }
    }

    fn help_command(&self) -> PluginCommand {
        base_help_command(self.server_type())
    }

    fn connection_url_builder(&self) -> ConnectionUrlBuilder;

    /// Schema that holds the tables of `database` on this engine
    fn default_schema_name(&self, database: &str) -> String {
        database.to_string()
    }

    fn information_schema_views(&self) -> InformationSchemaViews {
        InformationSchemaViews::default()
    }
}

/// Ordered set of connectors; earlier registrations win lookups
pub struct ConnectorRegistry {
    connectors: Vec<Box<dyn DatabaseConnector>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self {
            connectors: Vec::new(),
        }
    }

    /// SQLite, MySQL and PostgreSQL, with SQLite first
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SqliteConnector::new()));
        registry.register(Box::new(MySqlConnector::new()));
        registry.register(Box::new(PostgresConnector::new()));
        registry
    }

    pub fn register(&mut self, connector: Box<dyn DatabaseConnector>) {
        log::debug!("Registered connector {}", connector.server_type());
        self.connectors.push(connector);
    }

    /// Find a connector by server id (case-insensitive)
    pub fn lookup_by_server(&self, id: &str) -> Option<&dyn DatabaseConnector> {
        self.connectors
            .iter()
            .find(|c| c.server_type().id.eq_ignore_ascii_case(id))
            .map(|c| c.as_ref())
    }

    pub fn lookup_by_url(&self, url: &str) -> Option<&dyn DatabaseConnector> {
        self.connectors
            .iter()
            .find(|c| c.supports_url(url))
            .map(|c| c.as_ref())
    }

    /// Pick a connector by server id, else by URL, else the first registered
    pub fn resolve(
        &self,
        server: Option<&str>,
        url: Option<&str>,
    ) -> Result<&dyn DatabaseConnector, ConnectorError> {
        if let Some(id) = server {
            let connector = self
                .lookup_by_server(id)
                .ok_or_else(|| ConnectorError::UnknownServer(id.to_string()))?;
            if let Some(url) = url {
                if !connector.supports_url(url) {
                    log::warn!(
                        "Connector '{}' does not recognize URL '{}'",
                        connector.server_type().id,
                        url
                    );
                }
            }
            return Ok(connector);
        }

        if let Some(url) = url {
            return self
                .lookup_by_url(url)
                .ok_or_else(|| ConnectorError::UnsupportedUrl(url.to_string()));
        }

        self.connectors
            .first()
            .map(|c| c.as_ref())
            .ok_or(ConnectorError::NoConnectors)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DatabaseConnector> {
        self.connectors.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
