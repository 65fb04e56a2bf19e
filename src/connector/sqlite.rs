use super::{
    base_help_command, ConnectionUrlBuilder, DatabaseConnector, DatabaseServerType,
    InformationSchemaViews, OptionValueType, PluginCommand,
};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^jdbc:sqlite:.*$").unwrap());

const RESOURCE_FOLDER: &str = "/sqlite.information_schema";

const VIEWS_SQL: &str = include_str!("../../resources/sqlite.information_schema/VIEWS.sql");
const TRIGGERS_SQL: &str = include_str!("../../resources/sqlite.information_schema/TRIGGERS.sql");

/// Connector for SQLite database files
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    server_type: DatabaseServerType,
}

impl SqliteConnector {
    pub fn new() -> Self {
        Self {
            server_type: DatabaseServerType::new("sqlite", "SQLite"),
        }
    }
}

impl Default for SqliteConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseConnector for SqliteConnector {
    fn server_type(&self) -> &DatabaseServerType {
        &self.server_type
    }

    fn supports_url(&self, url: &str) -> bool {
        URL_RE.is_match(url)
    }

    fn help_command(&self) -> PluginCommand {
        base_help_command(&self.server_type)
            .add_option(
                "server",
                "--server=sqlite\nLoads plug-in for SQLite",
                OptionValueType::String,
            )
            .add_option("host", "Should be omitted", OptionValueType::String)
            .add_option("port", "Should be omitted", OptionValueType::Integer)
            .add_option("database", "SQLite database file path", OptionValueType::String)
    }

    fn default_schema_name(&self, _database: &str) -> String {
        "main".to_string()
    }

    fn connection_url_builder(&self) -> ConnectionUrlBuilder {
        ConnectionUrlBuilder::new("jdbc:sqlite:${database}")
    }

    fn information_schema_views(&self) -> InformationSchemaViews {
        InformationSchemaViews::from_resources(
            RESOURCE_FOLDER,
            &[("VIEWS", VIEWS_SQL), ("TRIGGERS", TRIGGERS_SQL)],
        )
    }
}
