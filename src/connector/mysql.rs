use super::{
    base_help_command, ConnectionUrlBuilder, DatabaseConnector, DatabaseServerType,
    OptionValueType, PluginCommand,
};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^jdbc:(mysql|mariadb):.*$").unwrap());

/// Connector for MySQL and MariaDB servers
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    server_type: DatabaseServerType,
}

impl MySqlConnector {
    pub fn new() -> Self {
        Self {
            server_type: DatabaseServerType::new("mysql", "MySQL"),
        }
    }
}

impl Default for MySqlConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseConnector for MySqlConnector {
    fn server_type(&self) -> &DatabaseServerType {
        &self.server_type
    }

    fn supports_url(&self, url: &str) -> bool {
        URL_RE.is_match(url)
    }

    fn identifier_quote_string(&self) -> &str {
        "`"
    }

    fn help_command(&self) -> PluginCommand {
        base_help_command(&self.server_type)
            .add_option("host", "Host name\nOptional, defaults to localhost", OptionValueType::String)
            .add_option("port", "Port number\nOptional, defaults to 3306", OptionValueType::Integer)
            .add_option("database", "Database name", OptionValueType::String)
    }

    fn connection_url_builder(&self) -> ConnectionUrlBuilder {
        ConnectionUrlBuilder::new("jdbc:mysql://${host}:${port}/${database}")
            .with_default("host", "localhost")
            .with_default("port", "3306")
    }
}
