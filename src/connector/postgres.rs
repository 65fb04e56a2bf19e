use super::{
    base_help_command, ConnectionUrlBuilder, DatabaseConnector, DatabaseServerType,
    OptionValueType, PluginCommand,
};
use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^jdbc:postgresql:.*$").unwrap());

/// Connector for PostgreSQL servers
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    server_type: DatabaseServerType,
}

impl PostgresConnector {
    pub fn new() -> Self {
        Self {
            server_type: DatabaseServerType::new("postgresql", "PostgreSQL"),
        }
    }
}

impl Default for PostgresConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseConnector for PostgresConnector {
    fn server_type(&self) -> &DatabaseServerType {
        &self.server_type
    }

    fn supports_url(&self, url: &str) -> bool {
        URL_RE.is_match(url)
    }

    fn help_command(&self) -> PluginCommand {
        base_help_command(&self.server_type)
            .add_option("host", "Host name\nOptional, defaults to localhost", OptionValueType::String)
            .add_option("port", "Port number\nOptional, defaults to 5432", OptionValueType::Integer)
            .add_option("database", "Database name", OptionValueType::String)
    }

    fn default_schema_name(&self, _database: &str) -> String {
        "public".to_string()
    }

    fn connection_url_builder(&self) -> ConnectionUrlBuilder {
        ConnectionUrlBuilder::new("jdbc:postgresql://${host}:${port}/${database}")
            .with_default("host", "localhost")
            .with_default("port", "5432")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_postgres_url_defaults() {
        let connector = PostgresConnector::new();
        assert_eq!(connector.identifier_quote_string(), "\"");

        let mut params = BTreeMap::new();
        params.insert("database".to_string(), "shop".to_string());
        assert_eq!(
            connector.connection_url_builder().build(&params).unwrap(),
            "jdbc:postgresql://localhost:5432/shop"
        );
    }

    #[test]
    fn test_supports_url() {
        let connector = PostgresConnector::new();
        assert!(connector.supports_url("jdbc:postgresql://db:5432/shop"));
        assert!(!connector.supports_url("jdbc:postgres://db/shop"));
        assert!(!connector.supports_url("jdbc:postgresql://db/shop\n"));
    }
}
