//! YAML connection configuration for the export command.
//!
//! ```yaml
//! server: mysql
//! database: shop
//! host: db.internal
//! port: 3307
//! ```
//!
//! Command-line flags take precedence over values from the file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Connection settings used to pick a connector and build its URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Connector server id, e.g. "sqlite"
    pub server: Option<String>,
    /// Full connection URL; selects the connector when no server is given
    pub url: Option<String>,
    pub database: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
}

impl ConnectionConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `other` on top of this config; set fields in `other` win
    pub fn merge(self, other: ConnectionConfig) -> Self {
        Self {
            server: other.server.or(self.server),
            url: other.url.or(self.url),
            database: other.database.or(self.database),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            user: other.user.or(self.user),
        }
    }

    /// URL template parameters from the fields that are set
    pub fn to_params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let Some(database) = &self.database {
            params.insert("database".to_string(), database.clone());
        }
        if let Some(host) = &self.host {
            params.insert("host".to_string(), host.clone());
        }
        if let Some(port) = self.port {
            params.insert("port".to_string(), port.to_string());
        }
        if let Some(user) = &self.user {
            params.insert("user".to_string(), user.clone());
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "server: mysql\ndatabase: shop\nport: 3307").unwrap();

        let config = ConnectionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.as_deref(), Some("mysql"));
        assert_eq!(config.port, Some(3307));
        assert_eq!(config.url, None);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port: not-a-number").unwrap();

        let err = ConnectionConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid config file"));
    }

    #[test]
    fn test_missing_file() {
        let err = ConnectionConfig::from_file(Path::new("/nonexistent/conn.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = ConnectionConfig {
            server: Some("mysql".to_string()),
            database: Some("shop".to_string()),
            ..Default::default()
        };
        let flags = ConnectionConfig {
            server: Some("sqlite".to_string()),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.server.as_deref(), Some("sqlite"));
        assert_eq!(merged.database.as_deref(), Some("shop"));
    }

    #[test]
    fn test_to_params() {
        let config = ConnectionConfig {
            database: Some("app.db".to_string()),
            port: Some(5432),
            ..Default::default()
        };
        let params = config.to_params();
        assert_eq!(params.get("database").map(String::as_str), Some("app.db"));
        assert_eq!(params.get("port").map(String::as_str), Some("5432"));
        assert!(!params.contains_key("host"));
    }
}
