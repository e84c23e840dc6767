/// Configuration management for the pipeline registry
///
/// Handles server binding and persistence backend selection. Every value can be
/// overridden from the environment for container deployment.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Which persistence service backs the project store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite file at `DatabaseConfig::path`
    Sqlite,
    /// Process-local map, lost on restart
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Persistence backend (default: sqlite)
    pub backend: StorageBackend,
    /// SQLite database file (default: "data/pipelines.db")
    pub path: String,
}

const DEFAULT_PORT: u16 = 5000;

impl Default for Config {
    /// Default configuration with ENV_VAR support for k8s/container deployment
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl Config {
    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PIPELINE_REGISTRY_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            server: ServerConfig {
                host: lookup("PIPELINE_REGISTRY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            database: DatabaseConfig {
                backend: lookup("PIPELINE_REGISTRY_STORAGE")
                    .and_then(|b| StorageBackend::parse(&b))
                    .unwrap_or(StorageBackend::Sqlite),
                path: lookup("PIPELINE_REGISTRY_DATABASE")
                    .unwrap_or_else(|| "data/pipelines.db".to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.backend, StorageBackend::Sqlite);
        assert_eq!(config.database.path, "data/pipelines.db");
    }

    #[test]
    fn port_prefers_specific_variable_over_generic() {
        assert_eq!(config_from(&[("PORT", "8080")]).server.port, 8080);
        assert_eq!(
            config_from(&[("PORT", "8080"), ("PIPELINE_REGISTRY_PORT", "9090")]).server.port,
            9090
        );
        assert_eq!(config_from(&[("PORT", "not-a-port")]).server.port, 5000);
    }

    #[test]
    fn storage_backend_selection() {
        assert_eq!(
            config_from(&[("PIPELINE_REGISTRY_STORAGE", "Memory")]).database.backend,
            StorageBackend::Memory
        );
        assert_eq!(
            config_from(&[("PIPELINE_REGISTRY_STORAGE", "mongo")]).database.backend,
            StorageBackend::Sqlite
        );
    }
}
