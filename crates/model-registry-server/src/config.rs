//! Server configuration
//!
//! This module handles hierarchical configuration loading from multiple sources:
//! - Default configuration file
//! - Environment-specific configuration file
//! - Environment variables
//! - Command-line arguments

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `MODEL_REGISTRY__DATABASE__URL`
pub const ENV_PREFIX: &str = "MODEL_REGISTRY";

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connect_timeout_seconds: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// Maximum lifetime of a connection in seconds
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_seconds: u64,

    /// Run migrations on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_database_url() -> String {
    "sqlite://model-registry.db".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_lifetime() -> u64 {
    1800
}

fn default_true() -> bool {
    true
}

impl DatabaseConfig {
    /// Whether the URL names a private in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connection_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            max_lifetime_seconds: default_max_lifetime(),
            run_migrations: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON formatting
    #[serde(default)]
    pub json_format: bool,

    /// Include thread IDs
    #[serde(default)]
    pub include_thread_ids: bool,

    /// Include target module
    #[serde(default = "default_true")]
    pub include_target: bool,

    /// Log every SQL statement
    #[serde(default)]
    pub log_statements: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            include_thread_ids: false,
            include_target: true,
            log_statements: false,
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog sources file; no catalogs are served when unset
    #[serde(default)]
    pub sources_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from files and environment
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default configuration file (config/default.toml)
    /// 2. Environment-specific file (config/{env}.toml)
    /// 3. Environment variables (MODEL_REGISTRY__*)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed
    pub fn load(config_dir: impl Into<PathBuf>, environment: &str) -> Result<Self, ConfigError> {
        let config_dir = config_dir.into();

        Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", environment))).required(false))
            // e.g., MODEL_REGISTRY__CATALOG__SOURCES_PATH=/etc/catalogs.yaml
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration with defaults if files don't exist
    pub fn load_or_default(config_dir: impl Into<PathBuf>, environment: &str) -> Self {
        Self::load(config_dir, environment).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load configuration: {}", e);
            eprintln!("Using default configuration");
            Self::default()
        })
    }

    /// Get database connection string
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.database_url(), "sqlite://model-registry.db");
        assert_eq!(config.logging.level, "info");
        assert!(config.catalog.sources_path.is_none());
    }

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert!(config.run_migrations);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_in_memory_detection() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_environment_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[database]\nurl = \"sqlite://base.db\"\n\n[logging]\nlevel = \"warn\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("staging.toml"),
            "[database]\nurl = \"sqlite://staging.db\"\n\n[catalog]\nsources_path = \"catalogs.yaml\"\n",
        )
        .unwrap();

        let config = ServerConfig::load(dir.path(), "staging").unwrap();
        assert_eq!(config.database.url, "sqlite://staging.db");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(
            config.catalog.sources_path,
            Some(PathBuf::from("catalogs.yaml"))
        );
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load_or_default(dir.path(), "production");
        assert_eq!(config.logging.level, "info");
    }
}
