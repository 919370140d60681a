//! Configuration management for gridbook
//!
//! This module handles loading, validation, and management of
//! gridbook configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Where pagination happens for the transaction grid
///
/// The mode is fixed at startup: a grid either slices its fully loaded
/// collection or asks the repository for one page at a time. It never
/// switches between the two at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PagingMode {
    /// Slice the in-memory collection on the client side
    #[default]
    Client,
    /// Fetch one page at a time from the repository
    Server,
}

impl std::fmt::Display for PagingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PagingMode::Client => write!(f, "client"),
            PagingMode::Server => write!(f, "server"),
        }
    }
}

impl std::str::FromStr for PagingMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(PagingMode::Client),
            "server" => Ok(PagingMode::Server),
            _ => Err(format!("Invalid paging mode: {}", s)),
        }
    }
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page for the grid
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
    /// Pagination mode (client or server)
    #[serde(default)]
    pub mode: PagingMode,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
            mode: PagingMode::default(),
        }
    }
}

fn default_records_per_page() -> usize {
    5
}

/// Seed data settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Load the built-in demo transactions at startup
    #[serde(default = "default_true")]
    pub demo_data: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            demo_data: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(ConfigError::FileNotFound { path: display });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::InvalidYaml {
                path: display,
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from a file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(&path) {
            Ok(config) => Ok(config),
            Err(ConfigError::FileNotFound { .. }) => Ok(Config::default()),
            Err(e) => Err(e),
        }
    }

    /// Validate field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "port must be non-zero"));
        }
        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::invalid(
                "pagination.records_per_page",
                "page size must be at least 1",
            ));
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::invalid(
                "logging.level",
                format!("unknown log level: {}", other),
            )),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.pagination.records_per_page, 5);
        assert_eq!(config.pagination.mode, PagingMode::Client);
        assert!(config.seed.demo_data);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
server:
  port: 9000
pagination:
  records_per_page: 20
  mode: server
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pagination.records_per_page, 20);
        assert_eq!(config.pagination.mode, PagingMode::Server);
        assert!(config.seed.demo_data);
    }

    #[test]
    fn test_paging_mode_from_str() {
        assert_eq!("client".parse::<PagingMode>().unwrap(), PagingMode::Client);
        assert_eq!("SERVER".parse::<PagingMode>().unwrap(), PagingMode::Server);
        assert!("both".parse::<PagingMode>().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.pagination.records_per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/gridbook.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let config = Config::load_or_default("/nonexistent/gridbook.yaml").unwrap();
        assert_eq!(config.server.port, 8081);
    }
}
