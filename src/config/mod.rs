//! Configuration management for sqlopen
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use sqlopen::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! let registry = config.build_registry().expect("valid driver list");
//! println!("Drivers: {:?}", registry.list());
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `SQLOPEN__<section>__<key>`
//!
//! Examples:
//! - `SQLOPEN__LOGGING__FILTER=sqlopen=debug`
//! - `SQLOPEN__DRIVERS__ENABLED=sqlite,mssql`
//! - `SQLOPEN__DATABASES__MAIN__URL=sqlite:///var/lib/app.db`
//!
//! `DATABASE_URL` becomes the `default` database when the file defines none.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/sqlopen.toml`.
//! This can be overridden using the `SQLOPEN_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, DatabaseConfig, DriversConfig, LoggingConfig};
pub use validation::ValidationError;

use crate::openers::{self, Registry, RegistryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("Driver registration failed: {0}")]
    RegistryError(#[from] RegistryError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`SQLOPEN__*`, `DATABASE_URL`)
    /// 2. TOML file (default: `config/sqlopen.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (unknown drivers, unparseable URLs, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Environment overrides, `.env` and `DATABASE_URL` still apply.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_path(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Registry holding the enabled built-in openers
    pub fn build_registry(&self) -> Result<Registry, ConfigError> {
        let mut table = Vec::with_capacity(self.drivers.enabled.len());
        for id in &self.drivers.enabled {
            let opener = openers::builtin(id).ok_or_else(|| ValidationError::UnknownDriver {
                id: id.clone(),
                known: openers::BUILTIN.join(", "),
            })?;
            table.push(opener);
        }
        Ok(Registry::from_openers(table)?)
    }

    /// URL for a configured database name; anything else is taken as a URL
    pub fn database_url<'a>(&'a self, target: &'a str) -> &'a str {
        self.databases
            .get(target)
            .map(|database| database.url.as_str())
            .unwrap_or(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[databases.main]
url = "sqlite::memory:"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.databases["main"].url, "sqlite::memory:");
        assert_eq!(config.drivers.enabled, openers::BUILTIN);
    }

    #[test]
    fn test_validation_catches_unknown_driver() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[drivers]
enabled = ["sqlite", "postgres"]
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::UnknownDriver { .. })
        ));
    }

    #[test]
    fn test_build_registry_from_enabled_drivers() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[drivers]\nenabled = [\"sqlite\"]\n").unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.list(), vec!["sqlite"]);
    }

    #[test]
    fn test_build_registry_rejects_duplicates() {
        let mut config = Config::default();
        config.drivers.enabled = vec!["mssql".to_string(), "mssql".to_string()];

        assert!(matches!(
            config.build_registry(),
            Err(ConfigError::RegistryError(RegistryError::Duplicate(_)))
        ));
    }

    #[test]
    fn test_database_url_alias() {
        let mut config = Config::default();
        config.databases.insert(
            "main".to_string(),
            DatabaseConfig {
                url: "sqlite:main.db".to_string(),
                description: None,
            },
        );

        assert_eq!(config.database_url("main"), "sqlite:main.db");
        assert_eq!(config.database_url("sqlite::memory:"), "sqlite::memory:");
    }
}
