use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::openers::BUILTIN;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub drivers: DriversConfig,
    /// Named connection targets, usable wherever a URL is expected
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Which built-in openers get registered
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DriversConfig {
    #[serde(default = "default_enabled_drivers")]
    pub enabled: Vec<String>,
}

impl Default for DriversConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_drivers(),
        }
    }
}

fn default_enabled_drivers() -> Vec<String> {
    BUILTIN.iter().map(|id| id.to_string()).collect()
}

/// Named database entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
