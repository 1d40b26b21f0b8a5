use super::models::{Config, DatabaseConfig};
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "SQLOPEN_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/sqlopen.toml";
const ENV_PREFIX: &str = "SQLOPEN";
const ENV_SEPARATOR: &str = "__";
const DATABASE_URL_VAR: &str = "DATABASE_URL";
const DEFAULT_DATABASE: &str = "default";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_with_secrets(config_path, env::var(DATABASE_URL_VAR).ok())
}

/// Same layering as [`load`] for an explicitly chosen file
pub fn load_path(config_path: PathBuf) -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();
    load_with_secrets(config_path, env::var(DATABASE_URL_VAR).ok())
}

fn load_with_secrets(
    config_path: PathBuf,
    database_url: Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config, database_url);
    Ok(config)
}

/// `DATABASE_URL` carries credentials, so it only ever comes from the
/// environment. It fills the `default` entry unless the file defines one.
fn load_secrets(config: &mut Config, database_url: Option<String>) {
    let Some(url) = database_url.filter(|url| !url.is_empty()) else {
        return;
    };

    if config.databases.contains_key(DEFAULT_DATABASE) {
        tracing::debug!("{DATABASE_URL_VAR} ignored, '{DEFAULT_DATABASE}' database already configured");
        return;
    }

    config.databases.insert(
        DEFAULT_DATABASE.to_string(),
        DatabaseConfig {
            url,
            description: Some(format!("from {DATABASE_URL_VAR}")),
        },
    );
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // SQLOPEN__LOGGING__FILTER -> logging.filter
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .list_separator(",")
            .with_list_parse_key("drivers.enabled")
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
