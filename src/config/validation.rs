use super::models::Config;
use crate::openers::BUILTIN;
use std::collections::HashSet;
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unknown driver '{id}' in drivers.enabled (known: {known})")]
    UnknownDriver { id: String, known: String },

    #[error("Driver '{0}' listed more than once in drivers.enabled")]
    DuplicateDriver(String),

    #[error("No drivers enabled")]
    NoDriversEnabled,

    #[error("Database name must not be empty")]
    EmptyDatabaseName,

    #[error("Database '{name}' has an invalid url: {reason}")]
    InvalidDatabaseUrl { name: String, reason: String },

    #[error("Invalid logging filter '{filter}': {reason}")]
    InvalidLogFilter { filter: String, reason: String },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_drivers(config)?;
    validate_databases(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_drivers(config: &Config) -> Result<(), ValidationError> {
    if config.drivers.enabled.is_empty() {
        return Err(ValidationError::NoDriversEnabled);
    }

    let mut seen = HashSet::new();
    for id in &config.drivers.enabled {
        if !BUILTIN.contains(&id.as_str()) {
            return Err(ValidationError::UnknownDriver {
                id: id.clone(),
                known: BUILTIN.join(", "),
            });
        }
        if !seen.insert(id.as_str()) {
            return Err(ValidationError::DuplicateDriver(id.clone()));
        }
    }

    Ok(())
}

/// Database URLs only have to parse; whether a driver claims them is decided
/// at open time.
fn validate_databases(config: &Config) -> Result<(), ValidationError> {
    for (name, database) in &config.databases {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyDatabaseName);
        }

        Url::parse(&database.url).map_err(|err| ValidationError::InvalidDatabaseUrl {
            name: name.clone(),
            reason: err.to_string(),
        })?;
    }

    Ok(())
}

fn validate_logging(config: &Config) -> Result<(), ValidationError> {
    EnvFilter::try_new(&config.logging.filter).map_err(|err| {
        ValidationError::InvalidLogFilter {
            filter: config.logging.filter.clone(),
            reason: err.to_string(),
        }
    })?;
    Ok(())
}
