//! Driver openers and the registry that holds them
//!
//! ## Key Components
//!
//! - [`Opener`] - Capability contract every driver adapter implements
//! - [`Connection`] - Handle returned by a successful open
//! - [`Registry`] - Concurrency-safe id → opener map
//! - [`SqliteOpener`] - Built-in adapter for `sqlite:` / `sqlite3:` URLs
//! - [`SqlServerOpener`] - Built-in adapter for `sqlserver:` URLs
//! - [`OracleOpener`] - Built-in adapter for `oracle:` URLs
//!
//! ## Example
//!
//! ```rust,no_run
//! use sqlopen::openers::Registry;
//! use url::Url;
//!
//! let registry = Registry::with_defaults();
//! let url = Url::parse("sqlite::memory:").unwrap();
//! let opener = registry.find(&url).expect("sqlite is built in");
//! assert_eq!(opener.id(), "sqlite");
//! ```

mod oracle;
mod registry;
mod sqlite;
mod sqlserver;
mod traits;

use std::sync::Arc;

pub use self::oracle::{OracleConnection, OracleOpener, OracleOptions};
pub use registry::{Registry, RegistryError};
pub use sqlite::{SqliteConnection, SqliteOpener};
pub use sqlserver::{Encryption, SqlServerConnection, SqlServerOpener, SqlServerOptions};
pub use traits::{Connection, DriverError, Opener};

/// Ids of the adapters shipped with this crate
pub const BUILTIN: [&str; 3] = [SqliteOpener::ID, SqlServerOpener::ID, OracleOpener::ID];

/// Instantiate a built-in adapter by id
pub fn builtin(id: &str) -> Option<Arc<dyn Opener>> {
    match id {
        SqliteOpener::ID => Some(Arc::new(SqliteOpener)),
        SqlServerOpener::ID => Some(Arc::new(SqlServerOpener)),
        OracleOpener::ID => Some(Arc::new(OracleOpener)),
        _ => None,
    }
}
