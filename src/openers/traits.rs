use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Errors raised by an opener or by a connection it produced
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("scheme {scheme:?} not supported by {opener} opener (expected {expected})")]
    UnsupportedScheme {
        opener: String,
        scheme: String,
        expected: String,
    },

    #[error("invalid connection url: {0}")]
    InvalidUrl(String),

    #[error("connection is closed")]
    Closed,

    #[error("connection attempt timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("SQL Server error: {0}")]
    SqlServer(#[from] tiberius::error::Error),

    #[error("Oracle error: {0}")]
    Oracle(#[from] oracle::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Escape hatch for openers living outside this crate
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl DriverError {
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(err))
    }
}

/// Live connection handle returned by an opener.
///
/// Ownership belongs to whoever called `open`; nothing in the registry or
/// resolver keeps a reference to it.
#[async_trait]
pub trait Connection: Send + fmt::Debug {
    /// Id of the opener that produced this handle
    fn driver(&self) -> &str;

    /// Round-trip to the database to check the handle is usable
    async fn ping(&mut self) -> Result<(), DriverError>;

    /// Release the underlying resources. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<(), DriverError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Connection {
    /// Borrow the concrete driver handle behind the trait object
    pub fn downcast_ref<T: Connection + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Connection + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Driver adapter capable of turning a URL into a live connection.
///
/// `can_open` must stay side-effect free since the resolver calls it on every
/// registered opener while holding the registry read lock. `open` re-checks the
/// scheme itself because openers may be used without going through a resolver.
#[async_trait]
pub trait Opener: Send + Sync {
    /// Stable, non-empty identifier, unique within a registry
    fn id(&self) -> &str;

    /// Whether this opener handles the URL (usually a scheme comparison)
    fn can_open(&self, url: &Url) -> bool;

    /// Establish a connection for the URL
    async fn open(&self, url: &Url) -> Result<Box<dyn Connection>, DriverError>;
}
