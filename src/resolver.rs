//! URL → opener dispatch
//!
//! The resolver parses a connection URL, picks the first registered opener
//! whose `can_open` accepts it and hands the URL over. The registry read lock is
//! only held while matching; the adapter's `open` runs after it is released.

use std::sync::{Arc, LazyLock};
use thiserror::Error;
use url::Url;

use crate::observability::Metrics;
use crate::openers::{Connection, DriverError, Opener, Registry, RegistryError};

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("invalid database url: {0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported driver or incorrect url scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// Failure reported by the matched opener, passed through untouched
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl OpenError {
    pub fn is_unsupported_scheme(&self) -> bool {
        matches!(self, Self::UnsupportedScheme { .. })
    }
}

static GLOBAL: LazyLock<Resolver> = LazyLock::new(|| Resolver::new(Registry::global()));

/// Dispatches URLs to the openers of a registry
#[derive(Debug)]
pub struct Resolver {
    registry: Arc<Registry>,
    metrics: Metrics,
}

impl Resolver {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            metrics: Metrics::new(),
        }
    }

    /// Resolver over a fresh registry built from an adapter table
    pub fn with_openers<I>(openers: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Arc<dyn Opener>>,
    {
        Ok(Self::new(Arc::new(Registry::from_openers(openers)?)))
    }

    /// Resolver over the process-wide registry
    pub fn global() -> &'static Resolver {
        &GLOBAL
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Opener that would handle `url`, without opening anything
    pub fn resolve(&self, url: &str) -> Result<Arc<dyn Opener>, OpenError> {
        let parsed = Url::parse(url).inspect_err(|_| self.metrics.parse_failed())?;
        self.find(&parsed)
    }

    /// Open a connection through the first opener claiming `url`.
    ///
    /// The chosen opener's result is returned as is: no retry and no fallback
    /// to another opener claiming the same scheme.
    pub async fn open(&self, url: &str) -> Result<Box<dyn Connection>, OpenError> {
        self.metrics.open_attempted();

        let parsed = Url::parse(url).inspect_err(|err| {
            self.metrics.parse_failed();
            tracing::debug!(error = %err, "Rejected unparseable database url");
        })?;
        let opener = self.find(&parsed)?;

        tracing::debug!(opener = opener.id(), scheme = parsed.scheme(), "Dispatching open");
        match opener.open(&parsed).await {
            Ok(conn) => {
                self.metrics.open_succeeded();
                Ok(conn)
            }
            Err(err) => {
                self.metrics.driver_failed();
                tracing::warn!(opener = opener.id(), error = %err, "Opener failed");
                Err(err.into())
            }
        }
    }

    fn find(&self, url: &Url) -> Result<Arc<dyn Opener>, OpenError> {
        match self.registry.find(url) {
            Some(opener) => Ok(opener),
            None => {
                self.metrics.unsupported_scheme();
                tracing::debug!(scheme = url.scheme(), "No opener for scheme");
                Err(OpenError::UnsupportedScheme {
                    scheme: url.scheme().to_string(),
                })
            }
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Arc::new(Registry::with_defaults()))
    }
}

/// Open `url` through the process-wide registry
pub async fn open(url: &str) -> Result<Box<dyn Connection>, OpenError> {
    Resolver::global().open(url).await
}
