use std::collections::HashMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use url::Url;

use super::oracle::OracleOpener;
use super::sqlite::SqliteOpener;
use super::sqlserver::SqlServerOpener;
use super::traits::Opener;

/// Registration contract violations.
///
/// These point at a broken adapter set rather than at bad runtime input, so
/// [`Registry::register`] turns them into a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("opener has an empty id")]
    EmptyId,

    #[error("opener registered twice: {0}")]
    Duplicate(String),
}

static GLOBAL: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::with_defaults()));

/// Id-keyed set of openers shared between registering and resolving threads
#[derive(Default)]
pub struct Registry {
    openers: RwLock<HashMap<String, Arc<dyn Opener>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in adapter
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(Arc::new(SqliteOpener));
        registry.register(Arc::new(SqlServerOpener));
        registry.register(Arc::new(OracleOpener));
        registry
    }

    /// Build a registry from an explicit adapter table
    pub fn from_openers<I>(openers: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = Arc<dyn Opener>>,
    {
        let registry = Self::new();
        for opener in openers {
            registry.try_register(opener)?;
        }
        Ok(registry)
    }

    /// Process-wide registry, populated with the built-in adapters on first use
    pub fn global() -> Arc<Registry> {
        Arc::clone(&GLOBAL)
    }

    /// Insert an opener under its id, rejecting empty and duplicate ids.
    ///
    /// The existing entry is left untouched when the id is already taken.
    pub fn try_register(&self, opener: Arc<dyn Opener>) -> Result<(), RegistryError> {
        let id = opener.id().to_string();
        if id.is_empty() {
            return Err(RegistryError::EmptyId);
        }

        let mut openers = self.write();
        if openers.contains_key(&id) {
            tracing::warn!(opener = %id, "Rejected duplicate opener registration");
            return Err(RegistryError::Duplicate(id));
        }
        openers.insert(id.clone(), opener);
        tracing::debug!(opener = %id, total = openers.len(), "Opener registered");
        Ok(())
    }

    /// Insert an opener, halting on a contract violation.
    ///
    /// # Panics
    ///
    /// Panics when the opener id is empty or already registered.
    pub fn register(&self, opener: Arc<dyn Opener>) {
        if let Err(err) = self.try_register(opener) {
            panic!("sqlopen: {err}");
        }
    }

    /// Drop every registered opener
    pub fn reset(&self) {
        let mut openers = self.write();
        let dropped = openers.len();
        openers.clear();
        tracing::debug!(dropped, "Registry reset");
    }

    /// Ids of all registered openers, sorted
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// First opener claiming the URL.
    ///
    /// Iteration order is unspecified; when several openers claim the same
    /// scheme any of them may win.
    pub fn find(&self, url: &Url) -> Option<Arc<dyn Opener>> {
        self.read()
            .values()
            .find(|opener| opener.can_open(url))
            .cloned()
    }

    // A writer only ever performs a single insert or clear, so the map is
    // consistent even if a holder panicked.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn Opener>>> {
        self.openers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn Opener>>> {
        self.openers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("openers", &self.list())
            .finish()
    }
}
