//! SQLite adapter backed by rusqlite
//!
//! Accepted URL shapes:
//! - `sqlite::memory:` in-memory database
//! - `sqlite::memory:?cache=shared`
//! - `sqlite:data.db` relative file
//! - `sqlite:///var/lib/app.db` absolute file
//! - `sqlite:data.db?mode=ro` any SQLite URI parameter is passed through
//!
//! The `sqlite3` scheme is accepted as an alias.

use async_trait::async_trait;
use std::any::Any;
use url::Url;

use super::traits::{Connection, DriverError, Opener};

const SCHEMES: [&str; 2] = ["sqlite", "sqlite3"];

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteOpener;

impl SqliteOpener {
    pub const ID: &'static str = "sqlite";

    /// SQLite URI filename derived from the URL (`file:<host><path>[?query]`)
    pub fn dsn(url: &Url) -> String {
        let host = url.host_str().unwrap_or("");
        let mut path = url.path();
        // `sqlite:////abs` leaves `//abs` as the path, which SQLite would read
        // as a URI authority
        if host.is_empty() && path.starts_with("//") {
            let rooted = path.trim_start_matches('/');
            path = &path[path.len() - rooted.len() - 1..];
        }

        let mut dsn = format!("file:{host}{path}");
        if let Some(query) = url.query().filter(|q| !q.is_empty()) {
            dsn.push('?');
            dsn.push_str(query);
        }
        dsn
    }
}

#[async_trait]
impl Opener for SqliteOpener {
    fn id(&self) -> &str {
        Self::ID
    }

    fn can_open(&self, url: &Url) -> bool {
        SCHEMES.contains(&url.scheme())
    }

    async fn open(&self, url: &Url) -> Result<Box<dyn Connection>, DriverError> {
        if !self.can_open(url) {
            return Err(DriverError::UnsupportedScheme {
                opener: Self::ID.to_string(),
                scheme: url.scheme().to_string(),
                expected: SCHEMES.join(" or "),
            });
        }

        let dsn = Self::dsn(url);
        tracing::debug!(dsn = %dsn, "Opening SQLite database");

        let path = dsn.clone();
        let conn = tokio::task::spawn_blocking(move || rusqlite::Connection::open(path)).await??;

        Ok(Box::new(SqliteConnection {
            dsn,
            conn: Some(conn),
        }))
    }
}

/// Open SQLite handle
#[derive(Debug)]
pub struct SqliteConnection {
    dsn: String,
    conn: Option<rusqlite::Connection>,
}

impl SqliteConnection {
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Underlying rusqlite connection, `None` once closed
    pub fn inner(&self) -> Option<&rusqlite::Connection> {
        self.conn.as_ref()
    }

    pub fn inner_mut(&mut self) -> Option<&mut rusqlite::Connection> {
        self.conn.as_mut()
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    fn driver(&self) -> &str {
        SqliteOpener::ID
    }

    async fn ping(&mut self) -> Result<(), DriverError> {
        let conn = self.conn.as_ref().ok_or(DriverError::Closed)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, err)| DriverError::Sqlite(err))?;
            tracing::debug!(dsn = %self.dsn, "SQLite database closed");
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
