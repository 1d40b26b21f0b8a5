//! Pluggable database connection resolver.
//!
//! A [`Resolver`] parses a connection URL and hands it to the first
//! [`Opener`](openers::Opener) in its [`Registry`](openers::Registry) that claims
//! the URL's scheme.
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), sqlopen::OpenError> {
//! let mut conn = sqlopen::open("sqlite::memory:").await?;
//! conn.ping().await?;
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod observability;
pub mod openers;
pub mod resolver;

pub use resolver::{OpenError, Resolver, open};
