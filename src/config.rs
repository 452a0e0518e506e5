//! Storage backend selection, resolved once at process start.
//!
//! Adapters implement the same port contracts, so call sites never branch on
//! the chosen backend: the composition root reads [`StorageBackend`] from the
//! environment, builds the matching adapters, and hands them to the services
//! as trait implementations.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// Environment variable naming the `PostgreSQL` connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// `PostgreSQL` connection pool type shared by all postgres adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Persistence backend selected at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Durable `PostgreSQL` persistence via Diesel.
    Postgres {
        /// Connection string for the database.
        database_url: String,
    },
    /// Process-local in-memory persistence.
    InMemory,
}

impl StorageBackend {
    /// Resolves the backend from the process environment.
    ///
    /// A non-empty `DATABASE_URL` selects `PostgreSQL`; anything else falls
    /// back to the in-memory backend.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_database_url(std::env::var(DATABASE_URL_VAR).ok().as_deref())
    }

    /// Resolves the backend from an optional connection string.
    #[must_use]
    pub fn from_database_url(database_url: Option<&str>) -> Self {
        match database_url {
            Some(url) if !url.trim().is_empty() => Self::Postgres {
                database_url: url.to_owned(),
            },
            _ => Self::InMemory,
        }
    }
}

/// Builds an `r2d2` connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`PoolError`] when the pool cannot be initialised.
pub fn build_pool(database_url: &str) -> Result<PgPool, PoolError> {
    Pool::builder().build(ConnectionManager::new(database_url))
}
