//! Catalog Store - SQLite persistence
//!
//! SQLite-based storage for:
//! - Products (including the provider `external_id` mapping)
//! - User accounts
//! - The last completed reconciliation run (single-slot history)
//!
//! ## Architecture
//!
//! This crate implements the repository ports from `catalog-core` using
//! SQLite as the storage backend. It is a driven (secondary) adapter in the
//! hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteProductRepository`] - `IProductRepository` implementation
//! - [`SqliteUserRepository`] - `IUserRepository` implementation
//! - [`SqliteRunRepository`] - `IRunRepository` implementation
//! - [`StoreError`] - Error types for store operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use catalog_store::{DatabasePool, SqliteProductRepository};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/var/lib/catalog/catalog.db")).await?;
//! let products = SqliteProductRepository::new(pool.pool().clone());
//! // Use products as IProductRepository...
//! # Ok(())
//! # }
//! ```

pub mod pool;
pub mod products;
pub mod runs;
pub mod users;

mod util;

pub use pool::DatabasePool;
pub use products::SqliteProductRepository;
pub use runs::SqliteRunRepository;
pub use users::SqliteUserRepository;

/// Errors that can occur during store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Serialization or deserialization of domain types failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::QueryFailed(e.to_string())
    }
}
