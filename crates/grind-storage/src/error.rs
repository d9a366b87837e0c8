//! Storage error types for grind-storage.
//!
//! [`StorageError`] covers the failure modes of the storage layer: backend
//! errors, migrations, missing entities and integrity violations.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite backend reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// An article with the given ID was not found.
    #[error("article not found: {0}")]
    ArticleNotFound(String),

    /// Inserting an article whose ID is already taken.
    #[error("article already exists: {0}")]
    ArticleExists(String),

    /// A subscriber with the given ID was not found.
    #[error("subscriber not found: {0}")]
    SubscriberNotFound(i64),

    /// A data integrity violation was detected.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}
