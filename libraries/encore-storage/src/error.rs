/// Storage-specific errors
use thiserror::Error;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Stored value could not be turned back into a domain type
    #[error("Corrupt {column} value: {reason}")]
    Corrupt { column: &'static str, reason: String },

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    pub(crate) fn corrupt(column: &'static str, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            column,
            reason: reason.into(),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(err.to_string())
    }
}

impl From<StorageError> for encore_core::EncoreError {
    fn from(err: StorageError) -> Self {
        encore_core::EncoreError::storage(err.to_string())
    }
}
