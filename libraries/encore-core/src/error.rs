/// Core error types for Encore
use crate::types::PlaylistId;
use thiserror::Error;

/// Result type alias using `EncoreError`
pub type Result<T> = std::result::Result<T, EncoreError>;

/// Core error type shared by the store implementations
#[derive(Error, Debug)]
pub enum EncoreError {
    /// Backend failure (connection, migration, corrupt row)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl EncoreError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for EncoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
