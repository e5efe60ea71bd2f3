//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue operation on zero tracks
    #[error("Queue is empty")]
    QueueEmpty,

    /// The audio resource refused to load, play or seek
    #[error("Audio error: {0}")]
    Audio(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// History store failure (only surfaced by direct `record_now` calls)
    #[error(transparent)]
    Store(#[from] encore_core::EncoreError),
}

impl PlaybackError {
    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
