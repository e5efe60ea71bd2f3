/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No playable tracks for {0:?}")]
    NothingPlayable(String),

    #[error("No results for {0:?}")]
    NoResults(String),

    #[error(transparent)]
    Catalog(#[from] encore_catalog::CatalogError),

    #[error(transparent)]
    Playback(#[from] encore_playback::PlaybackError),

    #[error("Library error: {0}")]
    Library(#[from] encore_core::EncoreError),

    #[error(transparent)]
    Storage(#[from] encore_storage::StorageError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
