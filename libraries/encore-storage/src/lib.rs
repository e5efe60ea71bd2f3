//! Encore Storage
//!
//! Library persistence for Encore: recently played, favorites and playlists.
//!
//! # Architecture
//!
//! - **Keyed upserts**: every "find or create" is one statement against a
//!   `UNIQUE` key, so concurrent writers cannot duplicate an entry
//! - **Vertical slicing**: each collection owns its own queries
//! - **Denormalized snapshots**: stored rows carry the track as JSON so they
//!   outlive the catalog entry
//!
//! # Example
//!
//! ```rust,no_run
//! use encore_storage::SqliteLibraryStore;
//! use encore_core::{HistoryEntry, LibraryStore, Track, UserId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteLibraryStore::open("sqlite://encore.db").await?;
//!
//! let user = UserId::new("local");
//! let track = Track::new("deezer:3135556", "Harder, Better, Faster, Stronger");
//! store.record_play(&HistoryEntry::new(user.clone(), &track, chrono::Utc::now())).await?;
//!
//! let recent = store.recently_played(&user, 10).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod document;
mod error;
mod memory;

// Vertical slices
pub mod favorites;
pub mod playlists;
pub mod recently_played;

pub use context::SqliteLibraryStore;
pub use error::StorageError;
pub use memory::MemoryLibraryStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://encore.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!("SQLite pool ready");

    Ok(pool)
}
