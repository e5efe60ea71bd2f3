use crate::{create_pool, favorites, playlists, recently_played, run_migrations, StorageError};
use async_trait::async_trait;
use encore_core::{error::Result, storage::LibraryStore, types::*};
use sqlx::SqlitePool;
use tracing::info;

/// Library store backed by `SQLite`
#[derive(Debug, Clone)]
pub struct SqliteLibraryStore {
    pool: SqlitePool,
}

impl SqliteLibraryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and bring the schema up to date
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or a migration fails
    pub async fn open(database_url: &str) -> std::result::Result<Self, StorageError> {
        let pool = create_pool(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        run_migrations(&pool).await?;

        info!(url = %database_url, "Library database ready");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LibraryStore for SqliteLibraryStore {
    // Recently played
    async fn record_play(&self, entry: &HistoryEntry) -> Result<RecordOutcome> {
        recently_played::record(&self.pool, entry).await
    }

    async fn recently_played(&self, user_id: &UserId, limit: usize) -> Result<Vec<HistoryEntry>> {
        recently_played::get_recent(&self.pool, user_id, limit).await
    }

    async fn remove_recently_played(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
        recently_played::remove(&self.pool, user_id, song_id).await
    }

    // Favorites
    async fn add_favorite(&self, user_id: &UserId, track: &Track) -> Result<bool> {
        favorites::add(&self.pool, user_id, track).await
    }

    async fn remove_favorite(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
        favorites::remove(&self.pool, user_id, song_id).await
    }

    async fn is_favorite(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
        favorites::contains(&self.pool, user_id, song_id).await
    }

    async fn favorites(&self, user_id: &UserId) -> Result<Vec<FavoriteEntry>> {
        favorites::get_all(&self.pool, user_id).await
    }

    // Playlists
    async fn create_playlist(&self, owner_id: &UserId, name: &str) -> Result<Playlist> {
        playlists::create(&self.pool, owner_id, name).await
    }

    async fn playlists(&self, owner_id: &UserId) -> Result<Vec<Playlist>> {
        playlists::get_user_playlists(&self.pool, owner_id).await
    }

    async fn add_to_playlist(&self, playlist_id: &PlaylistId, track: &Track) -> Result<bool> {
        playlists::add_track(&self.pool, playlist_id, track).await
    }

    async fn remove_from_playlist(&self, playlist_id: &PlaylistId, song_id: &TrackId) -> Result<bool> {
        playlists::remove_track(&self.pool, playlist_id, song_id).await
    }

    async fn playlist_tracks(&self, playlist_id: &PlaylistId) -> Result<Vec<Track>> {
        playlists::get_tracks(&self.pool, playlist_id).await
    }
}
