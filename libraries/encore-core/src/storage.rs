//! Document store trait for per-user listening state

use crate::error::Result;
use crate::types::{
    FavoriteEntry, HistoryEntry, Playlist, PlaylistId, RecordOutcome, Track, TrackId, UserId,
};
use async_trait::async_trait;

/// Remote document store holding the `recentlyPlayed`, `favorites` and
/// `playlists` collections.
///
/// Every membership-style write is a keyed upsert on the store's own atomic
/// primitive. Two concurrent writers for the same key can never produce two
/// documents.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    // ========================================================================
    // Recently played
    // ========================================================================

    /// Insert the entry, or move the existing `(user, song)` entry's
    /// timestamp to `entry.played_at`. The stored snapshot is not rewritten.
    async fn record_play(&self, entry: &HistoryEntry) -> Result<RecordOutcome>;

    /// Newest first
    async fn recently_played(&self, user_id: &UserId, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Returns `true` if an entry was removed
    async fn remove_recently_played(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool>;

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Returns `true` if the track was not already a favorite
    async fn add_favorite(&self, user_id: &UserId, track: &Track) -> Result<bool>;

    /// Returns `true` if a favorite was removed
    async fn remove_favorite(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool>;

    async fn is_favorite(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool>;

    /// Newest first
    async fn favorites(&self, user_id: &UserId) -> Result<Vec<FavoriteEntry>>;

    // ========================================================================
    // Playlists
    // ========================================================================

    async fn create_playlist(&self, owner_id: &UserId, name: &str) -> Result<Playlist>;

    async fn playlists(&self, owner_id: &UserId) -> Result<Vec<Playlist>>;

    /// Returns `false` if the track is already in the playlist.
    /// Fails with `PlaylistNotFound` for an unknown playlist.
    async fn add_to_playlist(&self, playlist_id: &PlaylistId, track: &Track) -> Result<bool>;

    async fn remove_from_playlist(&self, playlist_id: &PlaylistId, song_id: &TrackId)
        -> Result<bool>;

    /// Tracks in insertion order
    async fn playlist_tracks(&self, playlist_id: &PlaylistId) -> Result<Vec<Track>>;
}
