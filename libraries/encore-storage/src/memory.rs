//! In-memory library store
//!
//! Same semantics as the `SQLite` store, nothing persisted. Each map is
//! keyed like the corresponding table, so upserts are a single
//! `entry()` call under the lock.

use async_trait::async_trait;
use chrono::Utc;
use encore_core::{
    error::{EncoreError, Result},
    storage::LibraryStore,
    types::*,
};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::Mutex;

type UserSong = (UserId, TrackId);

#[derive(Debug, Default)]
struct State {
    // Values carry an insertion sequence to break timestamp ties
    recently_played: HashMap<UserSong, (u64, HistoryEntry)>,
    favorites: HashMap<UserSong, (u64, FavoriteEntry)>,
    playlists: Vec<Playlist>,
    playlist_tracks: HashMap<PlaylistId, Vec<Track>>,
    seq: u64,
}

impl State {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

/// Library store kept in process memory
#[derive(Debug, Default)]
pub struct MemoryLibraryStore {
    state: Mutex<State>,
}

impl MemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(mut items: Vec<(i64, u64, T)>) -> Vec<T> {
    items.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    items.into_iter().map(|(_, _, item)| item).collect()
}

#[async_trait]
impl LibraryStore for MemoryLibraryStore {
    async fn record_play(&self, entry: &HistoryEntry) -> Result<RecordOutcome> {
        let mut state = self.state.lock().await;
        let seq = state.next_seq();
        let key = (entry.user_id.clone(), entry.song_id.clone());

        match state.recently_played.entry(key) {
            Entry::Occupied(mut existing) => {
                // A late write of an older play never moves the entry back
                let stored = &mut existing.get_mut().1.played_at;
                *stored = (*stored).max(entry.played_at);
                Ok(RecordOutcome::Refreshed)
            }
            Entry::Vacant(slot) => {
                slot.insert((seq, entry.clone()));
                Ok(RecordOutcome::Inserted)
            }
        }
    }

    async fn recently_played(&self, user_id: &UserId, limit: usize) -> Result<Vec<HistoryEntry>> {
        let state = self.state.lock().await;
        let entries = state
            .recently_played
            .values()
            .filter(|(_, e)| &e.user_id == user_id)
            .map(|(seq, e)| (e.played_at.timestamp_millis(), *seq, e.clone()))
            .collect();

        Ok(newest_first(entries).into_iter().take(limit).collect())
    }

    async fn remove_recently_played(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
        let mut state = self.state.lock().await;
        Ok(state
            .recently_played
            .remove(&(user_id.clone(), song_id.clone()))
            .is_some())
    }

    async fn add_favorite(&self, user_id: &UserId, track: &Track) -> Result<bool> {
        let mut state = self.state.lock().await;
        let seq = state.next_seq();

        match state.favorites.entry((user_id.clone(), track.id.clone())) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert((
                    seq,
                    FavoriteEntry {
                        user_id: user_id.clone(),
                        song_id: track.id.clone(),
                        song_data: track.clone(),
                        added_at: Utc::now(),
                    },
                ));
                Ok(true)
            }
        }
    }

    async fn remove_favorite(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
        let mut state = self.state.lock().await;
        Ok(state
            .favorites
            .remove(&(user_id.clone(), song_id.clone()))
            .is_some())
    }

    async fn is_favorite(&self, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state
            .favorites
            .contains_key(&(user_id.clone(), song_id.clone())))
    }

    async fn favorites(&self, user_id: &UserId) -> Result<Vec<FavoriteEntry>> {
        let state = self.state.lock().await;
        let entries = state
            .favorites
            .values()
            .filter(|(_, e)| &e.user_id == user_id)
            .map(|(seq, e)| (e.added_at.timestamp_millis(), *seq, e.clone()))
            .collect();

        Ok(newest_first(entries))
    }

    async fn create_playlist(&self, owner_id: &UserId, name: &str) -> Result<Playlist> {
        let mut state = self.state.lock().await;
        let playlist = Playlist::new(owner_id.clone(), name);

        state.playlist_tracks.insert(playlist.id.clone(), Vec::new());
        state.playlists.push(playlist.clone());
        Ok(playlist)
    }

    async fn playlists(&self, owner_id: &UserId) -> Result<Vec<Playlist>> {
        let state = self.state.lock().await;
        Ok(state
            .playlists
            .iter()
            .filter(|p| &p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn add_to_playlist(&self, playlist_id: &PlaylistId, track: &Track) -> Result<bool> {
        let mut state = self.state.lock().await;
        let tracks = state
            .playlist_tracks
            .get_mut(playlist_id)
            .ok_or_else(|| EncoreError::PlaylistNotFound(playlist_id.clone()))?;

        if tracks.iter().any(|t| t.id == track.id) {
            return Ok(false);
        }
        tracks.push(track.clone());
        Ok(true)
    }

    async fn remove_from_playlist(&self, playlist_id: &PlaylistId, song_id: &TrackId) -> Result<bool> {
        let mut state = self.state.lock().await;
        let Some(tracks) = state.playlist_tracks.get_mut(playlist_id) else {
            return Ok(false);
        };

        let before = tracks.len();
        tracks.retain(|t| &t.id != song_id);
        Ok(tracks.len() != before)
    }

    async fn playlist_tracks(&self, playlist_id: &PlaylistId) -> Result<Vec<Track>> {
        let state = self.state.lock().await;
        state
            .playlist_tracks
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| EncoreError::PlaylistNotFound(playlist_id.clone()))
    }
}
