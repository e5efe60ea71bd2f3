//! Per-user documents: recently played, favorites, playlists

use super::ids::{PlaylistId, TrackId, UserId};
use super::track::Track;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the "recently played" log.
///
/// Unique per `(user_id, song_id)`. `song_data` is a snapshot taken at first
/// play so the entry survives the track leaving the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub user_id: UserId,
    pub song_id: TrackId,
    pub song_data: Track,
    pub played_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry for `track` played at `played_at`
    pub fn new(user_id: UserId, track: &Track, played_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            song_id: track.id.clone(),
            song_data: track.clone(),
            played_at,
        }
    }
}

/// Result of a keyed history upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordOutcome {
    /// First play of this track by this user
    Inserted,

    /// Existing entry; only its timestamp moved
    Refreshed,
}

/// A track the user marked as favorite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub user_id: UserId,
    pub song_id: TrackId,
    pub song_data: Track,
    pub added_at: DateTime<Utc>,
}

/// User playlist header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: PlaylistId,
    pub owner_id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new playlist owned by `owner_id`
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: PlaylistId::generate(),
            owner_id,
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_entry_snapshots_track() {
        let track = Track::new("t1", "Song").with_artist("Artist");
        let at = Utc::now();
        let entry = HistoryEntry::new(UserId::new("u1"), &track, at);

        assert_eq!(entry.song_id, track.id);
        assert_eq!(entry.song_data, track);
        assert_eq!(entry.played_at, at);
    }

    #[test]
    fn new_playlists_get_distinct_ids() {
        let a = Playlist::new(UserId::new("u1"), "Road trip");
        let b = Playlist::new(UserId::new("u1"), "Road trip");
        assert_ne!(a.id, b.id);
    }
}
