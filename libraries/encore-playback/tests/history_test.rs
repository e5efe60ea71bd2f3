//! History recorder tests
//!
//! Runs the recorder against the real stores plus one that always fails, and
//! checks that playback never notices a history write.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use encore_core::{
    EncoreError, FavoriteEntry, HistoryEntry, LibraryStore, Playlist, PlaylistId, RecordOutcome,
    Track, TrackId, UserId,
};
use encore_playback::{
    HistoryRecorder, NullAudio, PlaybackConfig, PlaybackController, PlaybackError, PlaybackState,
};
use encore_storage::{MemoryLibraryStore, SqliteLibraryStore};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// HELPERS
// ============================================================================

/// Store whose every operation fails, like an unreachable backend
struct UnreachableStore;

fn unreachable() -> EncoreError {
    EncoreError::storage("connection refused")
}

#[async_trait]
impl LibraryStore for UnreachableStore {
    async fn record_play(&self, _: &HistoryEntry) -> encore_core::Result<RecordOutcome> {
        Err(unreachable())
    }
    async fn recently_played(&self, _: &UserId, _: usize) -> encore_core::Result<Vec<HistoryEntry>> {
        Err(unreachable())
    }
    async fn remove_recently_played(&self, _: &UserId, _: &TrackId) -> encore_core::Result<bool> {
        Err(unreachable())
    }
    async fn add_favorite(&self, _: &UserId, _: &Track) -> encore_core::Result<bool> {
        Err(unreachable())
    }
    async fn remove_favorite(&self, _: &UserId, _: &TrackId) -> encore_core::Result<bool> {
        Err(unreachable())
    }
    async fn is_favorite(&self, _: &UserId, _: &TrackId) -> encore_core::Result<bool> {
        Err(unreachable())
    }
    async fn favorites(&self, _: &UserId) -> encore_core::Result<Vec<FavoriteEntry>> {
        Err(unreachable())
    }
    async fn create_playlist(&self, _: &UserId, _: &str) -> encore_core::Result<Playlist> {
        Err(unreachable())
    }
    async fn playlists(&self, _: &UserId) -> encore_core::Result<Vec<Playlist>> {
        Err(unreachable())
    }
    async fn add_to_playlist(&self, _: &PlaylistId, _: &Track) -> encore_core::Result<bool> {
        Err(unreachable())
    }
    async fn remove_from_playlist(&self, _: &PlaylistId, _: &TrackId) -> encore_core::Result<bool> {
        Err(unreachable())
    }
    async fn playlist_tracks(&self, _: &PlaylistId) -> encore_core::Result<Vec<Track>> {
        Err(unreachable())
    }
}

fn create_test_track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id)).with_source(format!("https://cdn.example/{}.mp3", id))
}

/// Wait until the background writes have landed
async fn wait_for_history(store: &dyn LibraryStore, user: &UserId, expected: usize) -> Vec<HistoryEntry> {
    for _ in 0..100 {
        let entries = store.recently_played(user, 50).await.unwrap();
        if entries.len() >= expected {
            return entries;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    store.recently_played(user, 50).await.unwrap()
}

// ============================================================================
// RECORDER
// ============================================================================

#[tokio::test]
async fn test_record_twice_keeps_one_entry_with_latest_timestamp() {
    let store = Arc::new(MemoryLibraryStore::new());
    let recorder = HistoryRecorder::new(store.clone());
    let user = UserId::new("user-1");
    let track = create_test_track("A");
    let first = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let second = Utc.with_ymd_and_hms(2026, 3, 1, 9, 4, 0).unwrap();

    assert_eq!(
        recorder.record_at(&user, &track, first).await.unwrap(),
        RecordOutcome::Inserted
    );
    assert_eq!(
        recorder.record_at(&user, &track, second).await.unwrap(),
        RecordOutcome::Refreshed
    );

    let entries = store.recently_played(&user, 50).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].played_at, second);
}

#[tokio::test]
async fn test_record_twice_against_sqlite() {
    let temp_dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", temp_dir.path().join("history.db").display());
    let store = Arc::new(SqliteLibraryStore::open(&url).await.unwrap());
    let recorder = HistoryRecorder::new(store.clone());
    let user = UserId::new("user-1");
    let track = create_test_track("A");

    recorder.record_now(&user, &track).await.unwrap();
    let outcome = recorder.record_now(&user, &track).await.unwrap();

    assert_eq!(outcome, RecordOutcome::Refreshed);
    assert_eq!(store.recently_played(&user, 50).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_late_older_write_keeps_latest_timestamp_in_sqlite() {
    let temp_dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", temp_dir.path().join("history.db").display());
    let store = Arc::new(SqliteLibraryStore::open(&url).await.unwrap());
    let recorder = HistoryRecorder::new(store.clone());
    let user = UserId::new("user-1");
    let track = create_test_track("A");
    let earlier = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2026, 1, 1, 10, 5, 0).unwrap();

    recorder.record_at(&user, &track, later).await.unwrap();
    recorder.record_at(&user, &track, earlier).await.unwrap();

    let entries = store.recently_played(&user, 50).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].played_at, later);
}

#[tokio::test]
async fn test_spawned_record_uses_time_of_play() {
    let store = Arc::new(MemoryLibraryStore::new());
    let recorder = HistoryRecorder::new(store.clone());
    let user = UserId::new("user-1");

    let handle = recorder
        .spawn_record(&user, &create_test_track("A"))
        .unwrap();
    let played = Utc::now();

    // The task has not run yet on this single-threaded runtime
    std::thread::sleep(Duration::from_millis(20));
    handle.await.unwrap();

    let entries = store.recently_played(&user, 50).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].played_at <= played);
}

#[tokio::test]
async fn test_direct_record_surfaces_store_failure() {
    let recorder = HistoryRecorder::new(Arc::new(UnreachableStore));

    let result = recorder
        .record_now(&UserId::new("user-1"), &create_test_track("A"))
        .await;

    assert!(matches!(result, Err(PlaybackError::Store(EncoreError::Storage(_)))));
}

#[tokio::test]
async fn test_spawned_record_swallows_failure() {
    let recorder = HistoryRecorder::new(Arc::new(UnreachableStore));

    let handle = recorder
        .spawn_record(&UserId::new("user-1"), &create_test_track("A"))
        .expect("runtime is available");

    // The task completes normally; the failure only reaches the log
    handle.await.unwrap();
}

#[test]
fn test_spawn_outside_runtime_is_skipped() {
    let recorder = HistoryRecorder::new(Arc::new(MemoryLibraryStore::new()));
    assert!(recorder
        .spawn_record(&UserId::new("user-1"), &create_test_track("A"))
        .is_none());
}

// ============================================================================
// CONTROLLER INTEGRATION
// ============================================================================

#[tokio::test]
async fn test_plays_are_recorded_in_background() {
    let store = Arc::new(MemoryLibraryStore::new());
    let user = UserId::new("user-1");
    let mut controller =
        PlaybackController::new(Box::new(NullAudio::new()), PlaybackConfig::default())
            .with_recorder(Arc::new(HistoryRecorder::new(store.clone())), user.clone());
    let tracks = vec![create_test_track("A"), create_test_track("B")];

    controller
        .play_track(tracks[0].clone(), Some(tracks.clone()))
        .unwrap();
    controller.next().unwrap();
    controller.previous().unwrap();

    let entries = wait_for_history(store.as_ref(), &user, 2).await;
    let mut ids: Vec<&str> = entries.iter().map(|e| e.song_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["A", "B"]);
}

#[tokio::test]
async fn test_history_failure_does_not_affect_playback() {
    let mut controller =
        PlaybackController::new(Box::new(NullAudio::new()), PlaybackConfig::default())
            .with_recorder(
                Arc::new(HistoryRecorder::new(Arc::new(UnreachableStore))),
                UserId::new("user-1"),
            );

    controller.play_track(create_test_track("A"), None).unwrap();
    tokio::task::yield_now().await;

    assert_eq!(controller.state(), PlaybackState::Playing);
    let events = controller.drain_events();
    assert!(!events
        .iter()
        .any(|e| matches!(e, encore_playback::PlaybackEvent::Error { .. })));
}
