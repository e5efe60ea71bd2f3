//! Play history recording
//!
//! Keeps the per-user "recently played" collection in the document store up
//! to date: at most one entry per `(user, track)`, timestamp refreshed on
//! every replay. Writes are best-effort telemetry and never reach the
//! playback path.

use crate::error::Result;
use chrono::{DateTime, Utc};
use encore_core::types::{HistoryEntry, RecordOutcome, Track, UserId};
use encore_core::LibraryStore;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Sink the controller reports plays to.
///
/// Implementations must return immediately; any I/O happens in the
/// background.
pub trait PlayRecorder: Send + Sync {
    fn record(&self, user_id: &UserId, track: &Track);
}

/// Writes plays to a [`LibraryStore`] through its atomic keyed upsert
#[derive(Clone)]
pub struct HistoryRecorder {
    store: Arc<dyn LibraryStore>,
}

impl HistoryRecorder {
    /// Create a recorder writing to `store`
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Upsert the history entry for `track` with the current time
    pub async fn record_now(&self, user_id: &UserId, track: &Track) -> Result<RecordOutcome> {
        self.record_at(user_id, track, Utc::now()).await
    }

    /// Upsert the history entry for `track` played at `played_at`
    pub async fn record_at(
        &self,
        user_id: &UserId,
        track: &Track,
        played_at: DateTime<Utc>,
    ) -> Result<RecordOutcome> {
        let entry = HistoryEntry::new(user_id.clone(), track, played_at);
        let outcome = self.store.record_play(&entry).await?;

        debug!(
            user_id = %user_id,
            track_id = %track.id,
            outcome = ?outcome,
            "Recorded play"
        );

        Ok(outcome)
    }

    /// Record a play on the current tokio runtime without waiting for it.
    ///
    /// The play time is taken now, not when the task runs. Failures are
    /// logged and dropped. Returns `None` when called outside a runtime, in
    /// which case nothing is written.
    pub fn spawn_record(&self, user_id: &UserId, track: &Track) -> Option<JoinHandle<()>> {
        let Ok(handle) = Handle::try_current() else {
            warn!(
                track_id = %track.id,
                "No async runtime available, skipping history write"
            );
            return None;
        };

        let played_at = Utc::now();
        let recorder = self.clone();
        let user_id = user_id.clone();
        let track = track.clone();

        Some(handle.spawn(async move {
            if let Err(e) = recorder.record_at(&user_id, &track, played_at).await {
                warn!(
                    user_id = %user_id,
                    track_id = %track.id,
                    error = %e,
                    "Failed to record play history"
                );
            }
        }))
    }
}

impl PlayRecorder for HistoryRecorder {
    fn record(&self, user_id: &UserId, track: &Track) {
        // Fire-and-forget: the handle is dropped, the task keeps running
        let _ = self.spawn_record(user_id, track);
    }
}

impl std::fmt::Debug for HistoryRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryRecorder").finish_non_exhaustive()
    }
}
