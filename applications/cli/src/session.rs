//! Headless playback session
//!
//! Runs the real controller against [`NullAudio`]: every track "ends" as
//! soon as it starts, so a whole queue plays through instantly while queue
//! policy, loop modes and history behave exactly as with a real device.

use crate::error::{CliError, Result};
use encore_core::{LibraryStore, Track, TrackId, UserId};
use encore_playback::{
    HistoryRecorder, NullAudio, PlayRecorder, PlaybackConfig, PlaybackController, PlaybackEvent,
};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What happened during a session
#[derive(Debug, Default)]
pub struct SessionReport {
    /// Tracks in the order they played (repeats included)
    pub played: Vec<TrackId>,
    pub events: Vec<PlaybackEvent>,
}

/// History recorder that remembers its background writes so a short-lived
/// process can wait for them before exiting
struct PendingRecorder {
    inner: HistoryRecorder,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl PlayRecorder for PendingRecorder {
    fn record(&self, user_id: &UserId, track: &Track) {
        if let Some(handle) = self.inner.spawn_record(user_id, track) {
            if let Ok(mut pending) = self.pending.lock() {
                pending.push(handle);
            }
        }
    }
}

impl PendingRecorder {
    async fn flush(&self) {
        let handles = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => Vec::new(),
        };

        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "History write task failed");
            }
        }
    }
}

pub struct HeadlessSession {
    controller: PlaybackController,
    recorder: Option<Arc<PendingRecorder>>,
}

impl HeadlessSession {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            controller: PlaybackController::new(Box::new(NullAudio::new()), config),
            recorder: None,
        }
    }

    /// Record every play of `user_id` in `store`
    #[must_use]
    pub fn with_history(self, store: Arc<dyn LibraryStore>, user_id: UserId) -> Self {
        let recorder = Arc::new(PendingRecorder {
            inner: HistoryRecorder::new(store),
            pending: Mutex::new(Vec::new()),
        });

        Self {
            controller: self.controller.with_recorder(recorder.clone(), user_id),
            recorder: Some(recorder),
        }
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Play `tracks` as a queue, starting at the first playable one, until
    /// the queue runs out or `max_plays` tracks have played.
    pub fn run(&mut self, tracks: Vec<Track>, max_plays: usize) -> Result<SessionReport> {
        let Some(first) = tracks.iter().find(|t| t.is_playable()).cloned() else {
            return Err(CliError::NothingPlayable(format!("{} tracks", tracks.len())));
        };

        let mut report = SessionReport::default();
        self.controller.play_track(first, Some(tracks))?;
        report.events.extend(self.controller.drain_events());

        while report.played.len() < max_plays {
            let Some(request) = self.controller.current_request() else {
                break;
            };

            report.played.push(request.track_id.clone());
            self.controller.on_track_end(&request)?;
            report.events.extend(self.controller.drain_events());
        }

        if self.controller.state().is_loaded() {
            debug!(plays = report.played.len(), "Play limit reached, stopping");
            self.controller.stop();
            report.events.extend(self.controller.drain_events());
        }

        Ok(report)
    }

    /// Wait for outstanding history writes
    pub async fn flush(&self) {
        if let Some(recorder) = &self.recorder {
            recorder.flush().await;
        }
    }
}
