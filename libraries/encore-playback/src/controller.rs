//! Playback controller - transport state machine
//!
//! Mediates between UI intent, the queue store and the audio resource:
//!
//! ```text
//!            play_track            toggle
//!   Idle ───────────────▶ Playing ◀──────▶ Paused
//!    ▲                      │  audio error    ▲
//!    │   end/start of queue │ ────────────────┘
//!    └──────────────────────┘
//! ```
//!
//! Single writer: every mutation takes `&mut self`. Observers read snapshots
//! through [`PlaybackController::subscribe`] or drain discrete events.

use crate::{
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    history::PlayRecorder,
    queue::Queue,
    source::AudioResource,
    types::{
        Advance, LoopMode, PlayOutcome, PlayRequest, PlaybackConfig, PlaybackState,
        PlayerSnapshot,
    },
};
use encore_core::types::{Track, TrackId, UserId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Direction of a queue step
#[derive(Debug, Clone, Copy)]
enum Step {
    Forward,
    Backward,
}

/// Central playback orchestration
pub struct PlaybackController {
    // State
    state: PlaybackState,
    current_track: Option<Track>,

    // Queue and modifiers
    queue: Queue,
    loop_mode: LoopMode,
    shuffle: bool,

    // Collaborators
    audio: Box<dyn AudioResource>,
    recorder: Option<Arc<dyn PlayRecorder>>,
    user_id: Option<UserId>,

    // Bumped on every play request; older completions are stale
    attempt: u64,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
    snapshot_tx: watch::Sender<PlayerSnapshot>,
}

impl PlaybackController {
    /// Create a controller driving `audio`
    pub fn new(audio: Box<dyn AudioResource>, config: PlaybackConfig) -> Self {
        let (snapshot_tx, _) = watch::channel(PlayerSnapshot {
            loop_mode: config.loop_mode,
            shuffle: config.shuffle,
            ..PlayerSnapshot::default()
        });

        Self {
            state: PlaybackState::Idle,
            current_track: None,
            queue: Queue::new(),
            loop_mode: config.loop_mode,
            shuffle: config.shuffle,
            audio,
            recorder: None,
            user_id: None,
            attempt: 0,
            pending_events: Vec::new(),
            snapshot_tx,
        }
    }

    /// Report every accepted play of `user_id` to `recorder`
    #[must_use]
    pub fn with_recorder(mut self, recorder: Arc<dyn PlayRecorder>, user_id: UserId) -> Self {
        self.recorder = Some(recorder);
        self.user_id = Some(user_id);
        self
    }

    // ===== Playback Control =====

    /// Play `track`, optionally replacing the queue with `queue` first.
    ///
    /// A track without a source is refused without touching any state.
    /// Without a new queue the track is selected in the current one, or
    /// becomes a one-track queue if it is not part of it.
    pub fn play_track(&mut self, track: Track, queue: Option<Vec<Track>>) -> Result<PlayOutcome> {
        if !track.is_playable() {
            debug!(track_id = %track.id, "Ignoring play request for track without source");
            return Ok(PlayOutcome::Unplayable);
        }

        match queue {
            Some(tracks) => {
                self.queue.load(tracks, Some(&track.id))?;
                if self.shuffle {
                    self.queue.shuffle(true);
                }
                self.emit_queue_changed();
            }
            None => {
                if self.queue.select(&track.id).is_none() {
                    self.queue.load(vec![track.clone()], Some(&track.id))?;
                    if self.shuffle {
                        self.queue.shuffle(true);
                    }
                    self.emit_queue_changed();
                }
            }
        }

        let request = self.start(track)?;
        Ok(PlayOutcome::Started(request))
    }

    /// Settle a `play()` request that completed asynchronously.
    ///
    /// Returns `false` when the request was superseded by a newer one, in
    /// which case nothing changes.
    pub fn complete_play(
        &mut self,
        request: &PlayRequest,
        result: std::result::Result<(), String>,
    ) -> bool {
        if !self.is_live(request) {
            debug!(
                track_id = %request.track_id,
                attempt = request.attempt,
                "Discarding stale play completion"
            );
            return false;
        }

        if let Err(message) = result {
            self.fail_playback(&request.track_id, &message);
            self.publish();
        }
        true
    }

    /// Pause when playing, resume when paused, nothing when idle
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Idle => Ok(()),
            PlaybackState::Playing => {
                self.audio.pause();
                self.set_state(PlaybackState::Paused);
                self.publish();
                Ok(())
            }
            PlaybackState::Paused => {
                let Some(track_id) = self.current_track.as_ref().map(|t| t.id.clone()) else {
                    return Ok(());
                };

                if let Err(e) = self.audio.play() {
                    self.fail_playback(&track_id, &e.to_string());
                    self.publish();
                    return Err(e);
                }

                self.set_state(PlaybackState::Playing);
                self.publish();
                Ok(())
            }
        }
    }

    /// Stop playback and clear the current track (the queue is kept)
    pub fn stop(&mut self) {
        self.audio.stop();
        self.current_track = None;
        self.set_state(PlaybackState::Idle);
        self.publish();
    }

    /// End-of-track notification from the audio resource.
    ///
    /// `request` identifies the play that ended. Ignored unless it is still
    /// the live one, so a late notification after a user skip cannot skip
    /// twice, even when the queue has since wrapped back to the same track.
    pub fn on_track_end(&mut self, request: &PlayRequest) -> Result<()> {
        if !self.is_live(request) {
            debug!(
                track_id = %request.track_id,
                attempt = request.attempt,
                "Ignoring end of superseded play"
            );
            return Ok(());
        }

        let track_id = request.track_id.clone();
        self.pending_events.push(PlaybackEvent::TrackFinished {
            track_id: track_id.to_string(),
        });

        if self.loop_mode == LoopMode::One {
            // Restart in place; the queue position and the request stay
            let restart = self
                .audio
                .seek(Duration::ZERO)
                .and_then(|()| self.audio.play());

            if let Err(e) = restart {
                self.fail_playback(&track_id, &e.to_string());
                self.publish();
                return Err(e);
            }

            self.set_state(PlaybackState::Playing);
            self.publish();
            return Ok(());
        }

        self.next()
    }

    /// Error notification from the audio resource (decode, network).
    ///
    /// Returns `false` when `request` was superseded by a newer play.
    pub fn on_audio_error(&mut self, request: &PlayRequest, reason: &str) -> bool {
        if !self.is_live(request) {
            debug!(
                track_id = %request.track_id,
                attempt = request.attempt,
                "Ignoring audio error for superseded play"
            );
            return false;
        }

        self.fail_playback(&request.track_id, reason);
        self.publish();
        true
    }

    /// Skip to next track.
    ///
    /// Past the last track without loop-all, playback stops and the current
    /// track is cleared. Tracks without a source are skipped.
    pub fn next(&mut self) -> Result<()> {
        self.step(Step::Forward)
    }

    /// Go to previous track.
    ///
    /// At the first track playback stops; `previous` never wraps, whatever
    /// the loop mode.
    pub fn previous(&mut self) -> Result<()> {
        self.step(Step::Backward)
    }

    // ===== Seek =====

    /// Seek in the current track, clamped to its duration.
    ///
    /// Returns the position actually requested. No-op when idle.
    pub fn seek_to(&mut self, position: Duration) -> Result<Duration> {
        if !self.state.is_loaded() {
            return Ok(Duration::ZERO);
        }

        let duration = self
            .audio
            .duration()
            .or_else(|| self.current_track.as_ref().and_then(|t| t.duration_hint));
        let target = duration.map_or(position, |d| position.min(d));

        self.audio.seek(target)?;
        self.publish();
        Ok(target)
    }

    /// Seek by seconds as reported by UI sliders.
    ///
    /// Negative values and NaN clamp to 0; values past the end clamp to
    /// the duration.
    pub fn seek_to_secs(&mut self, seconds: f64) -> Result<Duration> {
        let position = if seconds.is_nan() || seconds <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        };
        self.seek_to(position)
    }

    // ===== Shuffle & Loop =====

    /// Turn shuffle on or off, keeping the current track selected
    pub fn set_shuffle(&mut self, on: bool) {
        if self.shuffle == on {
            return;
        }

        self.shuffle = on;
        self.queue.shuffle(on);
        self.emit_queue_changed();
        self.publish();
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
        self.publish();
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle
    }

    /// Position reported by the audio resource (zero when idle)
    pub fn position(&self) -> Duration {
        if self.state.is_loaded() {
            self.audio.position()
        } else {
            Duration::ZERO
        }
    }

    /// The most recent play request, if a track is loaded
    pub fn current_request(&self) -> Option<PlayRequest> {
        self.current_track.as_ref().map(|t| PlayRequest {
            track_id: t.id.clone(),
            attempt: self.attempt,
        })
    }

    /// Build a snapshot of the current state
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state,
            current_track: self.current_track.clone(),
            queue: self.queue.snapshot(),
            loop_mode: self.loop_mode,
            shuffle: self.shuffle,
            position: self.position(),
        }
    }

    /// Receive a new snapshot after every mutation
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    /// Load and play `track`, which must be playable
    fn start(&mut self, track: Track) -> Result<PlayRequest> {
        let url = track
            .playable_url()
            .ok_or_else(|| PlaybackError::InvalidOperation(format!("{} has no source", track.id)))?
            .to_string();

        self.attempt += 1;
        let request = PlayRequest {
            track_id: track.id.clone(),
            attempt: self.attempt,
        };

        let previous_track_id = self.current_track.replace(track.clone()).map(|t| t.id);
        if previous_track_id.as_ref() != Some(&track.id) {
            self.pending_events.push(PlaybackEvent::TrackChanged {
                track_id: track.id.to_string(),
                previous_track_id: previous_track_id.map(|id| id.to_string()),
            });
        }

        // Optimistic: playing until the resource says otherwise
        let before = self.state;
        self.state = PlaybackState::Playing;

        let started = self.audio.load(&url).and_then(|()| self.audio.play());
        if let Err(e) = started {
            self.state = before;
            self.fail_playback(&track.id, &e.to_string());
            self.publish();
            return Err(e);
        }

        if before != PlaybackState::Playing {
            self.emit_state_changed(PlaybackState::Playing);
        }

        info!(track_id = %track.id, title = %track.title, "Playing track");
        self.record_history(&track);
        self.publish();

        Ok(request)
    }

    fn step(&mut self, direction: Step) -> Result<()> {
        // One pass over the queue at most, skipping unplayable entries
        for _ in 0..self.queue.len() {
            let advance = match direction {
                Step::Forward => self.queue.advance(self.loop_mode)?,
                Step::Backward => self.queue.retreat()?,
            };

            match advance {
                Advance::Moved { track, index } => {
                    if track.is_playable() {
                        self.start(track)?;
                        return Ok(());
                    }
                    debug!(track_id = %track.id, index, "Skipping track without source");
                }
                Advance::EndOfQueue => {
                    self.finish(PlaybackEvent::EndOfQueue);
                    return Ok(());
                }
                Advance::StartOfQueue => {
                    self.finish(PlaybackEvent::StartOfQueue);
                    return Ok(());
                }
            }
        }

        if self.queue.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }

        // Looped all the way round without finding a playable track
        self.finish(PlaybackEvent::EndOfQueue);
        Ok(())
    }

    /// Stop at a queue boundary
    fn finish(&mut self, signal: PlaybackEvent) {
        debug!(signal = ?signal, "Reached queue boundary, stopping");
        self.pending_events.push(signal);
        self.queue.deselect();
        self.stop();
    }

    /// Recoverable audio failure: keep the track, drop to paused
    fn fail_playback(&mut self, track_id: &TrackId, message: &str) {
        warn!(track_id = %track_id, error = %message, "Playback failed");

        if self.state.is_loaded() || self.current_track.is_some() {
            self.set_state(PlaybackState::Paused);
        }
        self.pending_events.push(PlaybackEvent::Error {
            track_id: Some(track_id.to_string()),
            message: message.to_string(),
        });
    }

    fn record_history(&self, track: &Track) {
        if let (Some(recorder), Some(user_id)) = (&self.recorder, &self.user_id) {
            recorder.record(user_id, track);
        }
    }

    fn is_current(&self, track_id: &TrackId) -> bool {
        self.state.is_loaded() && self.current_track.as_ref().is_some_and(|t| &t.id == track_id)
    }

    fn is_live(&self, request: &PlayRequest) -> bool {
        request.attempt == self.attempt && self.is_current(&request.track_id)
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit_state_changed(state);
        }
    }

    fn emit_state_changed(&mut self, state: PlaybackState) {
        self.pending_events
            .push(PlaybackEvent::StateChanged { state });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            shuffled: self.queue.is_shuffled(),
        });
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("current_track", &self.current_track.as_ref().map(|t| &t.id))
            .field("queue_len", &self.queue.len())
            .field("loop_mode", &self.loop_mode)
            .field("shuffle", &self.shuffle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NullAudio;

    fn create_test_track(id: &str) -> Track {
        Track::new(id, format!("Track {}", id)).with_source(format!("https://cdn.example/{}.mp3", id))
    }

    fn controller() -> PlaybackController {
        PlaybackController::new(Box::new(NullAudio::new()), PlaybackConfig::default())
    }

    #[test]
    fn new_controller_is_idle() {
        let controller = controller();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(controller.current_track().is_none());
        assert!(controller.queue().is_empty());
        assert_eq!(controller.current_request(), None);
    }

    #[test]
    fn play_track_without_queue_builds_single_track_queue() {
        let mut controller = controller();
        let outcome = controller.play_track(create_test_track("A"), None).unwrap();

        assert!(matches!(outcome, PlayOutcome::Started(_)));
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.queue().len(), 1);
    }

    #[test]
    fn play_track_in_loaded_queue_selects_it() {
        let mut controller = controller();
        let tracks = vec![create_test_track("A"), create_test_track("B")];
        controller
            .play_track(tracks[0].clone(), Some(tracks.clone()))
            .unwrap();

        controller.play_track(tracks[1].clone(), None).unwrap();
        assert_eq!(controller.queue().current_index(), Some(1));
        assert_eq!(controller.queue().len(), 2);
    }

    #[test]
    fn play_track_with_empty_queue_fails_without_state_change() {
        let mut controller = controller();
        let result = controller.play_track(create_test_track("A"), Some(Vec::new()));

        assert!(matches!(result, Err(PlaybackError::QueueEmpty)));
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(controller.current_track().is_none());
    }

    #[test]
    fn toggle_is_noop_when_idle() {
        let mut controller = controller();
        controller.toggle_play_pause().unwrap();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert!(!controller.has_pending_events());
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let mut controller = controller();
        controller.play_track(create_test_track("A"), None).unwrap();

        controller.toggle_play_pause().unwrap();
        assert_eq!(controller.state(), PlaybackState::Paused);

        controller.toggle_play_pause().unwrap();
        assert_eq!(controller.state(), PlaybackState::Playing);
    }

    #[test]
    fn events_describe_transitions() {
        let mut controller = controller();
        controller.play_track(create_test_track("A"), None).unwrap();

        let events = controller.drain_events();
        assert!(events.contains(&PlaybackEvent::TrackChanged {
            track_id: "A".to_string(),
            previous_track_id: None,
        }));
        assert!(events.contains(&PlaybackEvent::StateChanged {
            state: PlaybackState::Playing
        }));
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn snapshot_reflects_current_track() {
        let mut controller = controller();
        let rx = controller.subscribe();
        controller.play_track(create_test_track("A"), None).unwrap();

        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.state, PlaybackState::Playing);
        assert_eq!(snapshot.current_track.unwrap().id.as_str(), "A");
        assert_eq!(snapshot.queue.current_index, Some(0));
    }

    #[test]
    fn seek_is_noop_when_idle() {
        let mut controller = controller();
        assert_eq!(controller.seek_to(Duration::from_secs(10)).unwrap(), Duration::ZERO);
    }

    #[test]
    fn seek_clamps_to_duration_hint() {
        let mut controller = controller();
        let track = create_test_track("A").with_duration(Duration::from_secs(30));
        controller.play_track(track, None).unwrap();

        assert_eq!(
            controller.seek_to(Duration::from_secs(90)).unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(controller.seek_to_secs(-4.0).unwrap(), Duration::ZERO);
        assert_eq!(controller.position(), Duration::ZERO);
    }
}
