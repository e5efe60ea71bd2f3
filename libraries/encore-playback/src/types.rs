//! Core types for playback management

use crate::queue::QueueSnapshot;
use encore_core::types::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    #[default]
    Idle,

    /// Track loaded, not playing
    Paused,

    /// Track loaded and playing
    Playing,
}

impl PlaybackState {
    /// Whether a track is loaded
    pub fn is_loaded(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Policy at end-of-track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Wrap to the start of the queue
    All,

    /// Restart the current track
    One,
}

impl LoopMode {
    /// Cycle Off -> All -> One -> Off, the order of a repeat button
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

impl std::str::FromStr for LoopMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "all" => Ok(Self::All),
            "one" => Ok(Self::One),
            other => Err(format!("unknown loop mode: {other}")),
        }
    }
}

/// Result of a queue navigation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The queue moved to `index`
    Moved { index: usize, track: Track },

    /// `next` ran past the last track without loop-all
    EndOfQueue,

    /// `previous` at the first track (never wraps)
    StartOfQueue,
}

/// Handle for a `play()` request still in flight on the audio resource.
///
/// The platform layer passes it back to
/// [`PlaybackController::complete_play`](crate::PlaybackController::complete_play)
/// once the resource settles. A newer request supersedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub track_id: TrackId,
    pub attempt: u64,
}

/// Result of `play_track`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback was requested
    Started(PlayRequest),

    /// The track has no source; nothing happened
    Unplayable,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial loop mode (default: Off)
    pub loop_mode: LoopMode,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,
}

/// Read-only view of the controller handed to observers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub current_track: Option<Track>,
    pub queue: QueueSnapshot,
    pub loop_mode: LoopMode,
    pub shuffle: bool,
    pub position: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.loop_mode, LoopMode::Off);
        assert!(!config.shuffle);
    }

    #[test]
    fn loop_mode_cycles_through_all_modes() {
        assert_eq!(LoopMode::Off.cycle(), LoopMode::All);
        assert_eq!(LoopMode::All.cycle(), LoopMode::One);
        assert_eq!(LoopMode::One.cycle(), LoopMode::Off);
    }

    #[test]
    fn loop_mode_parses_case_insensitively() {
        assert_eq!("ALL".parse::<LoopMode>(), Ok(LoopMode::All));
        assert_eq!("one".parse::<LoopMode>(), Ok(LoopMode::One));
        assert!("sometimes".parse::<LoopMode>().is_err());
    }

    #[test]
    fn only_idle_is_unloaded() {
        assert!(!PlaybackState::Idle.is_loaded());
        assert!(PlaybackState::Paused.is_loaded());
        assert!(PlaybackState::Playing.is_loaded());
    }
}
