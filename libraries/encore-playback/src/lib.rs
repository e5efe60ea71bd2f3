//! Encore - Playback
//!
//! Platform-agnostic playback state for Encore.
//!
//! This crate provides:
//! - Queue store (active order, original order, current position)
//! - Shuffle with exact restore of the original order
//! - Loop modes (Off, All, One)
//! - Transport state machine driving an [`AudioResource`]
//! - Per-user "recently played" history, one entry per track
//!
//! # Architecture
//!
//! `encore-playback` knows nothing about how audio is produced or where
//! history is stored:
//! - Audio output is a black box behind [`AudioResource`]
//! - History goes through [`encore_core::LibraryStore`]
//!
//! The controller is a single writer. Asynchronous outcomes from the audio
//! resource (play completion, end of track, errors) are fed back through
//! dedicated methods that ignore anything concerning a superseded track.
//!
//! # Example
//!
//! ```rust
//! use encore_playback::{NullAudio, PlaybackConfig, PlaybackController, PlaybackState};
//! use encore_core::Track;
//!
//! let mut controller =
//!     PlaybackController::new(Box::new(NullAudio::new()), PlaybackConfig::default());
//!
//! let tracks = vec![
//!     Track::new("a", "Intro").with_source("https://cdn.example/a.mp3"),
//!     Track::new("b", "Outro").with_source("https://cdn.example/b.mp3"),
//! ];
//!
//! controller.play_track(tracks[0].clone(), Some(tracks.clone())).unwrap();
//! assert_eq!(controller.state(), PlaybackState::Playing);
//!
//! controller.next().unwrap();
//! assert_eq!(controller.current_track().unwrap().title, "Outro");
//!
//! // Past the end without loop-all: playback stops
//! controller.next().unwrap();
//! assert_eq!(controller.state(), PlaybackState::Idle);
//! ```

pub mod controller;
pub mod error;
pub mod events;
pub mod history;
pub mod queue;
pub mod shuffle;
pub mod source;
pub mod types;

// Re-exports
pub use controller::PlaybackController;
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::{HistoryRecorder, PlayRecorder};
pub use queue::{Queue, QueueSnapshot};
pub use source::{AudioResource, NullAudio};
pub use types::{
    Advance, LoopMode, PlayOutcome, PlayRequest, PlaybackConfig, PlaybackState, PlayerSnapshot,
};
