//! Playback Events
//!
//! Discrete notifications for UI synchronization. The controller queues them
//! as transitions happen; the UI drains them with
//! [`PlaybackController::drain_events`](crate::PlaybackController::drain_events).
//! Continuous state (position, queue contents) is published as snapshots
//! instead.

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track became current
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Track finished playing naturally (reached end)
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Queue contents or order changed
    QueueChanged {
        /// New queue length
        length: usize,
        /// Whether the active order is shuffled
        shuffled: bool,
    },

    /// `next` ran off the end of the queue; playback stopped
    EndOfQueue,

    /// `previous` at the first track; playback stopped
    StartOfQueue,

    /// Recoverable playback error, shown to the user
    Error {
        /// ID of the track that failed
        track_id: Option<String>,
        /// Error message
        message: String,
    },
}
