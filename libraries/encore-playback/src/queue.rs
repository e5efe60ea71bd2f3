//! Queue store
//!
//! Owns the active ordering, the original-order snapshot and the current
//! position. Pure index arithmetic: no I/O, no transport state.
//!
//! ```text
//! original:  [A, B, C, D]        set once per load, restore point
//! active:    [C, A, D, B]        shuffled or original
//!                  ^
//!            current_index = 1   always valid for `active`, or None
//! ```

use crate::error::{PlaybackError, Result};
use crate::shuffle::shuffled;
use crate::types::{Advance, LoopMode};
use encore_core::types::{Track, TrackId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Point-in-time copy of the queue for observers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Active order
    pub tracks: Vec<Track>,

    /// Position in `tracks`, `None` when nothing is selected
    pub current_index: Option<usize>,

    /// Whether `tracks` is a shuffled permutation of the original order
    pub shuffled: bool,
}

impl QueueSnapshot {
    /// The selected track, if any
    pub fn current(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }
}

/// Ordered playback queue with shuffle/restore
#[derive(Debug, Clone, Default)]
pub struct Queue {
    /// Order governing next/previous
    active: Vec<Track>,

    /// Order as loaded; never mutated between loads
    original: Vec<Track>,

    /// Index into `active`
    current_index: Option<usize>,

    is_shuffled: bool,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with `tracks` and select `start`.
    ///
    /// Falls back to the first track when `start` is absent or not in the
    /// list. The shuffle flag is cleared; callers re-apply shuffle if needed.
    pub fn load(&mut self, tracks: Vec<Track>, start: Option<&TrackId>) -> Result<QueueSnapshot> {
        if tracks.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }

        let start_index = start
            .and_then(|id| tracks.iter().position(|t| &t.id == id))
            .unwrap_or(0);

        self.original.clone_from(&tracks);
        self.active = tracks;
        self.current_index = Some(start_index);
        self.is_shuffled = false;

        Ok(self.snapshot())
    }

    /// Turn shuffle on or off using the thread-local RNG
    pub fn shuffle(&mut self, on: bool) -> QueueSnapshot {
        self.shuffle_with(on, &mut rand::thread_rng())
    }

    /// Turn shuffle on or off with an explicit RNG.
    ///
    /// On: the active order becomes a fresh permutation of the original order.
    /// Off: the active order reverts to the original order.
    /// Either way the selected track stays selected.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, on: bool, rng: &mut R) -> QueueSnapshot {
        let selected = self.current().map(|t| t.id.clone());

        self.active = if on {
            shuffled(&self.original, rng)
        } else {
            self.original.clone()
        };
        self.is_shuffled = on;

        // Fails closed to None; cannot happen while `original` is intact
        self.current_index = selected.and_then(|id| self.position_of(&id));

        self.snapshot()
    }

    /// Step forward.
    ///
    /// Wrapping past the last track is only allowed under `LoopMode::All`;
    /// otherwise the result is `EndOfQueue` and the position is unchanged.
    /// With nothing selected the first track is selected.
    pub fn advance(&mut self, loop_mode: LoopMode) -> Result<Advance> {
        if self.active.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }

        let next_index = match self.current_index {
            None => 0,
            Some(current) => {
                let next = (current + 1) % self.active.len();
                if next == 0 && loop_mode != LoopMode::All {
                    return Ok(Advance::EndOfQueue);
                }
                next
            }
        };

        Ok(self.move_to(next_index))
    }

    /// Step back. Never wraps: at the first track the result is `StartOfQueue`.
    pub fn retreat(&mut self) -> Result<Advance> {
        if self.active.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }

        match self.current_index {
            Some(current) if current > 0 => Ok(self.move_to(current - 1)),
            _ => Ok(Advance::StartOfQueue),
        }
    }

    /// Select the track with `id` in the active order
    pub fn select(&mut self, id: &TrackId) -> Option<usize> {
        let index = self.position_of(id)?;
        self.current_index = Some(index);
        Some(index)
    }

    /// Clear the selection, keeping the tracks
    pub fn deselect(&mut self) {
        self.current_index = None;
    }

    /// Drop all tracks
    pub fn clear(&mut self) {
        self.active.clear();
        self.original.clear();
        self.current_index = None;
        self.is_shuffled = false;
    }

    /// Position of `id` in the active order
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.active.iter().position(|t| &t.id == id)
    }

    /// The selected track
    pub fn current(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.active.get(i))
    }

    /// Index of the selected track in the active order
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Active order
    pub fn tracks(&self) -> &[Track] {
        &self.active
    }

    /// Order as loaded
    pub fn original_order(&self) -> &[Track] {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_shuffled(&self) -> bool {
        self.is_shuffled
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            tracks: self.active.clone(),
            current_index: self.current_index,
            shuffled: self.is_shuffled,
        }
    }

    fn move_to(&mut self, index: usize) -> Advance {
        self.current_index = Some(index);
        Advance::Moved {
            index,
            track: self.active[index].clone(),
        }
    }
}
