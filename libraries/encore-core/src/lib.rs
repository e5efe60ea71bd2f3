//! Encore Core
//!
//! Platform-agnostic domain types, store traits, and error handling shared by
//! the Encore crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `HistoryEntry`, `FavoriteEntry`, `Playlist`
//! - **Identifiers**: `TrackId`, `UserId`, `PlaylistId`
//! - **Store Trait**: `LibraryStore`, the per-user document collections
//! - **Error Handling**: Unified `EncoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use encore_core::types::{HistoryEntry, Track, UserId};
//!
//! let track = Track::new("deezer:3135556", "Harder, Better, Faster, Stronger")
//!     .with_artist("Daft Punk")
//!     .with_source("https://cdn.example.com/preview.mp3");
//! assert!(track.is_playable());
//!
//! let entry = HistoryEntry::new(UserId::new("alice"), &track, chrono::Utc::now());
//! assert_eq!(entry.song_id, track.id);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{EncoreError, Result};
pub use storage::LibraryStore;
pub use types::{
    FavoriteEntry, HistoryEntry, Playlist, PlaylistId, RecordOutcome, Track, TrackId, UserId,
};
