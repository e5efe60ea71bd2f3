mod ids;
mod library;
mod track;

pub use ids::{PlaylistId, TrackId, UserId};
pub use library::{FavoriteEntry, HistoryEntry, Playlist, RecordOutcome};
pub use track::Track;
