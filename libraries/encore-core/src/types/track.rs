//! Canonical song record consumed by the queue and the controller

use super::ids::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One playable (or metadata-only) audio item.
///
/// Only `id` and `source_url` drive playback decisions. The display fields
/// are carried through untouched and snapshotted into history documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,

    /// Stream locator. `None` for metadata-only results.
    #[serde(default)]
    pub source_url: Option<String>,

    /// Expected length; the loaded resource's duration is authoritative
    #[serde(default, with = "duration_secs")]
    pub duration_hint: Option<Duration>,

    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl Track {
    /// Create a track with the given id and title and no source
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_url: None,
            duration_hint: None,
            title: title.into(),
            artist: String::new(),
            album: None,
            cover_url: None,
        }
    }

    /// Set the stream locator
    #[must_use]
    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Set the artist name
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the advisory duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_hint = Some(duration);
        self
    }

    /// The stream locator, if the track can be played
    pub fn playable_url(&self) -> Option<&str> {
        self.source_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Whether this track has a usable stream locator
    pub fn is_playable(&self) -> bool {
        self.playable_url().is_some()
    }
}

/// Stored documents keep durations as fractional seconds so sub-second
/// lengths survive a round trip.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(d)?;
        Ok(secs
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(Duration::from_secs_f64))
    }
}
