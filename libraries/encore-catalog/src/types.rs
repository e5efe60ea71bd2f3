//! Catalog configuration and wire types.

use encore_core::Track;
use serde::Deserialize;
use std::time::Duration;

/// Prefix namespacing catalog ids inside Encore
pub const ID_PREFIX: &str = "deezer:";

/// Configuration for connecting to the catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL (e.g., `https://api.deezer.com`)
    pub base_url: String,
    /// Key for keyed gateways, sent as `X-RapidAPI-Key`
    pub api_key: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(15),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `GET /search` response
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub data: Vec<CatalogTrack>,
}

/// `GET /track/{id}` response. Errors arrive with status 200.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TrackResponse {
    Error { error: ApiError },
    Track(CatalogTrack),
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<u32>,
}

/// Track record as the catalog sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    pub id: u64,
    pub title: String,
    /// Seconds
    #[serde(default)]
    pub duration: Option<u64>,
    /// 30-second preview; empty string when unavailable
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub artist: Option<CatalogArtist>,
    #[serde(default)]
    pub album: Option<CatalogAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAlbum {
    pub title: String,
    #[serde(default)]
    pub cover_medium: Option<String>,
}

impl From<CatalogTrack> for Track {
    fn from(record: CatalogTrack) -> Self {
        let mut track = Track::new(format!("{ID_PREFIX}{}", record.id), record.title);

        track.source_url = record.preview.filter(|url| !url.trim().is_empty());
        track.duration_hint = record
            .duration
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        if let Some(artist) = record.artist {
            track.artist = artist.name;
        }
        if let Some(album) = record.album {
            track.cover_url = album.cover_medium.filter(|url| !url.is_empty());
            track.album = Some(album.title);
        }

        track
    }
}
