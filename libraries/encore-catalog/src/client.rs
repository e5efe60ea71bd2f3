//! Catalog search client.

use crate::error::{CatalogError, Result};
use crate::types::{CatalogConfig, SearchResponse, TrackResponse, ID_PREFIX};
use encore_core::Track;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Catalog error code for "no data"
const NO_DATA: u32 = 800;

/// Client for the preview-track catalog.
///
/// Resolves free-text queries into [`Track`] lists; the playback core only
/// ever sees the resolved tracks.
///
/// # Example
///
/// ```ignore
/// use encore_catalog::{CatalogClient, CatalogConfig};
///
/// let client = CatalogClient::new(CatalogConfig::new("https://api.deezer.com"))?;
/// let tracks = client.search("daft punk", 25).await?;
/// println!("Found {} tracks", tracks.len());
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| CatalogError::InvalidApiKey(e.to_string()))?;
            headers.insert("X-RapidAPI-Key", value);

            if let Some(host) = parsed.host_str() {
                let value = HeaderValue::from_str(host)
                    .map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
                headers.insert("X-RapidAPI-Host", value);
            }
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .user_agent(format!("Encore/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Get the catalog base URL.
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Search tracks by free text.
    ///
    /// A blank query returns an empty list without contacting the catalog.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Track>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.base_url);
        debug!(url = %url, query = %query, limit, "Searching catalog");

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", limit.to_string().as_str())])
            .send()
            .await
            .map_err(map_send_error)?;

        let body: SearchResponse = read_json(response).await?;
        let tracks: Vec<Track> = body.data.into_iter().map(Track::from).collect();

        let playable = tracks.iter().filter(|t| t.is_playable()).count();
        info!(query = %query, results = tracks.len(), playable, "Catalog search complete");

        Ok(tracks)
    }

    /// Fetch one track by catalog id (with or without the `deezer:` prefix).
    pub async fn track(&self, id: &str) -> Result<Track> {
        let raw_id = id.strip_prefix(ID_PREFIX).unwrap_or(id);
        if raw_id.is_empty() || !raw_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        let url = format!("{}/track/{}", self.base_url, raw_id);
        debug!(url = %url, "Fetching catalog track");

        let response = self.http.get(&url).send().await.map_err(map_send_error)?;

        match read_json(response).await? {
            TrackResponse::Track(record) => Ok(record.into()),
            TrackResponse::Error { error } if error.code == Some(NO_DATA) => {
                Err(CatalogError::NotFound(id.to_string()))
            }
            TrackResponse::Error { error } => Err(CatalogError::ServerError {
                status: StatusCode::OK.as_u16(),
                message: error.message,
            }),
        }
    }
}

fn map_send_error(e: reqwest::Error) -> CatalogError {
    if e.is_connect() || e.is_timeout() {
        CatalogError::Unreachable(e.to_string())
    } else {
        CatalogError::Request(e)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);
        warn!(retry_after_secs, "Catalog rate limit hit");
        return Err(CatalogError::RateLimited { retry_after_secs });
    }

    if status == StatusCode::NOT_FOUND {
        let path = response.url().path().to_string();
        return Err(CatalogError::NotFound(path));
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(CatalogError::ServerError {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| CatalogError::ParseError(e.to_string()))
}
