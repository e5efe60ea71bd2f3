//! Encore Catalog Client
//!
//! HTTP client for the third-party preview-track catalog.
//!
//! Search results are mapped to [`encore_core::Track`]. Records without a
//! preview become metadata-only tracks (`source_url: None`), which the
//! playback controller refuses to play.
//!
//! # Example
//!
//! ```ignore
//! use encore_catalog::{CatalogClient, CatalogConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::new("https://api.deezer.com"))?;
//!
//!     for track in client.search("daft punk", 10).await? {
//!         println!("{} - {}", track.artist, track.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use types::{CatalogAlbum, CatalogArtist, CatalogConfig, CatalogTrack, ID_PREFIX};
