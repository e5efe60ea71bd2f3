//! Subcommand implementations
//!
//! Each command writes human-readable output to the given writer so it can
//! be exercised without a terminal.

use crate::config::EncoreConfig;
use crate::error::{CliError, Result};
use crate::session::{HeadlessSession, SessionReport};
use encore_catalog::CatalogClient;
use encore_core::{LibraryStore, Track, UserId};
use encore_playback::{LoopMode, PlaybackEvent};
use encore_storage::{MemoryLibraryStore, SqliteLibraryStore};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// Everything a command needs
pub struct App {
    pub config: EncoreConfig,
    pub store: Arc<dyn LibraryStore>,
    pub catalog: CatalogClient,
    pub user_id: UserId,
}

impl App {
    /// Build from configuration; `ephemeral` keeps the library in memory
    pub async fn connect(config: EncoreConfig, ephemeral: bool) -> Result<Self> {
        let store: Arc<dyn LibraryStore> = if ephemeral {
            info!("Using in-memory library");
            Arc::new(MemoryLibraryStore::new())
        } else {
            ensure_parent_dir(&config.storage.database_url)?;
            Arc::new(SqliteLibraryStore::open(&config.storage.database_url).await?)
        };

        Self::with_store(config, store)
    }

    pub fn with_store(config: EncoreConfig, store: Arc<dyn LibraryStore>) -> Result<Self> {
        let catalog = CatalogClient::new(config.catalog_config())?;
        let user_id = UserId::new(config.player.user_id.clone());

        Ok(Self {
            config,
            store,
            catalog,
            user_id,
        })
    }
}

/// `sqlite://./data/encore.db` needs `./data` to exist
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// One line per track: `artist - title (m:ss) [id]`
pub fn format_track(track: &Track) -> String {
    let mut line = if track.artist.is_empty() {
        track.title.clone()
    } else {
        format!("{} - {}", track.artist, track.title)
    };

    if let Some(duration) = track.duration_hint {
        let secs = duration.as_secs();
        line.push_str(&format!(" ({}:{:02})", secs / 60, secs % 60));
    }
    line.push_str(&format!(" [{}]", track.id));
    if !track.is_playable() {
        line.push_str(" (no preview)");
    }
    line
}

fn describe_event(event: &PlaybackEvent, tracks: &[Track]) -> Option<String> {
    let title = |id: &str| {
        tracks
            .iter()
            .find(|t| t.id.as_str() == id)
            .map_or_else(|| id.to_string(), format_track)
    };

    match event {
        PlaybackEvent::TrackChanged { track_id, .. } => Some(format!("> {}", title(track_id))),
        PlaybackEvent::EndOfQueue => Some("End of queue".to_string()),
        PlaybackEvent::StartOfQueue => Some("Start of queue".to_string()),
        PlaybackEvent::Error { track_id, message } => Some(format!(
            "! {}: {}",
            track_id.as_deref().unwrap_or("playback"),
            message
        )),
        PlaybackEvent::StateChanged { .. }
        | PlaybackEvent::TrackFinished { .. }
        | PlaybackEvent::QueueChanged { .. } => None,
    }
}

pub async fn search(app: &App, query: &str, limit: usize, out: &mut impl Write) -> Result<()> {
    let tracks = app.catalog.search(query, limit).await?;

    if tracks.is_empty() {
        writeln!(out, "No results for {query:?}")?;
        return Ok(());
    }

    for (i, track) in tracks.iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, format_track(track))?;
    }
    Ok(())
}

/// Options for `play`; `None` falls back to configuration
#[derive(Debug, Default, Clone)]
pub struct PlayOptions {
    pub shuffle: Option<bool>,
    pub loop_mode: Option<LoopMode>,
    pub limit: usize,
    pub max_plays: Option<usize>,
}

pub async fn play(
    app: &App,
    query: &str,
    options: &PlayOptions,
    out: &mut impl Write,
) -> Result<SessionReport> {
    let tracks = app.catalog.search(query, options.limit).await?;
    if tracks.is_empty() {
        return Err(CliError::NoResults(query.to_string()));
    }
    if !tracks.iter().any(Track::is_playable) {
        return Err(CliError::NothingPlayable(query.to_string()));
    }

    let mut config = app.config.playback_config();
    if let Some(shuffle) = options.shuffle {
        config.shuffle = shuffle;
    }
    if let Some(loop_mode) = options.loop_mode {
        config.loop_mode = loop_mode;
    }

    let max_plays = options.max_plays.unwrap_or(tracks.len());
    let mut session =
        HeadlessSession::new(config).with_history(app.store.clone(), app.user_id.clone());
    let report = session.run(tracks.clone(), max_plays)?;
    session.flush().await;

    for line in report.events.iter().filter_map(|e| describe_event(e, &tracks)) {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "Played {} track(s)", report.played.len())?;

    Ok(report)
}

pub async fn history(app: &App, limit: Option<usize>, out: &mut impl Write) -> Result<()> {
    let limit = limit.unwrap_or(app.config.player.history_limit);
    let entries = app.store.recently_played(&app.user_id, limit).await?;

    if entries.is_empty() {
        writeln!(out, "Nothing played yet")?;
        return Ok(());
    }

    for entry in entries {
        writeln!(
            out,
            "{}  {}",
            entry.played_at.format("%Y-%m-%d %H:%M"),
            format_track(&entry.song_data)
        )?;
    }
    Ok(())
}

/// Favorite the first search result
pub async fn favorite_add(app: &App, query: &str, out: &mut impl Write) -> Result<()> {
    let tracks = app.catalog.search(query, 1).await?;
    let Some(track) = tracks.into_iter().next() else {
        return Err(CliError::NoResults(query.to_string()));
    };

    if app.store.add_favorite(&app.user_id, &track).await? {
        writeln!(out, "Added {}", format_track(&track))?;
    } else {
        writeln!(out, "Already a favorite: {}", format_track(&track))?;
    }
    Ok(())
}

pub async fn favorite_list(app: &App, out: &mut impl Write) -> Result<()> {
    let favorites = app.store.favorites(&app.user_id).await?;

    if favorites.is_empty() {
        writeln!(out, "No favorites yet")?;
        return Ok(());
    }

    for entry in favorites {
        writeln!(out, "{}", format_track(&entry.song_data))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn format_marks_unplayable_tracks() {
        let track = Track::new("deezer:1", "Demo")
            .with_artist("Artist")
            .with_duration(Duration::from_secs(95));
        assert_eq!(format_track(&track), "Artist - Demo (1:35) [deezer:1] (no preview)");
    }

    #[test]
    fn parent_dir_is_skipped_for_memory_urls() {
        assert!(ensure_parent_dir("sqlite::memory:").is_ok());
    }

    #[test]
    fn parent_dir_is_created_for_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}/nested/encore.db?mode=rwc", dir.path().display());

        ensure_parent_dir(&url).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
