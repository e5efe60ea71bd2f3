use crate::document::{decode_track, encode_track, from_millis, to_millis, truncate_millis};
use chrono::Utc;
use encore_core::{
    error::{EncoreError, Result},
    types::{Playlist, PlaylistId, Track, TrackId, UserId},
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        created_at: from_millis("created_at", row.try_get("created_at")?)?,
    })
}

/// Create an empty playlist
pub async fn create(pool: &SqlitePool, owner_id: &UserId, name: &str) -> Result<Playlist> {
    let mut playlist = Playlist::new(owner_id.clone(), name);
    playlist.created_at = truncate_millis(playlist.created_at);

    sqlx::query("INSERT INTO playlists (id, owner_id, name, created_at) VALUES (?, ?, ?, ?)")
        .bind(playlist.id.clone())
        .bind(playlist.owner_id.clone())
        .bind(playlist.name.as_str())
        .bind(to_millis(playlist.created_at))
        .execute(pool)
        .await?;

    Ok(playlist)
}

/// Playlists owned by `owner_id`, oldest first
pub async fn get_user_playlists(pool: &SqlitePool, owner_id: &UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(
        r#"
        SELECT id, owner_id, name, created_at
        FROM playlists
        WHERE owner_id = ?
        ORDER BY created_at ASC, name ASC
        "#,
    )
    .bind(owner_id.clone())
    .fetch_all(pool)
    .await?;

    rows.iter().map(playlist_from_row).collect()
}

pub async fn get_by_id(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, owner_id, name, created_at FROM playlists WHERE id = ?")
        .bind(id.clone())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(playlist_from_row).transpose()
}

/// Append `track`; `false` when it is already a member.
///
/// Membership is the `(playlist_id, song_id)` primary key, so the check and
/// the append are one statement.
pub async fn add_track(pool: &SqlitePool, playlist_id: &PlaylistId, track: &Track) -> Result<bool> {
    if get_by_id(pool, playlist_id).await?.is_none() {
        return Err(EncoreError::PlaylistNotFound(playlist_id.clone()));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO playlist_tracks (playlist_id, song_id, song_data, position, added_at)
        SELECT ?, ?, ?, COALESCE(MAX(position), -1) + 1, ?
        FROM playlist_tracks
        WHERE playlist_id = ?
        ON CONFLICT (playlist_id, song_id) DO NOTHING
        "#,
    )
    .bind(playlist_id.clone())
    .bind(track.id.clone())
    .bind(encode_track(track)?)
    .bind(to_millis(Utc::now()))
    .bind(playlist_id.clone())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn remove_track(pool: &SqlitePool, playlist_id: &PlaylistId, song_id: &TrackId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND song_id = ?")
        .bind(playlist_id.clone())
        .bind(song_id.clone())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Tracks of a playlist in the order they were added
pub async fn get_tracks(pool: &SqlitePool, playlist_id: &PlaylistId) -> Result<Vec<Track>> {
    if get_by_id(pool, playlist_id).await?.is_none() {
        return Err(EncoreError::PlaylistNotFound(playlist_id.clone()));
    }

    let rows = sqlx::query(
        r#"
        SELECT song_data
        FROM playlist_tracks
        WHERE playlist_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(playlist_id.clone())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<Track> { decode_track(row.try_get("song_data")?) })
        .collect()
}
