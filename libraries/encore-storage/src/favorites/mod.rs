use crate::document::{decode_track, encode_track, from_millis, to_millis};
use chrono::Utc;
use encore_core::{
    error::Result,
    types::{FavoriteEntry, Track, TrackId, UserId},
};
use sqlx::{Row, SqlitePool};

/// Mark `track` as favorite; `false` if it already was
pub async fn add(pool: &SqlitePool, user_id: &UserId, track: &Track) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO favorites (user_id, song_id, song_data, added_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (user_id, song_id) DO NOTHING
        "#,
    )
    .bind(user_id.clone())
    .bind(track.id.clone())
    .bind(encode_track(track)?)
    .bind(to_millis(Utc::now()))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn remove(pool: &SqlitePool, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND song_id = ?")
        .bind(user_id.clone())
        .bind(song_id.clone())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn contains(pool: &SqlitePool, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM favorites WHERE user_id = ? AND song_id = ? LIMIT 1")
        .bind(user_id.clone())
        .bind(song_id.clone())
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// All favorites of `user_id`, most recently added first
pub async fn get_all(pool: &SqlitePool, user_id: &UserId) -> Result<Vec<FavoriteEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, song_id, song_data, added_at
        FROM favorites
        WHERE user_id = ?
        ORDER BY added_at DESC, id DESC
        "#,
    )
    .bind(user_id.clone())
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<FavoriteEntry> {
            Ok(FavoriteEntry {
                user_id: row.try_get("user_id")?,
                song_id: row.try_get("song_id")?,
                song_data: decode_track(row.try_get("song_data")?)?,
                added_at: from_millis("added_at", row.try_get("added_at")?)?,
            })
        })
        .collect()
}
