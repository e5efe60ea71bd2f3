use crate::document::{decode_track, encode_track, from_millis, to_millis};
use encore_core::{
    error::Result,
    types::{HistoryEntry, RecordOutcome, TrackId, UserId},
};
use sqlx::{Row, SqlitePool};

/// Upsert a play: insert on first play, otherwise move the timestamp only.
///
/// The insert is a single `ON CONFLICT DO NOTHING` statement on the
/// `(user_id, song_id)` key, so two racing calls produce one row. The
/// timestamp only ever moves forward, whatever order the writes land in.
pub async fn record(pool: &SqlitePool, entry: &HistoryEntry) -> Result<RecordOutcome> {
    let song_data = encode_track(&entry.song_data)?;
    let played_at = to_millis(entry.played_at);

    let inserted = sqlx::query(
        r#"
        INSERT INTO recently_played (user_id, song_id, song_data, played_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (user_id, song_id) DO NOTHING
        "#,
    )
    .bind(entry.user_id.clone())
    .bind(entry.song_id.clone())
    .bind(song_data)
    .bind(played_at)
    .execute(pool)
    .await?;

    if inserted.rows_affected() > 0 {
        return Ok(RecordOutcome::Inserted);
    }

    sqlx::query(
        r#"
        UPDATE recently_played
        SET played_at = MAX(played_at, ?)
        WHERE user_id = ? AND song_id = ?
        "#,
    )
    .bind(played_at)
    .bind(entry.user_id.clone())
    .bind(entry.song_id.clone())
    .execute(pool)
    .await?;

    Ok(RecordOutcome::Refreshed)
}

/// Most recent plays of `user_id`, newest first
pub async fn get_recent(pool: &SqlitePool, user_id: &UserId, limit: usize) -> Result<Vec<HistoryEntry>> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, song_id, song_data, played_at
        FROM recently_played
        WHERE user_id = ?
        ORDER BY played_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id.clone())
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| -> Result<HistoryEntry> {
            Ok(HistoryEntry {
                user_id: row.try_get("user_id")?,
                song_id: row.try_get("song_id")?,
                song_data: decode_track(row.try_get("song_data")?)?,
                played_at: from_millis("played_at", row.try_get("played_at")?)?,
            })
        })
        .collect()
}

/// Remove one entry; `false` when there was none
pub async fn remove(pool: &SqlitePool, user_id: &UserId, song_id: &TrackId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM recently_played WHERE user_id = ? AND song_id = ?")
        .bind(user_id.clone())
        .bind(song_id.clone())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
