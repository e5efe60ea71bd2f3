//! Column codecs shared by the slices
//!
//! Timestamps are stored as Unix milliseconds, track snapshots as JSON text.

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use encore_core::{error::Result, Track};

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(column: &'static str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::corrupt(column, format!("{millis} out of range")).into())
}

/// Drop sub-millisecond precision so values compare equal after a round trip
pub(crate) fn truncate_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or(at)
}

pub(crate) fn encode_track(track: &Track) -> Result<String> {
    Ok(serde_json::to_string(track)?)
}

pub(crate) fn decode_track(json: &str) -> Result<Track> {
    serde_json::from_str(json).map_err(|e| StorageError::corrupt("song_data", e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn millis_round_trip() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(from_millis("played_at", to_millis(at)).unwrap(), at);
    }

    #[test]
    fn out_of_range_millis_is_corrupt() {
        assert!(from_millis("played_at", i64::MAX).is_err());
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let err = decode_track("{not json").unwrap_err();
        assert!(err.to_string().contains("song_data"));
    }
}
