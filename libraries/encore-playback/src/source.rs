//! Platform-agnostic audio resource trait
//!
//! Abstracts the element that actually streams audio (an HTML audio element
//! on the web, a native player elsewhere).

use crate::error::Result;
use std::time::Duration;

/// Black-box audio player driven by the controller.
///
/// Calls are requests: `play` returning `Ok` only means the request was
/// accepted. Asynchronous outcomes (a rejected play promise, end of track,
/// decode errors) are reported back through the controller's
/// `complete_play`, `on_track_end` and `on_audio_error`.
pub trait AudioResource: Send {
    /// Point the resource at a new stream
    fn load(&mut self, url: &str) -> Result<()>;

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Request accepted
    /// * `Err(_)` - Immediate refusal (decode, network, permission)
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Stop and unload
    fn stop(&mut self);

    /// Seek to position in the loaded stream
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Current playback position (`currentTime`)
    fn position(&self) -> Duration;

    /// Duration of the loaded stream, once known
    fn duration(&self) -> Option<Duration>;
}

/// Audio resource that plays nothing.
///
/// Accepts every request and keeps a position so headless sessions and tests
/// can drive the controller without an output device.
#[derive(Debug, Default)]
pub struct NullAudio {
    loaded: Option<String>,
    position: Duration,
    duration: Option<Duration>,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `duration` for whatever gets loaded next
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Currently loaded URL
    pub fn loaded_url(&self) -> Option<&str> {
        self.loaded.as_deref()
    }
}

impl AudioResource for NullAudio {
    fn load(&mut self, url: &str) -> Result<()> {
        self.loaded = Some(url.to_string());
        self.position = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn stop(&mut self) {
        self.loaded = None;
        self.position = Duration::ZERO;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.position = position;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.loaded.as_ref().and(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_audio_tracks_loaded_url_and_position() {
        let mut audio = NullAudio::new().with_duration(Duration::from_secs(30));
        assert_eq!(audio.duration(), None);

        audio.load("https://cdn.example/a.mp3").unwrap();
        audio.seek(Duration::from_secs(12)).unwrap();
        assert_eq!(audio.loaded_url(), Some("https://cdn.example/a.mp3"));
        assert_eq!(audio.position(), Duration::from_secs(12));
        assert_eq!(audio.duration(), Some(Duration::from_secs(30)));

        audio.stop();
        assert_eq!(audio.loaded_url(), None);
        assert_eq!(audio.position(), Duration::ZERO);
    }
}
