//! Wall-clock playhead
//!
//! The playhead is not read back from the audio device: it is extrapolated
//! from when playback started, `start_sample + elapsed_seconds * sample_rate`.
//! The UI polls it on a timer while playing.

use std::time::Instant;

/// Start point of the current playback
#[derive(Debug, Clone, Copy)]
pub struct PlaybackClock {
    start_sample: usize,
    sample_rate: u32,
    started_at: Instant,
}

impl PlaybackClock {
    pub fn start(start_sample: usize, sample_rate: u32, now: Instant) -> Self {
        Self {
            start_sample,
            sample_rate,
            started_at: now,
        }
    }

    /// Playhead sample at `now`
    pub fn position_at(&self, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f64();
        self.start_sample + (elapsed * self.sample_rate as f64) as usize
    }
}
