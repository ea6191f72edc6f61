//! Preview playback through the system audio output
//!
//! # Architecture
//!
//! Playback follows the same lock-free split used by every real-time path here:
//!
//! - **UI Thread**: sends `PlayerCommand`s over an `rtrb` SPSC ringbuffer
//! - **Audio Thread**: owns the playing samples exclusively and renders them
//!
//! Sample data handed to the audio thread is wrapped in `basedrop::Shared`, so
//! dropping it there only enqueues the pointer; the actual free happens on the
//! collector thread (see [`gc`]).
//!
//! ```text
//! ┌──────────────────┐     push()      ┌─────────────────────┐    pop()    ┌─────────────────────┐
//! │     UI Thread    │────────────────►│   Command Queue     │────────────►│  CPAL Audio Thread  │
//! └──────────────────┘                 └─────────────────────┘             └─────────────────────┘
//! ```
//!
//! If no output device can be opened the application keeps running with a
//! [`Player::disconnected`] handle: commands are dropped and the UI playhead
//! still follows wall-clock time.

mod device;
mod error;
pub mod gc;
mod player;

use serde::{Deserialize, Serialize};

pub use error::{AudioError, AudioResult};
pub use player::{start_output, OutputHandle, Player};

/// Audio output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Output device name (system default when `None`)
    pub device: Option<String>,
}
