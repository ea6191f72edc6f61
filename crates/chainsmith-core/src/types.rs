//! Common types for ChainSmith
//!
//! The fundamental unit is [`AudioBuffer`]: a normalized mono sample sequence
//! plus its sample rate, tagged with a [`BufferId`] that identifies this
//! particular load (not its contents). Derived data such as cached peak
//! envelopes is keyed on the id so that replacing a buffer invalidates it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Fallback sample rate when a decoder does not report one
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Audio sample type (normalized 32-bit float, -1.0 to 1.0)
pub type Sample = f32;

/// Process-wide generation counter for buffer identities
static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token for a loaded buffer
///
/// Every constructed [`AudioBuffer`] gets a fresh id, even if its samples are
/// identical to another buffer's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw generation number (for logging)
    pub fn generation(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buf#{}", self.0)
    }
}

/// Immutable mono audio buffer
///
/// Cloning is cheap: the samples are shared behind an `Arc`, and the clone
/// keeps the same identity.
#[derive(Clone)]
pub struct AudioBuffer {
    id: BufferId,
    samples: Arc<[Sample]>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer with a fresh identity
    ///
    /// A zero sample rate is replaced by [`DEFAULT_SAMPLE_RATE`].
    pub fn new(samples: impl Into<Arc<[Sample]>>, sample_rate: u32) -> Self {
        Self {
            id: BufferId::next(),
            samples: samples.into(),
            sample_rate: if sample_rate > 0 { sample_rate } else { DEFAULT_SAMPLE_RATE },
        }
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Shared handle to the sample data (for playback and background export)
    pub fn shared_samples(&self) -> Arc<[Sample]> {
        Arc::clone(&self.samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

impl fmt::Debug for AudioBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioBuffer")
            .field("id", &self.id)
            .field("samples", &format!("<{} samples>", self.samples.len()))
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}
