//! Peak envelopes and their cache
//!
//! A peak envelope is a min/max decimation of a sample range: the range is
//! split into contiguous blocks of `step` samples and each block contributes
//! its minimum and maximum. Rendering one view column per block means a repaint
//! never touches the raw samples once the envelope for that view exists.
//!
//! # Caching
//!
//! Envelopes are memoized per `(buffer, start, end, step)` in a bounded LRU.
//! The cache only serves the buffer that is currently attached: attaching a new
//! buffer (or releasing the current one) evicts everything, and a request for
//! any other buffer identity returns an empty envelope without scanning.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chainsmith_core::{AudioBuffer, BufferId, Sample};

// =============================================================================
// Envelope
// =============================================================================

/// Per-block minima and maxima, `mins[i] <= maxs[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub mins: Vec<Sample>,
    pub maxs: Vec<Sample>,
}

impl Envelope {
    /// Number of blocks
    pub fn len(&self) -> usize {
        self.mins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mins.is_empty()
    }

    /// `(min, max)` of block `index`
    pub fn get(&self, index: usize) -> Option<(Sample, Sample)> {
        Some((*self.mins.get(index)?, *self.maxs.get(index)?))
    }
}

/// Compute the envelope of `samples[start..end]` in blocks of `step`
///
/// Produces `floor((end - start) / step)` blocks; a trailing partial block is
/// dropped. `end` is clamped to the slice length; an empty range or a zero
/// step yields an empty envelope.
pub fn compute_envelope(samples: &[Sample], start: usize, end: usize, step: usize) -> Envelope {
    let end = end.min(samples.len());
    if step == 0 || end <= start {
        return Envelope::default();
    }

    let blocks = (end - start) / step;
    let mut mins = Vec::with_capacity(blocks);
    let mut maxs = Vec::with_capacity(blocks);

    for block in samples[start..start + blocks * step].chunks_exact(step) {
        let (lo, hi) = block
            .iter()
            .fold((Sample::INFINITY, Sample::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        mins.push(lo);
        maxs.push(hi);
    }

    Envelope { mins, maxs }
}

// =============================================================================
// Cache
// =============================================================================

/// Cache key: which buffer, which range, which decimation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvelopeKey {
    pub buffer: BufferId,
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

/// Bounded LRU of envelopes for the attached buffer
#[derive(Debug)]
pub struct EnvelopeCache {
    capacity: usize,
    live: Option<BufferId>,
    entries: HashMap<EnvelopeKey, Arc<Envelope>>,
    /// Least recently used at the front
    order: VecDeque<EnvelopeKey>,
    hits: u64,
    misses: u64,
}

impl EnvelopeCache {
    /// Create a cache holding at most `capacity` envelopes (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            live: None,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Make `id` the live buffer, evicting every entry of the previous one
    pub fn attach(&mut self, id: BufferId) {
        if self.live == Some(id) {
            return;
        }
        self.evict_all();
        log::debug!("EnvelopeCache: attached {}", id);
        self.live = Some(id);
    }

    /// Release the live buffer and evict its entries
    pub fn release(&mut self) {
        if let Some(id) = self.live.take() {
            log::debug!("EnvelopeCache: released {}", id);
        }
        self.evict_all();
    }

    /// Currently live buffer identity
    pub fn live(&self) -> Option<BufferId> {
        self.live
    }

    /// Envelope of `buffer.samples()[start..end]` at `step` samples per block
    ///
    /// Served from the cache when the same key was computed before. A buffer
    /// that is not the live one gets an empty envelope.
    pub fn get_envelope(
        &mut self,
        buffer: &AudioBuffer,
        start: usize,
        end: usize,
        step: usize,
    ) -> Arc<Envelope> {
        if self.live != Some(buffer.id()) {
            log::debug!("EnvelopeCache: {} is not live, returning empty envelope", buffer.id());
            return Arc::new(Envelope::default());
        }

        let end = end.min(buffer.len());
        if step == 0 || end <= start {
            return Arc::new(Envelope::default());
        }

        let key = EnvelopeKey {
            buffer: buffer.id(),
            start,
            end,
            step,
        };

        if let Some(envelope) = self.entries.get(&key).cloned() {
            self.hits += 1;
            self.touch(&key);
            return envelope;
        }

        self.misses += 1;
        let envelope = Arc::new(compute_envelope(buffer.samples(), start, end, step));
        log::debug!(
            "EnvelopeCache: computed [{}, {}) step {} -> {} blocks",
            start,
            end,
            step,
            envelope.len()
        );

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, Arc::clone(&envelope));
        self.order.push_back(key);

        envelope
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lookups served from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to scan samples
    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn contains(&self, key: &EnvelopeKey) -> bool {
        self.entries.contains_key(key)
    }

    fn touch(&mut self, key: &EnvelopeKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(*key);
    }

    fn evict_all(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
