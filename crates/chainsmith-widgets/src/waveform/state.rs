//! Waveform view state
//!
//! [`ViewState`] is the sample ↔ pixel mapping: which sample sits at the left
//! edge, how many samples each pixel column covers, where the marker is and
//! where the playhead is. All of its operations clamp instead of failing:
//!
//! ```text
//! 1 <= samples_per_pixel <= max(1, total_samples / width)
//! 0 <= offset <= max(0, total_samples - width * samples_per_pixel)
//! ```
//!
//! [`WaveformState`] bundles a view with everything derived from it (envelope
//! cache, rendered frame, scrollbar model) and the attached buffer.

use std::time::Instant;

use chainsmith_core::config::ViewConfig;
use chainsmith_core::AudioBuffer;

use super::envelope::EnvelopeCache;
use super::playhead::PlaybackClock;
use super::render::{overlay, FrameRenderer, Overlay, RenderedFrame, Viewport};
use super::scrollbar::ScrollbarModel;

// =============================================================================
// Constants
// =============================================================================

/// Canvas height in pixels
pub const WAVEFORM_HEIGHT: f32 = 240.0;

// =============================================================================
// View State
// =============================================================================

/// Visible window over the attached buffer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Sample at the left edge
    pub offset: usize,
    /// Samples covered by one pixel column
    pub samples_per_pixel: usize,
    /// Marker position as a fraction of the buffer, `[0, 1]`
    pub marker_ratio: f64,
    /// Playhead sample, present only during playback
    pub playhead: Option<usize>,
    /// Length of the attached buffer (0 when none)
    pub total_samples: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            offset: 0,
            samples_per_pixel: 1,
            marker_ratio: 0.0,
            playhead: None,
            total_samples: 0,
        }
    }
}

impl ViewState {
    /// Reset for a newly attached buffer of `total_samples`
    pub fn reset(&mut self, total_samples: usize, default_spp: usize, width: usize) {
        self.total_samples = total_samples;
        self.offset = 0;
        self.marker_ratio = 0.0;
        self.playhead = None;
        self.samples_per_pixel = default_spp.clamp(1, self.max_samples_per_pixel(width));
    }

    /// Coarsest zoom: the whole buffer fits the viewport
    pub fn max_samples_per_pixel(&self, width: usize) -> usize {
        (self.total_samples / width.max(1)).max(1)
    }

    /// Samples spanned by the viewport at the current zoom
    pub fn visible_samples(&self, width: usize) -> usize {
        width.max(1).saturating_mul(self.samples_per_pixel)
    }

    /// Largest valid offset
    pub fn max_offset(&self, width: usize) -> usize {
        self.total_samples.saturating_sub(self.visible_samples(width))
    }

    /// Sample at the horizontal center of the viewport
    pub fn center_sample(&self, width: usize) -> usize {
        self.offset + self.visible_samples(width) / 2
    }

    /// Visible sample range `[start, end)`, clipped to the buffer
    pub fn visible_range(&self, width: usize) -> (usize, usize) {
        let end = (self.offset + self.visible_samples(width)).min(self.total_samples);
        (self.offset.min(end), end)
    }

    /// Zoom by `factor` (> 1 zooms in), keeping the center sample in place
    ///
    /// Zooming in rounds the new level down, zooming out rounds it up, and the
    /// result is clamped to `[1, max_samples_per_pixel]`. Returns `false` when
    /// the level does not change.
    pub fn zoom(&mut self, factor: f64, width: usize) -> bool {
        if !factor.is_finite() || factor <= 0.0 || factor == 1.0 {
            return false;
        }

        let old = self.samples_per_pixel;
        let max_spp = self.max_samples_per_pixel(width);
        let zooming_in = factor > 1.0;

        if (zooming_in && old <= 1) || (!zooming_in && old >= max_spp) {
            return false;
        }

        let raw = old as f64 / factor;
        let rounded = if zooming_in { raw.floor() } else { raw.ceil() };
        let new = (rounded.min(usize::MAX as f64) as usize).clamp(1, max_spp);

        if new == old {
            return false;
        }

        let center = self.center_sample(width);
        self.samples_per_pixel = new;
        self.offset = center.saturating_sub(self.visible_samples(width) / 2);
        self.clamp_offset(width);

        log::debug!("zoom: {} -> {} samples/px (factor {:.3})", old, new, factor);
        true
    }

    /// Move the left edge to `offset` (clamped). Returns `true` if it moved.
    pub fn scroll_to(&mut self, offset: usize, width: usize) -> bool {
        let clamped = offset.min(self.max_offset(width));
        let changed = clamped != self.offset;
        self.offset = clamped;
        changed
    }

    /// Move the left edge by `delta` samples (clamped). Returns `true` if it moved.
    pub fn scroll_by(&mut self, delta: i64, width: usize) -> bool {
        let target = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.offset.saturating_add(delta as usize)
        };
        self.scroll_to(target, width)
    }

    /// Re-establish both invariants for `width` (after a resize)
    pub fn clamp_to_viewport(&mut self, width: usize) -> bool {
        let before = (self.offset, self.samples_per_pixel);
        self.samples_per_pixel = self
            .samples_per_pixel
            .clamp(1, self.max_samples_per_pixel(width));
        self.clamp_offset(width);
        before != (self.offset, self.samples_per_pixel)
    }

    /// Place the marker under pixel column `x`
    pub fn place_marker(&mut self, x: f32) {
        if self.total_samples == 0 {
            self.marker_ratio = 0.0;
            return;
        }
        let column = if x.is_finite() { x.max(0.0) as usize } else { 0 };
        let sample = self.offset + column * self.samples_per_pixel;
        self.marker_ratio = (sample as f64 / self.total_samples as f64).clamp(0.0, 1.0);
    }

    /// Sample index under the marker
    ///
    /// `floor(total * ratio)`, except that a product within rounding error of
    /// an integer snaps to it, so a clicked sample maps back to itself.
    pub fn marker_sample(&self) -> usize {
        let exact = self.total_samples as f64 * self.marker_ratio;
        let nearest = exact.round();
        let sample = if (exact - nearest).abs() < 1e-6 {
            nearest
        } else {
            exact.floor()
        };
        (sample.max(0.0) as usize).min(self.total_samples)
    }

    /// Pixel column of the marker, if it is inside the viewport
    pub fn marker_x(&self, width: usize) -> Option<f32> {
        if self.total_samples == 0 {
            return None;
        }
        self.sample_to_x(self.marker_sample(), width)
    }

    /// Pixel column of the playhead, if playing and inside the viewport
    pub fn playhead_x(&self, width: usize) -> Option<f32> {
        self.sample_to_x(self.playhead?, width)
    }

    /// Map a sample to its pixel column (None outside the viewport)
    pub fn sample_to_x(&self, sample: usize, width: usize) -> Option<f32> {
        let end = self.offset + self.visible_samples(width);
        if sample < self.offset || sample >= end {
            return None;
        }
        Some((sample - self.offset) as f32 / self.samples_per_pixel as f32)
    }

    fn clamp_offset(&mut self, width: usize) {
        self.offset = self.offset.min(self.max_offset(width));
    }
}

// =============================================================================
// Waveform State
// =============================================================================

/// Complete state behind one waveform canvas
///
/// Mutated only through [`attach`](Self::attach), [`clear`](Self::clear) and
/// [`dispatch`](Self::dispatch); derived data is refreshed after every
/// mutation so view functions can read it immutably.
#[derive(Debug)]
pub struct WaveformState {
    pub(super) buffer: Option<AudioBuffer>,
    pub(super) cache: EnvelopeCache,
    pub(super) view: ViewState,
    pub(super) renderer: FrameRenderer,
    pub(super) scrollbar: ScrollbarModel,
    pub(super) viewport: Viewport,
    pub(super) clock: Option<PlaybackClock>,
    pub(super) config: ViewConfig,
}

impl WaveformState {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            buffer: None,
            cache: EnvelopeCache::new(config.envelope_cache_capacity),
            view: ViewState::default(),
            renderer: FrameRenderer::default(),
            scrollbar: ScrollbarModel::default(),
            viewport: Viewport::default(),
            clock: None,
            config,
        }
    }

    /// Attach `buffer`, releasing the previous one and resetting the view
    pub fn attach(&mut self, buffer: AudioBuffer) {
        log::info!(
            "WaveformState: attaching {} ({} samples @ {} Hz)",
            buffer.id(),
            buffer.len(),
            buffer.sample_rate()
        );

        self.cache.attach(buffer.id());
        self.view.reset(
            buffer.len(),
            self.config.default_samples_per_pixel,
            self.viewport.width,
        );
        self.clock = None;
        self.buffer = Some(buffer);
        self.renderer.invalidate();
        self.refresh();
    }

    /// Detach the current buffer (empty view)
    pub fn clear(&mut self) {
        self.cache.release();
        self.buffer = None;
        self.view.reset(0, self.config.default_samples_per_pixel, self.viewport.width);
        self.clock = None;
        self.renderer.invalidate();
        self.refresh();
    }

    pub fn buffer(&self) -> Option<&AudioBuffer> {
        self.buffer.as_ref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scrollbar(&self) -> &ScrollbarModel {
        &self.scrollbar
    }

    pub fn cache(&self) -> &EnvelopeCache {
        &self.cache
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Column geometry for the current view
    pub fn frame(&self) -> Option<&RenderedFrame> {
        self.renderer.frame()
    }

    /// Marker and playhead positions for the current view
    pub fn overlay(&self) -> Overlay {
        overlay(&self.view, self.viewport)
    }

    /// Whether a playback clock is running
    pub fn is_playing(&self) -> bool {
        self.clock.is_some()
    }

    /// Wall-clock playhead position at `now`, while playing
    pub fn poll_playhead(&self, now: Instant) -> Option<usize> {
        self.clock.as_ref().map(|clock| clock.position_at(now))
    }

    /// Rebuild the frame if its key changed and resync the scrollbar
    pub(super) fn refresh(&mut self) -> bool {
        self.scrollbar = ScrollbarModel::from_view(
            &self.view,
            self.viewport.width,
            self.config.scroll_step_fraction,
        );
        self.renderer
            .render(self.buffer.as_ref(), &self.view, self.viewport, &mut self.cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn view(total: usize, spp: usize, offset: usize) -> ViewState {
        ViewState {
            offset,
            samples_per_pixel: spp,
            total_samples: total,
            ..Default::default()
        }
    }

    #[test]
    fn test_zoom_scenario() {
        // 1s at 44.1kHz, 100 spp on 300 px
        let mut v = view(44100, 100, 0);
        assert_eq!(v.visible_range(300), (0, 30000));

        assert!(v.zoom(2.0, 300));
        assert_eq!(v.samples_per_pixel, 50);

        assert!(v.zoom(0.5, 300));
        assert_eq!(v.samples_per_pixel, 100);
    }

    #[test]
    fn test_zoom_rounding_direction() {
        let mut v = view(1_000_000, 100, 0);
        assert!(v.zoom(1.2, 500));
        assert_eq!(v.samples_per_pixel, 83, "zoom in floors 83.3");

        let mut v = view(1_000_000, 100, 0);
        assert!(v.zoom(0.83, 500));
        assert_eq!(v.samples_per_pixel, 121, "zoom out ceils 120.48");
    }

    #[test]
    fn test_zoom_no_ops_at_limits() {
        let mut v = view(44100, 1, 0);
        assert!(!v.zoom(1.2, 300), "already fully zoomed in");

        let mut v = view(44100, 147, 0);
        assert_eq!(v.max_samples_per_pixel(300), 147);
        assert!(!v.zoom(0.83, 300), "already fully zoomed out");

        let mut v = view(44100, 100, 0);
        assert!(!v.zoom(1.0, 300));
        assert!(!v.zoom(f64::NAN, 300));
        assert!(!v.zoom(-2.0, 300));
        assert_eq!(v.samples_per_pixel, 100);
    }

    #[test]
    fn test_zoom_out_clamps_to_max() {
        let mut v = view(44100, 100, 0);
        assert!(v.zoom(0.1, 300));
        assert_eq!(v.samples_per_pixel, 147);
        assert_eq!(v.offset, 0);
    }

    #[test]
    fn test_empty_buffer_is_inert() {
        let mut v = ViewState::default();
        v.reset(0, 256, 800);
        assert_eq!(v.samples_per_pixel, 1);
        assert!(!v.zoom(2.0, 800));
        assert!(!v.scroll_by(1000, 800));
        v.place_marker(100.0);
        assert_eq!(v.marker_ratio, 0.0);
        assert_eq!(v.marker_x(800), None);
    }

    #[test]
    fn test_reset_clamps_default_zoom() {
        let mut v = ViewState::default();
        v.reset(10_000, 256, 800);
        assert_eq!(v.samples_per_pixel, 12);

        v.reset(10_000_000, 256, 800);
        assert_eq!(v.samples_per_pixel, 256);
    }

    #[test]
    fn test_marker_mapping() {
        let mut v = view(100_000, 10, 5_000);
        v.place_marker(250.0);
        assert_eq!(v.marker_sample(), 7_500);
        assert!((v.marker_ratio - 0.075).abs() < 1e-12);
        assert_eq!(v.marker_x(800), Some(250.0));

        // Scrolling past the marker hides it
        v.scroll_to(20_000, 800);
        assert_eq!(v.marker_x(800), None);
    }

    #[test]
    fn test_marker_at_first_column_stays_visible() {
        // 37 / 1030 * 1030 lands just below 37 in f64
        let mut v = view(1_030, 1, 37);
        v.place_marker(0.0);
        assert_eq!(v.marker_sample(), 37);
        assert_eq!(v.marker_x(800), Some(0.0));
    }

    #[test]
    fn test_marker_sample_floors_between_samples() {
        let mut v = view(1_001, 1, 0);
        v.marker_ratio = 0.5;
        assert_eq!(v.marker_sample(), 500);
    }

    #[test]
    fn test_marker_clamps_past_end() {
        let mut v = view(1_000, 10, 0);
        v.place_marker(500.0);
        assert_eq!(v.marker_ratio, 1.0);
        assert_eq!(v.marker_sample(), 1_000);
    }

    #[test]
    fn test_playhead_visibility() {
        let mut v = view(100_000, 10, 10_000);
        assert_eq!(v.playhead_x(800), None);
        v.playhead = Some(10_050);
        assert_eq!(v.playhead_x(800), Some(5.0));
        v.playhead = Some(9_999);
        assert_eq!(v.playhead_x(800), None);
        v.playhead = Some(18_000);
        assert_eq!(v.playhead_x(800), None, "right edge is exclusive");
    }

    #[test]
    fn test_resize_reclamps() {
        let mut v = view(100_000, 100, 90_000);
        // Wider viewport: max spp 50, offset must pull back
        assert!(v.clamp_to_viewport(2000));
        assert_eq!(v.samples_per_pixel, 50);
        assert_eq!(v.offset, 0);
    }

    proptest! {
        #[test]
        fn prop_pan_always_clamped(
            total in 0usize..2_000_000,
            spp in 1usize..2_000,
            width in 1usize..2_000,
            target in 0usize..4_000_000,
            delta in -4_000_000i64..4_000_000,
        ) {
            let mut v = view(total, spp, 0);
            v.clamp_to_viewport(width);

            v.scroll_to(target, width);
            prop_assert!(v.offset <= total.saturating_sub(width * v.samples_per_pixel));

            v.scroll_by(delta, width);
            prop_assert!(v.offset <= total.saturating_sub(width * v.samples_per_pixel));
        }

        #[test]
        fn prop_zoom_bounds_and_centering(
            total in 1usize..5_000_000,
            width in 1usize..2_000,
            spp_seed in 1usize..10_000,
            offset_seed in 0usize..5_000_000,
            factor in 0.05f64..20.0,
        ) {
            let mut v = view(total, spp_seed, offset_seed);
            v.clamp_to_viewport(width);

            let max_spp = v.max_samples_per_pixel(width);
            let center_before = v.center_sample(width);
            let old = v.clone();

            let changed = v.zoom(factor, width);
            prop_assert!(v.samples_per_pixel >= 1 && v.samples_per_pixel <= max_spp);
            prop_assert!(v.offset <= v.max_offset(width));

            if !changed {
                prop_assert_eq!(&v, &old);
            } else {
                // Unless the offset had to be clamped, the center sample stays put
                let half = v.visible_samples(width) / 2;
                if center_before >= half && center_before - half <= v.max_offset(width) {
                    let drift = v.center_sample(width).abs_diff(center_before);
                    prop_assert!(drift <= v.samples_per_pixel);
                }
            }
        }

        #[test]
        fn prop_zoom_noop_at_limits(
            total in 1_000usize..1_000_000,
            width in 1usize..1_000,
            zoom_in in 1.0001f64..10.0,
            zoom_out in 0.05f64..0.9999,
        ) {
            let mut v = view(total, 1, 0);
            let before = v.clone();
            prop_assert!(!v.zoom(zoom_in, width));
            prop_assert_eq!(&v, &before);

            let mut v = view(total, usize::MAX, 0);
            v.clamp_to_viewport(width);
            let before = v.clone();
            prop_assert!(!v.zoom(zoom_out, width));
            prop_assert_eq!(&v, &before);
        }

        #[test]
        fn prop_clicked_column_maps_back_exactly(
            total in 1_000usize..200_000,
            spp in 1usize..64,
            offset_frac in 0f64..1.0,
            column in 0usize..800,
        ) {
            let offset = (total as f64 * offset_frac) as usize;
            let sample = offset + column * spp;
            prop_assume!(sample < total);

            let mut v = view(total, spp, offset);
            v.place_marker(column as f32);
            prop_assert_eq!(v.marker_sample(), sample);
            prop_assert_eq!(v.marker_x(800), Some(column as f32));
        }

        #[test]
        fn prop_marker_stable_under_zoom_and_pan(
            total in 10_000usize..2_000_000,
            width in 100usize..1_500,
            x in 0f32..100.0,
            factor in 0.1f64..10.0,
            delta in -1_000_000i64..1_000_000,
        ) {
            let mut v = view(total, 1, 0);
            v.clamp_to_viewport(width);
            v.place_marker(x);
            let ratio = v.marker_ratio;
            let sample = v.marker_sample();

            v.zoom(factor, width);
            v.scroll_by(delta, width);

            prop_assert_eq!(v.marker_ratio, ratio);
            prop_assert_eq!(v.marker_sample(), sample);
            if let Some(mx) = v.marker_x(width) {
                let mapped = v.offset + (mx as f64 * v.samples_per_pixel as f64).round() as usize;
                prop_assert!(mapped.abs_diff(sample) <= v.samples_per_pixel);
            }
        }
    }
}
