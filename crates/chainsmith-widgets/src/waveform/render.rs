//! Pixel-space rendering of the view
//!
//! A [`RenderedFrame`] holds one shape per pixel column, derived from the
//! peak envelope of the visible range:
//!
//! ```text
//! mid   = height / 2
//! scale = height * AMPLITUDE_SCALE
//! y     = mid - value * scale
//! ```
//!
//! A column whose min equals its max becomes a point, any other a vertical
//! segment. Frames are keyed on everything they depend on; a render with an
//! unchanged key reuses the previous frame. Marker and playhead are not part
//! of the frame, see [`Overlay`].

use chainsmith_core::{AudioBuffer, BufferId};

use super::envelope::EnvelopeCache;
use super::state::ViewState;

/// Fraction of the height used by a full-scale sample on each side of center
pub const AMPLITUDE_SCALE: f32 = 0.45;

/// Canvas size in whole pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Vertical pixel for a sample value
    pub fn amplitude_to_y(&self, value: f32) -> f32 {
        let mid = self.height as f32 / 2.0;
        let scale = self.height as f32 * AMPLITUDE_SCALE;
        mid - value * scale
    }
}

/// Everything a frame depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub buffer: Option<BufferId>,
    pub viewport: Viewport,
    pub offset: usize,
    pub samples_per_pixel: usize,
}

/// Geometry of a single column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnShape {
    /// Flat column (`min == max`)
    Point { x: f32, y: f32 },
    /// `top` is the max, `bottom` the min
    Segment { x: f32, top: f32, bottom: f32 },
}

/// Column geometry for one view
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub key: FrameKey,
    /// Increases every time a frame is built
    pub generation: u64,
    pub columns: Vec<ColumnShape>,
}

/// Marker and playhead columns (None when off screen)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Overlay {
    pub marker_x: Option<f32>,
    pub playhead_x: Option<f32>,
}

/// Overlay for the current view
pub fn overlay(view: &ViewState, viewport: Viewport) -> Overlay {
    Overlay {
        marker_x: view.marker_x(viewport.width),
        playhead_x: view.playhead_x(viewport.width),
    }
}

/// Builds frames and keeps the latest one
#[derive(Debug, Default)]
pub struct FrameRenderer {
    frame: Option<RenderedFrame>,
    generation: u64,
}

impl FrameRenderer {
    /// Latest frame
    pub fn frame(&self) -> Option<&RenderedFrame> {
        self.frame.as_ref()
    }

    /// Number of frames built so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drop the current frame so the next render rebuilds it
    pub fn invalidate(&mut self) {
        self.frame = None;
    }

    /// Bring the frame up to date; returns `true` if it was rebuilt
    pub fn render(
        &mut self,
        buffer: Option<&AudioBuffer>,
        view: &ViewState,
        viewport: Viewport,
        cache: &mut EnvelopeCache,
    ) -> bool {
        let key = FrameKey {
            buffer: buffer.map(|b| b.id()),
            viewport,
            offset: view.offset,
            samples_per_pixel: view.samples_per_pixel,
        };

        if self.frame.as_ref().is_some_and(|f| f.key == key) {
            return false;
        }

        let columns = match buffer {
            Some(buffer) if viewport.width > 0 => {
                let (start, end) = view.visible_range(viewport.width);
                let envelope = cache.get_envelope(buffer, start, end, view.samples_per_pixel);
                (0..envelope.len())
                    .filter_map(|i| envelope.get(i).map(|(lo, hi)| column_shape(i, lo, hi, viewport)))
                    .collect()
            }
            _ => Vec::new(),
        };

        self.generation += 1;
        log::debug!(
            "FrameRenderer: frame {} ({} columns, offset {}, {} spp)",
            self.generation,
            columns.len(),
            view.offset,
            view.samples_per_pixel
        );

        self.frame = Some(RenderedFrame {
            key,
            generation: self.generation,
            columns,
        });
        true
    }
}

fn column_shape(index: usize, min: f32, max: f32, viewport: Viewport) -> ColumnShape {
    let x = index as f32;
    if min == max {
        ColumnShape::Point {
            x,
            y: viewport.amplitude_to_y(min),
        }
    } else {
        ColumnShape::Segment {
            x,
            top: viewport.amplitude_to_y(max),
            bottom: viewport.amplitude_to_y(min),
        }
    }
}
