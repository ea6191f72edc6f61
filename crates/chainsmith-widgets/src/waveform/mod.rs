//! Waveform view engine
//!
//! Control flow for every interaction:
//!
//! ```text
//! InputEvent ──► WaveformState::dispatch ──► ViewState (zoom / pan / marker / playhead)
//!                                        │
//!                                        ├─► ScrollbarModel (resynced)
//!                                        └─► FrameRenderer ──► EnvelopeCache ──► RenderedFrame
//! ```
//!
//! The frame is only rebuilt when buffer, viewport, offset or zoom change;
//! marker and playhead are an overlay derived on demand.

mod canvas;
mod envelope;
mod input;
mod playhead;
mod render;
mod scrollbar;
mod state;
mod view;

pub use canvas::{WaveformCanvas, WaveformInteraction};
pub use envelope::{compute_envelope, Envelope, EnvelopeCache, EnvelopeKey};
pub use input::{InputEvent, InputOutcome, PlaybackRequest, Redraw, WheelUnit};
pub use playhead::PlaybackClock;
pub use render::{
    overlay, ColumnShape, FrameKey, FrameRenderer, Overlay, RenderedFrame, Viewport,
    AMPLITUDE_SCALE,
};
pub use scrollbar::ScrollbarModel;
pub use state::{ViewState, WaveformState, WAVEFORM_HEIGHT};
pub use view::{scrollbar_view, waveform_view};
