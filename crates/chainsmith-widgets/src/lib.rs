//! Waveform widgets for ChainSmith
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **Engine state** (`WaveformState`): buffer, peak-envelope cache, view
//!   window, cached frame and scrollbar model. Mutated only through
//!   [`WaveformState::dispatch`] with an explicit [`InputEvent`].
//! - **View functions** (`waveform_view`, `scrollbar_view`): take state and a
//!   callback, return `Element<Message>`
//! - **Canvas Program**: translates raw mouse/keyboard events into
//!   [`InputEvent`]s and paints the cached frame plus overlay
//!
//! Everything except the canvas and view functions is toolkit independent and
//! tested without a window.

pub mod theme;
pub mod waveform;

pub use theme::{BACKGROUND_COLOR, CENTER_LINE_COLOR, MARKER_COLOR, PLAYHEAD_COLOR, WAVEFORM_COLOR};

pub use waveform::{
    compute_envelope, scrollbar_view, waveform_view, ColumnShape, Envelope, EnvelopeCache,
    EnvelopeKey, FrameKey, FrameRenderer, InputEvent, InputOutcome, Overlay, PlaybackClock,
    PlaybackRequest, Redraw, RenderedFrame, ScrollbarModel, ViewState, Viewport, WaveformCanvas,
    WaveformInteraction, WaveformState, WheelUnit, AMPLITUDE_SCALE, WAVEFORM_HEIGHT,
};
