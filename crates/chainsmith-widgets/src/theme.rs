//! Colors for the waveform canvas

use iced::Color;

/// Canvas background
pub const BACKGROUND_COLOR: Color = Color::from_rgb(0.1, 0.1, 0.12);

/// Zero-amplitude reference line
pub const CENTER_LINE_COLOR: Color = Color::from_rgb(0.22, 0.22, 0.25);

/// Envelope columns (#4DB3E6)
pub const WAVEFORM_COLOR: Color = Color::from_rgb(0.3, 0.7, 0.9);

/// Marker line (red)
pub const MARKER_COLOR: Color = Color::from_rgb(1.0, 0.2, 0.2);

/// Playhead line
pub const PLAYHEAD_COLOR: Color = Color::from_rgb(1.0, 1.0, 1.0);
