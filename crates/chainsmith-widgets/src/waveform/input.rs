//! Input controller
//!
//! Every interaction with the waveform (canvas gestures, buttons, scrollbar,
//! playback timer) arrives as an [`InputEvent`] and goes through
//! [`WaveformState::dispatch`], which mutates the view, refreshes derived
//! state and reports what has to be redrawn and whether playback must change.

use std::time::Instant;

use super::playhead::PlaybackClock;
use super::state::WaveformState;
use super::render::Viewport;

/// Unit of a wheel delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelUnit {
    /// Notched mouse wheel
    Lines,
    /// Trackpad / smooth scrolling
    Pixels,
}

/// Waveform input events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary click at pixel column `x`: place the marker
    Click { x: f32 },
    /// Wheel or trackpad scroll; with the zoom modifier held it zooms
    Wheel {
        dx: f32,
        dy: f32,
        unit: WheelUnit,
        zoom_modifier: bool,
    },
    /// Pinch gesture, `scale > 1` zooms in
    Pinch { scale: f64 },
    /// "Zoom In" button
    ZoomIn,
    /// "Zoom Out" button
    ZoomOut,
    /// Scrollbar dragged to an offset
    ScrollbarMoved(usize),
    /// Canvas size changed
    Resized { width: f32, height: f32 },
    /// "Play from marker" button
    PlayFromMarker,
    /// "Stop" button
    Stop,
    /// Timer poll while playing
    PlaybackTick { playhead: usize },
}

/// How much of the canvas needs repainting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Redraw {
    #[default]
    None,
    /// Marker or playhead moved; columns unchanged
    Overlay,
    /// Columns changed
    Full,
}

/// Playback command for the audio output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackRequest {
    Play { start_sample: usize },
    Stop,
}

/// Result of dispatching one event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    pub redraw: Redraw,
    pub playback: Option<PlaybackRequest>,
}

impl InputOutcome {
    fn redraw(redraw: Redraw) -> Self {
        Self {
            redraw,
            playback: None,
        }
    }

    fn view_changed(changed: bool) -> Self {
        Self::redraw(if changed { Redraw::Full } else { Redraw::None })
    }
}

impl WaveformState {
    /// Apply one input event
    pub fn dispatch(&mut self, event: InputEvent) -> InputOutcome {
        self.dispatch_at(event, Instant::now())
    }

    /// [`dispatch`](Self::dispatch) with an explicit clock reading
    pub fn dispatch_at(&mut self, event: InputEvent, now: Instant) -> InputOutcome {
        let width = self.viewport.width;

        let outcome = match event {
            InputEvent::Click { x } => {
                self.view.place_marker(x);
                log::debug!("Marker at ratio {:.4}", self.view.marker_ratio);
                InputOutcome::redraw(Redraw::Overlay)
            }
            InputEvent::Wheel {
                dx,
                dy,
                unit,
                zoom_modifier,
            } => InputOutcome::view_changed(self.handle_wheel(dx, dy, unit, zoom_modifier)),
            InputEvent::Pinch { scale } => InputOutcome::view_changed(self.view.zoom(scale, width)),
            InputEvent::ZoomIn => {
                InputOutcome::view_changed(self.view.zoom(self.config.zoom_in_factor, width))
            }
            InputEvent::ZoomOut => {
                InputOutcome::view_changed(self.view.zoom(self.config.zoom_out_factor, width))
            }
            InputEvent::ScrollbarMoved(value) => {
                InputOutcome::view_changed(self.view.scroll_to(value, width))
            }
            InputEvent::Resized { width, height } => {
                let viewport = Viewport::new(pixels(width), pixels(height));
                if viewport == self.viewport {
                    InputOutcome::default()
                } else {
                    log::debug!("Viewport resized to {}x{}", viewport.width, viewport.height);
                    self.viewport = viewport;
                    self.view.clamp_to_viewport(viewport.width);
                    InputOutcome::redraw(Redraw::Full)
                }
            }
            InputEvent::PlayFromMarker => self.start_playback(now),
            InputEvent::Stop => self.stop_playback(),
            InputEvent::PlaybackTick { playhead } => {
                if self.clock.is_none() {
                    InputOutcome::default()
                } else if playhead >= self.view.total_samples {
                    log::info!("Playback reached end of buffer");
                    self.stop_playback()
                } else {
                    self.view.playhead = Some(playhead);
                    InputOutcome::redraw(Redraw::Overlay)
                }
            }
        };

        self.refresh();
        outcome
    }

    fn handle_wheel(&mut self, dx: f32, dy: f32, unit: WheelUnit, zoom_modifier: bool) -> bool {
        let width = self.viewport.width;

        if zoom_modifier {
            let factor = match unit {
                WheelUnit::Lines if dy > 0.0 => self.config.zoom_in_factor,
                WheelUnit::Lines if dy < 0.0 => self.config.zoom_out_factor,
                WheelUnit::Lines => return false,
                // Trackpad pinch arrives as modifier + pixel scroll
                WheelUnit::Pixels => (1.0 + dy as f64 * self.config.pinch_sensitivity).max(0.1),
            };
            return self.view.zoom(factor, width);
        }

        // Dominant axis; scrolling down or left moves toward the end
        let amount = if dx.abs() > dy.abs() { dx } else { dy };
        if amount == 0.0 || !amount.is_finite() {
            return false;
        }

        let unit_samples = match unit {
            WheelUnit::Lines => {
                (self.view.visible_samples(width) as f64 * self.config.scroll_step_fraction).max(1.0)
            }
            WheelUnit::Pixels => self.view.samples_per_pixel as f64,
        };
        let delta = (-(amount as f64) * unit_samples).round() as i64;
        self.view.scroll_by(delta, width)
    }

    fn start_playback(&mut self, now: Instant) -> InputOutcome {
        let Some(buffer) = self.buffer.as_ref() else {
            return InputOutcome::default();
        };
        if buffer.is_empty() {
            return InputOutcome::default();
        }

        let start_sample = self.view.marker_sample().min(buffer.len().saturating_sub(1));
        self.clock = Some(PlaybackClock::start(start_sample, buffer.sample_rate(), now));
        self.view.playhead = Some(start_sample);
        log::info!("Playing {} from sample {}", buffer.id(), start_sample);

        InputOutcome {
            redraw: Redraw::Overlay,
            playback: Some(PlaybackRequest::Play { start_sample }),
        }
    }

    fn stop_playback(&mut self) -> InputOutcome {
        self.clock = None;
        self.view.playhead = None;
        InputOutcome {
            redraw: Redraw::Overlay,
            playback: Some(PlaybackRequest::Stop),
        }
    }
}

fn pixels(value: f32) -> usize {
    if value.is_finite() && value > 0.0 {
        value.floor() as usize
    } else {
        0
    }
}
