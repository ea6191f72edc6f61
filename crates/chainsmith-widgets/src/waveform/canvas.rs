//! Canvas Program for the waveform
//!
//! Translates raw iced events into [`InputEvent`]s through the `on_input`
//! callback and paints the state's rendered frame. Column geometry is kept in
//! a `canvas::Cache` that is only cleared when the frame generation changes,
//! so playhead and marker updates redraw just the overlay layer.

use std::cell::Cell;

use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke};
use iced::{keyboard, mouse, Point, Rectangle, Size, Theme};

use super::input::{InputEvent, WheelUnit};
use super::render::ColumnShape;
use super::state::WaveformState;
use crate::theme::{BACKGROUND_COLOR, CENTER_LINE_COLOR, MARKER_COLOR, PLAYHEAD_COLOR, WAVEFORM_COLOR};

// =============================================================================
// Canvas Interaction State
// =============================================================================

/// Per-widget state kept by iced between frames
pub struct WaveformInteraction {
    /// Column geometry for the last drawn frame
    columns: canvas::Cache,
    /// Generation of the frame currently held in `columns`
    drawn_generation: Cell<u64>,
    /// Last size reported through `InputEvent::Resized`
    reported_size: Option<Size>,
    /// Held keyboard modifiers (zoom gesture)
    modifiers: keyboard::Modifiers,
}

impl Default for WaveformInteraction {
    fn default() -> Self {
        Self {
            columns: canvas::Cache::new(),
            drawn_generation: Cell::new(0),
            reported_size: None,
            modifiers: keyboard::Modifiers::default(),
        }
    }
}

// =============================================================================
// Waveform Canvas Program
// =============================================================================

/// Canvas program for the zoomable waveform
pub struct WaveformCanvas<'a, Message, F>
where
    F: Fn(InputEvent) -> Message,
{
    pub state: &'a WaveformState,
    pub on_input: F,
}

impl<'a, Message, F> Program<Message> for WaveformCanvas<'a, Message, F>
where
    Message: Clone,
    F: Fn(InputEvent) -> Message,
{
    type State = WaveformInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        // Report layout changes before anything else so the engine maps
        // pixels with the real width
        let size = bounds.size();
        if interaction.reported_size != Some(size) {
            interaction.reported_size = Some(size);
            return Some(canvas::Action::publish((self.on_input)(InputEvent::Resized {
                width: size.width,
                height: size.height,
            })));
        }

        match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                interaction.modifiers = *modifiers;
                None
            }
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                Some(
                    canvas::Action::publish((self.on_input)(InputEvent::Click { x: position.x }))
                        .and_capture(),
                )
            }
            Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                cursor.position_in(bounds)?;
                let (dx, dy, unit) = match *delta {
                    mouse::ScrollDelta::Lines { x, y } => (x, y, WheelUnit::Lines),
                    mouse::ScrollDelta::Pixels { x, y } => (x, y, WheelUnit::Pixels),
                };
                Some(
                    canvas::Action::publish((self.on_input)(InputEvent::Wheel {
                        dx,
                        dy,
                        unit,
                        zoom_modifier: interaction.modifiers.command(),
                    }))
                    .and_capture(),
                )
            }
            _ => None,
        }
    }

    fn mouse_interaction(
        &self,
        _interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) && self.state.buffer().is_some() {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let generation = self.state.frame().map_or(0, |f| f.generation);
        if interaction.drawn_generation.get() != generation {
            interaction.columns.clear();
            interaction.drawn_generation.set(generation);
        }

        let columns = interaction.columns.draw(renderer, bounds.size(), |frame| {
            draw_columns(frame, self.state, bounds.size());
        });

        let mut overlay = Frame::new(renderer, bounds.size());
        draw_overlay(&mut overlay, self.state, bounds.size());

        vec![columns, overlay.into_geometry()]
    }
}

/// Background, center line and envelope columns
fn draw_columns(frame: &mut Frame, state: &WaveformState, size: Size) {
    frame.fill_rectangle(Point::ORIGIN, size, BACKGROUND_COLOR);

    let mid = size.height / 2.0;
    frame.stroke(
        &Path::line(Point::new(0.0, mid), Point::new(size.width, mid)),
        Stroke::default().with_color(CENTER_LINE_COLOR).with_width(1.0),
    );

    let Some(rendered) = state.frame() else {
        return;
    };

    for column in &rendered.columns {
        match *column {
            ColumnShape::Point { x, y } => {
                frame.fill_rectangle(Point::new(x, y), Size::new(1.0, 1.0), WAVEFORM_COLOR);
            }
            ColumnShape::Segment { x, top, bottom } => {
                frame.stroke(
                    &Path::line(Point::new(x, top), Point::new(x, bottom)),
                    Stroke::default().with_color(WAVEFORM_COLOR).with_width(1.0),
                );
            }
        }
    }
}

/// Marker and playhead lines
fn draw_overlay(frame: &mut Frame, state: &WaveformState, size: Size) {
    let overlay = state.overlay();

    if let Some(x) = overlay.marker_x {
        frame.stroke(
            &Path::line(Point::new(x, 0.0), Point::new(x, size.height)),
            Stroke::default().with_color(MARKER_COLOR).with_width(1.0),
        );
    }

    if let Some(x) = overlay.playhead_x {
        frame.stroke(
            &Path::line(Point::new(x, 0.0), Point::new(x, size.height)),
            Stroke::default().with_color(PLAYHEAD_COLOR).with_width(1.5),
        );
    }
}
