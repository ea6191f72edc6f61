//! View functions for the waveform widgets
//!
//! These follow the iced 0.14 pattern: take state and a callback, return an
//! `Element`.

use iced::widget::{slider, Canvas, Space};
use iced::{Element, Length};

use super::canvas::WaveformCanvas;
use super::input::InputEvent;
use super::scrollbar::ScrollbarModel;
use super::state::{WaveformState, WAVEFORM_HEIGHT};

/// Height of the scrollbar row
const SCROLLBAR_HEIGHT: f32 = 16.0;

/// Create the waveform canvas
///
/// Every gesture on the canvas is reported through `on_input`; feed the
/// resulting message back into [`WaveformState::dispatch`].
///
/// # Example
///
/// ```ignore
/// let waveform = waveform_view(&self.waveform, Message::Waveform);
/// ```
pub fn waveform_view<'a, Message>(
    state: &'a WaveformState,
    on_input: impl Fn(InputEvent) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    Canvas::new(WaveformCanvas { state, on_input })
        .width(Length::Fill)
        .height(Length::Fixed(WAVEFORM_HEIGHT))
        .into()
}

/// Create the horizontal scrollbar for a waveform
///
/// Collapses to empty space while the whole buffer is visible. Dragging
/// reports the new offset in samples.
pub fn scrollbar_view<'a, Message>(
    model: &ScrollbarModel,
    on_scroll: impl Fn(usize) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    if model.is_idle() {
        return Space::new()
            .width(Length::Fill)
            .height(Length::Fixed(SCROLLBAR_HEIGHT))
            .into();
    }

    slider(0.0..=model.maximum as f64, model.value as f64, move |v: f64| {
        on_scroll(v.max(0.0).round() as usize)
    })
    .step(model.single_step as f64)
    .width(Length::Fill)
    .height(SCROLLBAR_HEIGHT)
    .into()
}
