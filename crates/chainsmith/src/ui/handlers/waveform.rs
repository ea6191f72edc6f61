//! Waveform input handler
//!
//! Canvas gestures, the zoom and transport buttons and the scrollbar all
//! arrive as `Message::Waveform`. The waveform state decides what changes;
//! this handler forwards the resulting playback request to the player.

use chainsmith_widgets::{InputEvent, InputOutcome, PlaybackRequest};
use iced::Task;

use super::super::app::ChainSmithApp;
use super::super::message::Message;

impl ChainSmithApp {
    /// Handle Waveform message
    pub fn handle_waveform_input(&mut self, event: InputEvent) -> Task<Message> {
        let outcome = self.waveform.dispatch(event);
        self.apply_playback(outcome);
        Task::none()
    }

    pub(crate) fn apply_playback(&mut self, outcome: InputOutcome) {
        match outcome.playback {
            Some(PlaybackRequest::Play { start_sample }) => {
                if let Some(buffer) = self.waveform.buffer() {
                    self.player.play(buffer, start_sample);
                }
            }
            Some(PlaybackRequest::Stop) => self.player.stop(),
            None => {}
        }
    }
}
