//! Tick handler for playhead polling
//!
//! The Tick message only arrives while playing. The playhead follows wall-clock
//! time from the moment playback started; reaching the end of the buffer stops
//! playback (and with it the subscription).

use std::time::Instant;

use chainsmith_widgets::InputEvent;
use iced::Task;

use super::super::app::ChainSmithApp;
use super::super::message::Message;

impl ChainSmithApp {
    /// Handle Tick message
    pub fn handle_tick(&mut self) -> Task<Message> {
        let Some(playhead) = self.waveform.poll_playhead(Instant::now()) else {
            return Task::none();
        };
        self.handle_waveform_input(InputEvent::PlaybackTick { playhead })
    }
}
