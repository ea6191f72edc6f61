//! Main application state and iced implementation

use chainsmith_core::audio::{start_output, OutputHandle, Player};
use chainsmith_core::audio_file::SampleItem;
use chainsmith_core::config::{self, Config};
use chainsmith_widgets::{scrollbar_view, waveform_view, InputEvent, WaveformState};
use iced::widget::{button, column, row, scrollable, text, Column};
use iced::{Element, Length, Subscription, Task, Theme};

use super::message::Message;

/// Main application
pub struct ChainSmithApp {
    /// Loaded samples in load order
    pub(crate) samples: Vec<SampleItem>,
    /// Index into `samples` shown in the waveform
    pub(crate) selected: Option<usize>,
    /// Waveform engine for the selected sample
    pub(crate) waveform: WaveformState,
    /// Preview output (disconnected when no device could be opened)
    pub(crate) player: Player,
    /// Keeps the output stream alive
    #[allow(dead_code)]
    output: Option<OutputHandle>,
    /// Settings loaded at startup
    pub(crate) config: Config,
    /// Info line: selected sample summary or last status
    pub(crate) info: String,
    /// An export is running in the background
    pub(crate) exporting: bool,
}

impl ChainSmithApp {
    /// Create a new application instance
    pub fn new() -> (Self, Task<Message>) {
        let config_path = config::default_config_path();
        let config = config::load_config(&config_path);

        let (player, output) = match start_output(&config.audio) {
            Ok((player, handle)) => {
                log::info!(
                    "Audio preview enabled on {} ({} Hz)",
                    handle.device_name(),
                    handle.sample_rate()
                );
                (player, Some(handle))
            }
            Err(e) => {
                log::warn!("Audio output not available: {} - preview disabled", e);
                (Player::disconnected(), None)
            }
        };

        (Self::with_output(config, player, output), Task::none())
    }

    /// Empty application state around an already opened (or disconnected) player
    pub(crate) fn with_output(config: Config, player: Player, output: Option<OutputHandle>) -> Self {
        Self {
            samples: Vec::new(),
            selected: None,
            waveform: WaveformState::new(config.view.clone()),
            player,
            output,
            config,
            info: String::new(),
            exporting: false,
        }
    }

    /// Application title
    pub fn title(&self) -> String {
        String::from("ChainSmith")
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Update state based on message
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFiles => self.handle_open_files(),
            Message::FilesChosen(paths) => self.handle_files_chosen(paths),
            Message::SamplesLoaded(results) => self.handle_samples_loaded(results),
            Message::SelectSample(index) => self.handle_select_sample(index),
            Message::Waveform(event) => self.handle_waveform_input(event),
            Message::Tick => self.handle_tick(),
            Message::Export => self.handle_export(),
            Message::ExportComplete(result) => self.handle_export_complete(result),
        }
    }

    /// Poll the playhead while playing
    pub fn subscription(&self) -> Subscription<Message> {
        use iced::time;
        use std::time::Duration;

        if self.waveform.is_playing() {
            let interval = Duration::from_millis(self.config.view.tick_interval_ms);
            time::every(interval).map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    /// Build the view
    pub fn view(&self) -> Element<'_, Message> {
        let waveform = waveform_view(&self.waveform, Message::Waveform);
        let scrollbar = scrollbar_view(self.waveform.scrollbar(), |value| {
            Message::Waveform(InputEvent::ScrollbarMoved(value))
        });

        let load_btn = button(text("Load…")).on_press(Message::OpenFiles);

        let transport = row![
            button(text("▶ Marker"))
                .on_press_maybe(self.waveform.buffer().map(|_| Message::Waveform(InputEvent::PlayFromMarker))),
            button(text("■ Stop")).on_press(Message::Waveform(InputEvent::Stop)),
        ]
        .spacing(8);

        let export_btn = button(text("Export .ot"))
            .on_press_maybe((!self.exporting).then_some(Message::Export));

        let zoom = row![
            button(text("Zoom In")).on_press(Message::Waveform(InputEvent::ZoomIn)),
            button(text("Zoom Out")).on_press(Message::Waveform(InputEvent::ZoomOut)),
        ]
        .spacing(8);

        column![
            waveform,
            scrollbar,
            load_btn,
            self.view_sample_list(),
            transport,
            export_btn,
            zoom,
            text(&self.info).size(14),
        ]
        .spacing(6)
        .padding(8)
        .into()
    }

    /// Loaded samples; clicking a row selects it
    fn view_sample_list(&self) -> Element<'_, Message> {
        let rows: Vec<Element<'_, Message>> = self
            .samples
            .iter()
            .enumerate()
            .map(|(index, item)| {
                button(text(&item.name).size(13))
                    .width(Length::Fill)
                    .style(if self.selected == Some(index) {
                        button::primary
                    } else {
                        button::text
                    })
                    .on_press(Message::SelectSample(index))
                    .into()
            })
            .collect();

        scrollable(Column::with_children(rows).spacing(2))
            .height(Length::Fill)
            .into()
    }
}
