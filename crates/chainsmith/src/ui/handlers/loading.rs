//! Sample loading message handlers
//!
//! Handles: OpenFiles, FilesChosen, SamplesLoaded, SelectSample

use std::path::PathBuf;

use chainsmith_core::audio_file::{SampleItem, SUPPORTED_EXTENSIONS};
use chainsmith_widgets::InputEvent;
use iced::Task;

use super::super::app::ChainSmithApp;
use super::super::message::Message;

impl ChainSmithApp {
    /// Handle OpenFiles message (multi-file dialog)
    pub fn handle_open_files(&mut self) -> Task<Message> {
        Task::perform(
            async {
                rfd::AsyncFileDialog::new()
                    .add_filter("Audio", &SUPPORTED_EXTENSIONS)
                    .pick_files()
                    .await
                    .map(|files| files.iter().map(|f| f.path().to_path_buf()).collect())
                    .unwrap_or_default()
            },
            Message::FilesChosen,
        )
    }

    /// Handle FilesChosen message: decode in the background
    pub fn handle_files_chosen(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        if paths.is_empty() {
            return Task::none();
        }

        log::info!("Loading {} file(s)", paths.len());
        self.info = format!("Loading {} file(s)…", paths.len());

        Task::perform(
            async move {
                let count = paths.len();
                tokio::task::spawn_blocking(move || {
                    paths
                        .iter()
                        .map(|path| SampleItem::load(path).map_err(|e| e.to_string()))
                        .collect::<Vec<_>>()
                })
                .await
                .unwrap_or_else(|e| vec![Err(format!("Decode task failed: {}", e)); count])
            },
            Message::SamplesLoaded,
        )
    }

    /// Handle SamplesLoaded message
    ///
    /// Appends decoded items; the first item is selected when the list was empty.
    pub fn handle_samples_loaded(&mut self, results: Vec<Result<SampleItem, String>>) -> Task<Message> {
        let was_empty = self.samples.is_empty();
        let mut failures = Vec::new();

        for result in results {
            match result {
                Ok(item) => {
                    log::info!("Loaded {}", item.summary());
                    self.samples.push(item);
                }
                Err(e) => {
                    log::warn!("Failed to load sample: {}", e);
                    failures.push(e);
                }
            }
        }

        if was_empty && !self.samples.is_empty() {
            let _ = self.handle_select_sample(0);
        }

        if let Some(status) = failure_status(&failures) {
            self.info = status;
        } else if !was_empty {
            self.info = self.selected_summary();
        }

        Task::none()
    }

    /// Handle SelectSample message: attach the item's buffer to the waveform
    pub fn handle_select_sample(&mut self, index: usize) -> Task<Message> {
        if index >= self.samples.len() {
            return Task::none();
        }

        if self.waveform.is_playing() {
            let _ = self.handle_waveform_input(InputEvent::Stop);
        }

        let item = &self.samples[index];
        self.waveform.attach(item.buffer.clone());
        self.selected = Some(index);
        self.info = item.summary();
        Task::none()
    }

    fn selected_summary(&self) -> String {
        self.selected
            .and_then(|i| self.samples.get(i))
            .map(SampleItem::summary)
            .unwrap_or_default()
    }
}

/// Info line for a batch with decode failures (None when all loaded)
fn failure_status(failures: &[String]) -> Option<String> {
    let first = failures.first()?;
    Some(match failures.len() {
        1 => first.clone(),
        n => format!("{} (and {} more failures)", first, n - 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainsmith_core::audio::Player;
    use chainsmith_core::config::Config;
    use chainsmith_core::AudioBuffer;

    fn app() -> ChainSmithApp {
        ChainSmithApp::with_output(Config::default(), Player::disconnected(), None)
    }

    fn item(name: &str) -> SampleItem {
        SampleItem {
            name: name.to_string(),
            path: PathBuf::from(format!("/samples/{}", name)),
            buffer: AudioBuffer::new(vec![0.1; 44100], 44100),
        }
    }

    #[test]
    fn test_failure_status() {
        assert_eq!(failure_status(&[]), None);
        assert_eq!(
            failure_status(&["bad.wav: unsupported".to_string()]),
            Some("bad.wav: unsupported".to_string())
        );
        let failures = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(
            failure_status(&failures),
            Some("a (and 2 more failures)".to_string())
        );
    }

    #[test]
    fn test_first_load_selects_first_item() {
        let mut app = app();
        let _ = app.handle_samples_loaded(vec![Ok(item("kick.wav")), Ok(item("snare.wav"))]);

        assert_eq!(app.samples.len(), 2);
        assert_eq!(app.selected, Some(0));
        assert_eq!(app.info, "kick.wav  1.00s");
        assert_eq!(
            app.waveform.buffer().map(|b| b.id()),
            Some(app.samples[0].buffer.id())
        );
    }

    #[test]
    fn test_later_load_keeps_selection() {
        let mut app = app();
        let _ = app.handle_samples_loaded(vec![Ok(item("kick.wav")), Ok(item("snare.wav"))]);
        let _ = app.handle_select_sample(1);

        let _ = app.handle_samples_loaded(vec![Ok(item("hat.wav"))]);
        assert_eq!(app.samples.len(), 3);
        assert_eq!(app.selected, Some(1));
        assert_eq!(app.info, "snare.wav  1.00s");
    }

    #[test]
    fn test_failures_reported_but_good_files_appended() {
        let mut app = app();
        let _ = app.handle_samples_loaded(vec![
            Err("one.wav: bad".to_string()),
            Ok(item("kick.wav")),
            Err("two.wav: bad".to_string()),
        ]);

        assert_eq!(app.samples.len(), 1);
        assert_eq!(app.selected, Some(0));
        assert_eq!(app.info, "one.wav: bad (and 1 more failures)");
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut app = app();
        let _ = app.handle_select_sample(3);
        assert_eq!(app.selected, None);
        assert!(app.waveform.buffer().is_none());
    }
}
