//! Export message handlers
//!
//! Handles: Export, ExportComplete

use chainsmith_core::export::{export_sample, ExportError, ExportSummary};
use iced::Task;

use super::super::app::ChainSmithApp;
use super::super::message::Message;

impl ChainSmithApp {
    /// Handle Export message: estimate tempo and write the `.ot` in the background
    pub fn handle_export(&mut self) -> Task<Message> {
        let Some(item) = self.selected.and_then(|i| self.samples.get(i)).cloned() else {
            log::warn!("Export requested with no sample selected");
            self.info = ExportError::NoSampleLoaded.to_string();
            return Task::none();
        };

        self.exporting = true;
        self.info = format!("Analyzing {}…", item.name);
        let tempo = self.config.analysis.clone();

        Task::perform(
            async move {
                tokio::task::spawn_blocking(move || {
                    export_sample(Some(&item), &tempo).map_err(|e| e.to_string())
                })
                .await
                .unwrap_or_else(|e| Err(format!("Export task failed: {}", e)))
            },
            Message::ExportComplete,
        )
    }

    /// Handle ExportComplete message
    pub fn handle_export_complete(&mut self, result: Result<ExportSummary, String>) -> Task<Message> {
        self.exporting = false;
        self.info = match result {
            Ok(summary) => {
                log::info!("Export complete: {:?} at {} BPM", summary.path, summary.bpm);
                summary.status_text()
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                format!("Export failed: {}", e)
            }
        };
        Task::none()
    }
}
