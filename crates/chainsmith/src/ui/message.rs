//! Application messages

use std::path::PathBuf;

use chainsmith_core::audio_file::SampleItem;
use chainsmith_core::export::ExportSummary;
use chainsmith_widgets::InputEvent;

#[derive(Debug, Clone)]
pub enum Message {
    // Loading
    OpenFiles,
    FilesChosen(Vec<PathBuf>),
    SamplesLoaded(Vec<Result<SampleItem, String>>),
    SelectSample(usize),

    // Waveform (canvas gestures, zoom/transport buttons, scrollbar)
    Waveform(InputEvent),

    // Playhead polling while playing
    Tick,

    // Export
    Export,
    ExportComplete(Result<ExportSummary, String>),
}
