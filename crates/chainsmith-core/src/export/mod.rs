//! Export of sampler attribute files
//!
//! [`export_sample`] is what the "Export .ot" action runs: estimate the tempo of
//! the selected sample and write its `.ot` file next to the source. Samples
//! without a detectable tempo (one-shots, very short loops) are still exported
//! with the configured fallback tempo.

mod ot;

use std::path::PathBuf;

use thiserror::Error;

use crate::analysis::{estimate_tempo, TempoConfig};
use crate::audio_file::SampleItem;

pub use ot::{
    checksum, encode, ot_path_for, write_ot, Slice, CHECKSUM_OFFSET, MAX_SLICES, OT_SIZE,
    SLICE_COUNT_OFFSET, SLICE_ENTRY_SIZE, SLICE_TABLE_OFFSET,
};

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing selected
    #[error("No sample loaded")]
    NoSampleLoaded,

    /// Slice table would overflow into the count field
    #[error("Too many slices: {count} (maximum {max})")]
    TooManySlices { count: usize, max: usize },

    /// Tempo does not fit the header field
    #[error("Tempo out of range: {0} BPM")]
    TempoOutOfRange(u32),

    /// Writing the file failed
    #[error("Failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// What was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub bpm: u32,
    /// False when `bpm` is the fallback because no tempo was detected
    pub detected: bool,
}

impl ExportSummary {
    /// Status line text, e.g. `"Saved loop.ot  (BPM 120)"`
    pub fn status_text(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        if self.detected {
            format!("Saved {}  (BPM {})", name, self.bpm)
        } else {
            format!("Saved {}  (BPM {}, no tempo detected)", name, self.bpm)
        }
    }
}

/// Estimate the tempo of `item` and write its `.ot` file (no slices)
pub fn export_sample(item: Option<&SampleItem>, tempo: &TempoConfig) -> ExportResult<ExportSummary> {
    let item = item.ok_or(ExportError::NoSampleLoaded)?;
    let buffer = &item.buffer;

    let (bpm, detected) = match estimate_tempo(buffer.samples(), buffer.sample_rate(), tempo) {
        Ok(bpm) => {
            log::info!("export_sample: {} estimated at {} BPM", item.name, bpm);
            (bpm, true)
        }
        Err(e) => {
            log::warn!(
                "export_sample: {}: {}, writing fallback tempo {}",
                item.name,
                e,
                tempo.fallback_bpm
            );
            (tempo.fallback_bpm, false)
        }
    };

    let path = write_ot(&item.path, bpm, &[])?;
    Ok(ExportSummary { path, bpm, detected })
}
