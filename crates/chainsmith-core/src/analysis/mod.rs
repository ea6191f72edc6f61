//! Audio analysis
//!
//! Only tempo estimation is needed: the `.ot` header stores the sample's
//! tempo so the sampler can time-stretch and sync slices. The detection itself
//! is done by `stratum-dsp`; this module narrows its result to the integer BPM
//! the header stores.

mod tempo;

pub use tempo::{estimate_tempo, TempoConfig};

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Error, Debug, Clone)]
pub enum AnalysisError {
    /// Analyzer ran but found no usable tempo (e.g. a one-shot or silence)
    #[error("No tempo detected")]
    NoTempo,

    /// Invalid parameters
    #[error("Invalid analysis parameter: {0}")]
    InvalidInput(String),

    /// Failure reported by the analysis engine
    #[error("Analysis engine error: {0}")]
    Engine(#[from] stratum_dsp::AnalysisError),
}
