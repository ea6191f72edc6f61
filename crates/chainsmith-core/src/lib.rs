//! ChainSmith Core - Shared library for the sample-chain authoring tool
//!
//! Everything here is independent of the GUI toolkit:
//!
//! - [`types`]: mono audio buffers with stable identity tokens
//! - [`audio_file`]: decoding WAV/AIFF/FLAC into mono buffers
//! - [`analysis`]: tempo estimation for the export header
//! - [`audio`]: preview playback through the default output device
//! - [`export`]: the Octatrack `.ot` attribute file writer
//! - [`config`]: YAML application settings

pub mod analysis;
pub mod audio;
pub mod audio_file;
pub mod config;
pub mod export;
pub mod types;

pub use types::*;
