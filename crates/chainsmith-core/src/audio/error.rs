//! Audio output error types

use thiserror::Error;

/// Errors that can occur while opening the output device
#[derive(Error, Debug)]
pub enum AudioError {
    /// Host has no default output device
    #[error("Failed to get default audio device: {0}")]
    NoDefaultDevice(String),

    /// Configured device name did not match any output device
    #[error("Audio device not found: {0}")]
    DeviceNotFound(String),

    /// Failed to query the device configuration
    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    /// Device only offers a sample format the player cannot render
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Failed to build audio stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuildError(String),

    /// Failed to start stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlayError(String),
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;
