//! Message handlers organized by feature domain
//!
//! Each sub-module provides handler methods on ChainSmithApp.

pub mod export;
pub mod loading;
pub mod tick;
pub mod waveform;
