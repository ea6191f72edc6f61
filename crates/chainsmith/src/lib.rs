//! ChainSmith - prepares samples for the Elektron Octatrack
//!
//! Load audio files, inspect them in a zoomable waveform, audition from a
//! marker, and write the `.ot` attribute file (with estimated tempo) next to
//! each sample.

pub mod ui;
