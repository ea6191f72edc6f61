//! Audio file decoding
//!
//! Decodes WAV/AIFF/FLAC files with Symphonia into a normalized mono
//! [`AudioBuffer`]. Multi-channel sources are averaged to mono before they
//! ever reach the waveform engine.

use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use crate::types::{AudioBuffer, Sample};

/// File extensions offered in the open dialog
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["wav", "aif", "aiff", "flac"];

/// Audio file errors
#[derive(Error, Debug)]
pub enum AudioFileError {
    /// File not found or couldn't be opened
    #[error("Failed to open audio file: {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid or unsupported container/codec
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// File contains no decodable audio track
    #[error("No audio track found in {0}")]
    NoAudioTrack(PathBuf),

    /// Decoder failed part-way through the stream
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Result type for decode operations
pub type AudioFileResult<T> = Result<T, AudioFileError>;

/// A loaded sample: display name, source path and decoded audio
#[derive(Debug, Clone)]
pub struct SampleItem {
    /// File name shown in the sample list
    pub name: String,
    /// Source file (the `.ot` file is written next to it)
    pub path: PathBuf,
    /// Decoded mono audio
    pub buffer: AudioBuffer,
}

impl SampleItem {
    /// Decode `path` into a new sample item
    pub fn load<P: AsRef<Path>>(path: P) -> AudioFileResult<Self> {
        let path = path.as_ref();
        let buffer = load(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path: path.to_path_buf(),
            buffer,
        })
    }

    /// Info line text, e.g. `"kick.wav  1.25s"`
    pub fn summary(&self) -> String {
        format!("{}  {:.2}s", self.name, self.buffer.duration_seconds())
    }
}

/// Decode an audio file into a mono buffer
pub fn load<P: AsRef<Path>>(path: P) -> AudioFileResult<AudioBuffer> {
    let path = path.as_ref();
    let (interleaved, sample_rate, channels) = decode_interleaved(path)?;
    let mono = downmix_to_mono(&interleaved, channels);

    log::info!(
        "Decoded {:?}: {} frames, {} channel(s), {} Hz",
        path,
        mono.len(),
        channels,
        sample_rate
    );

    Ok(AudioBuffer::new(mono, sample_rate))
}

/// Average interleaved frames down to a single channel
///
/// A trailing partial frame is ignored.
pub fn downmix_to_mono(interleaved: &[Sample], channels: usize) -> Vec<Sample> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.to_vec(),
        n => interleaved
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<Sample>() / n as Sample)
            .collect(),
    }
}

/// Decode every packet of the first audio track to interleaved f32
fn decode_interleaved(path: &Path) -> AudioFileResult<(Vec<Sample>, u32, usize)> {
    let file = File::open(path).map_err(|e| AudioFileError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AudioFileError::UnsupportedFormat(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioFileError::NoAudioTrack(path.to_path_buf()))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioFileError::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<Sample> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(AudioFileError::Decode {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                // Corrupt packet: skip it and keep the rest of the file
                log::warn!("Skipping undecodable packet in {:?}: {}", path, e);
                continue;
            }
            Err(e) => {
                return Err(AudioFileError::Decode {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        let spec = *decoded.spec();
        if sample_rate == 0 {
            sample_rate = spec.rate;
        }
        if channels == 0 {
            channels = spec.channels.count();
        }

        let capacity = decoded.capacity() as u64;
        let too_small = sample_buf
            .as_ref()
            .map_or(true, |buf| (buf.capacity() as u64) < capacity * spec.channels.count() as u64);
        if too_small {
            sample_buf = Some(SampleBuffer::new(capacity, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    Ok((samples, sample_rate, channels.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, frames: &[Vec<i16>]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &s in frame {
                writer.write_sample(s).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_downmix_averages_channels() {
        let stereo = [1.0, 0.0, 0.5, -0.5, -1.0, -1.0];
        assert_eq!(downmix_to_mono(&stereo, 2), vec![0.5, 0.0, -1.0]);
        assert_eq!(downmix_to_mono(&stereo, 1), stereo.to_vec());
        assert!(downmix_to_mono(&stereo, 0).is_empty());
    }

    #[test]
    fn test_downmix_drops_partial_frame() {
        let odd = [0.2, 0.4, 0.6];
        assert_eq!(downmix_to_mono(&odd, 2).len(), 1);
    }

    #[test]
    fn test_load_stereo_wav_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.wav");
        let frames: Vec<Vec<i16>> = (0..1000).map(|_| vec![i16::MAX / 2, 0]).collect();
        write_wav(&path, 2, &frames);

        let item = SampleItem::load(&path).unwrap();
        assert_eq!(item.name, "loop.wav");
        assert_eq!(item.buffer.sample_rate(), 22050);
        assert_eq!(item.buffer.len(), 1000);

        // Left at ~0.5, right silent: mono average ~0.25
        let first = item.buffer.samples()[0];
        assert!((first - 0.25).abs() < 0.01, "got {first}");
        assert!(item.summary().starts_with("loop.wav  0.05s"));
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = load("/nonexistent/chainsmith/missing.wav").unwrap_err();
        assert!(matches!(err, AudioFileError::Open { .. }));
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"definitely not a riff file").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, AudioFileError::UnsupportedFormat(_)));
    }
}
