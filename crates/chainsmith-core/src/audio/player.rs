//! CPAL preview player
//!
//! `play(buffer, start_sample)` always interrupts whatever is playing and
//! starts from the given offset; `stop()` silences the output on the next
//! callback. The output device may run at a different rate than the buffer:
//! the read cursor then advances by `buffer_rate / device_rate` per frame and
//! the nearest sample is emitted. Mono is copied to every output channel.

use std::sync::Arc;

use basedrop::Shared;
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{FromSample, Sample as CpalSample, SampleFormat, SizedSample, Stream, StreamConfig};

use super::device::find_output_device;
use super::error::{AudioError, AudioResult};
use super::gc::gc_handle;
use super::AudioConfig;
use crate::types::{AudioBuffer, Sample};

/// Capacity of the UI → audio command queue
const COMMAND_QUEUE_SIZE: usize = 64;

/// Sample data owned by the audio thread while it plays
pub struct PlaybackSource {
    samples: Arc<[Sample]>,
    sample_rate: u32,
}

impl PlaybackSource {
    pub fn new(samples: Arc<[Sample]>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }
}

/// Commands sent from the UI to the audio thread
pub enum PlayerCommand {
    /// Replace the current source and start at `start_sample`
    Play {
        source: Box<Shared<PlaybackSource>>,
        start_sample: usize,
    },
    /// Silence output and drop the current source
    Stop,
}

/// Create a player command channel
pub fn player_command_channel() -> (rtrb::Producer<PlayerCommand>, rtrb::Consumer<PlayerCommand>) {
    rtrb::RingBuffer::new(COMMAND_QUEUE_SIZE)
}

/// Command sender held by the UI thread
struct CommandSender {
    producer: rtrb::Producer<PlayerCommand>,
}

impl CommandSender {
    /// Returns the command back if the queue is full
    fn send(&mut self, cmd: PlayerCommand) -> Result<(), PlayerCommand> {
        self.producer.push(cmd).map_err(|e| match e {
            rtrb::PushError::Full(value) => value,
        })
    }
}

/// Audio-thread side of the player
pub struct PlayerProcessor {
    command_rx: rtrb::Consumer<PlayerCommand>,
    source: Option<Shared<PlaybackSource>>,
    /// Fractional read position in source samples
    cursor: f64,
    /// Source samples consumed per output frame
    step: f64,
    device_rate: u32,
    playing: bool,
}

impl PlayerProcessor {
    fn new(command_rx: rtrb::Consumer<PlayerCommand>, device_rate: u32) -> Self {
        Self {
            command_rx,
            source: None,
            cursor: 0.0,
            step: 1.0,
            device_rate: device_rate.max(1),
            playing: false,
        }
    }

    /// Drain pending commands (call once per callback, before rendering)
    fn process_commands(&mut self) {
        while let Ok(cmd) = self.command_rx.pop() {
            match cmd {
                PlayerCommand::Play {
                    source,
                    start_sample,
                } => {
                    self.step = source.sample_rate as f64 / self.device_rate as f64;
                    self.cursor = start_sample as f64;
                    self.playing = start_sample < source.samples.len();
                    // Previous source (if any) is dropped here; basedrop defers the free
                    self.source = Some(*source);
                }
                PlayerCommand::Stop => {
                    self.playing = false;
                    self.source = None;
                }
            }
        }
    }

    /// Next output value, advancing the read cursor
    fn next_sample(&mut self) -> Sample {
        if !self.playing {
            return 0.0;
        }
        let Some(source) = self.source.as_ref() else {
            self.playing = false;
            return 0.0;
        };

        let index = self.cursor.round() as usize;
        match source.samples.get(index) {
            Some(&value) => {
                self.cursor += self.step;
                value
            }
            None => {
                self.playing = false;
                0.0
            }
        }
    }

    /// Render one callback's worth of interleaved frames
    pub fn render<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: SizedSample + FromSample<f32>,
    {
        self.process_commands();
        for frame in data.chunks_mut(channels.max(1)) {
            let value = T::from_sample(self.next_sample());
            frame.fill(value);
        }
    }
}

/// Preview player handle for the UI thread
///
/// A disconnected player (no output device) accepts every call and does
/// nothing.
pub struct Player {
    /// Command sender for the audio thread (None if disconnected)
    command_sender: Option<CommandSender>,
}

impl Player {
    fn new(producer: rtrb::Producer<PlayerCommand>) -> Self {
        Self {
            command_sender: Some(CommandSender { producer }),
        }
    }

    /// A player without an output device
    pub fn disconnected() -> Self {
        Self {
            command_sender: None,
        }
    }

    /// Start playing `buffer` from `start_sample`, interrupting any current playback
    pub fn play(&mut self, buffer: &AudioBuffer, start_sample: usize) {
        let Some(ref mut sender) = self.command_sender else {
            log::debug!("Player disconnected, ignoring play from {}", start_sample);
            return;
        };

        let source = Shared::new(
            &gc_handle(),
            PlaybackSource::new(buffer.shared_samples(), buffer.sample_rate()),
        );
        let cmd = PlayerCommand::Play {
            source: Box::new(source),
            start_sample,
        };

        match sender.send(cmd) {
            Ok(()) => log::info!(
                "Player: play {} from sample {} of {}",
                buffer.id(),
                start_sample,
                buffer.len()
            ),
            Err(_) => log::warn!("Player command queue full, play dropped"),
        }
    }

    /// Stop playback immediately
    pub fn stop(&mut self) {
        if let Some(ref mut sender) = self.command_sender {
            if sender.send(PlayerCommand::Stop).is_err() {
                log::warn!("Player command queue full, stop dropped");
            }
        }
    }
}

/// Keeps the output stream alive; drop it to close the device
pub struct OutputHandle {
    _stream: Stream,
    device_name: String,
    sample_rate: u32,
}

impl OutputHandle {
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Open the configured output device and start the playback stream
pub fn start_output(config: &AudioConfig) -> AudioResult<(Player, OutputHandle)> {
    let device = find_output_device(config.device.as_deref())?;
    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("Using audio device: {}", device_name);

    let supported = device
        .default_output_config()
        .map_err(|e| AudioError::ConfigError(e.to_string()))?;
    let sample_format = supported.sample_format();
    let stream_config: StreamConfig = supported.config();
    let sample_rate = stream_config.sample_rate.0;

    log::info!(
        "Audio config: {} channels, {}Hz, {:?}",
        stream_config.channels,
        sample_rate,
        sample_format
    );

    let (producer, consumer) = player_command_channel();
    let processor = PlayerProcessor::new(consumer, sample_rate);

    let stream = match sample_format {
        SampleFormat::F32 => build_output_stream::<f32>(&device, &stream_config, processor)?,
        SampleFormat::I16 => build_output_stream::<i16>(&device, &stream_config, processor)?,
        SampleFormat::U16 => build_output_stream::<u16>(&device, &stream_config, processor)?,
        other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
    };

    stream
        .play()
        .map_err(|e| AudioError::StreamPlayError(e.to_string()))?;

    log::info!("Playback stream started");

    Ok((
        Player::new(producer),
        OutputHandle {
            _stream: stream,
            device_name,
            sample_rate,
        },
    ))
}

fn build_output_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut processor: PlayerProcessor,
) -> AudioResult<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _info: &cpal::OutputCallbackInfo| {
                processor.render(data, channels);
            },
            move |err| {
                log::error!("Playback stream error: {}", err);
            },
            None,
        )
        .map_err(|e| AudioError::StreamBuildError(e.to_string()))
}
