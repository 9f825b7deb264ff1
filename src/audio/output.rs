// Tone output - Lazily opened CPAL stream fed through a lock-free channel
//
// The stream is opened on first use (the start button, or the first tone)
// and kept for the rest of the session. Failures are logged and swallowed:
// the timer keeps running silently.
//
// Note: on macOS the CPAL Stream is not Send, so the output lives on the
// thread that created it (the UI thread).

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use ringbuf::traits::{Consumer, Producer};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use super::device::OutputDeviceManager;
use super::format_conversion::write_mono_to_frame;
use super::status::{AtomicStreamStatus, StreamStatus};
use super::tone::{Tone, ToneSink};
use super::voice::ToneVoice;
use crate::messaging::channels::{ToneConsumer, ToneProducer, create_tone_channel};

/// Pending tones between two audio callbacks
const TONE_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Output configuration error: {0}")]
    Config(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to build output stream: {0}")]
    Build(String),

    #[error("Failed to start output stream: {0}")]
    Play(String),
}

/// Master volume shared with the audio callback
#[derive(Clone, Debug)]
pub struct SharedVolume {
    inner: Arc<AtomicU32>,
}

impl SharedVolume {
    pub fn new(value: f32) -> Self {
        Self {
            inner: Arc::new(AtomicU32::new(value.clamp(0.0, 1.0).to_bits())),
        }
    }

    pub fn set(&self, value: f32) {
        self.inner
            .store(value.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.inner.load(Ordering::Relaxed))
    }
}

struct ActiveStream {
    _stream: Stream,
    producer: ToneProducer,
}

/// The session's single audio output
pub struct ToneOutput {
    device_name: Option<String>,
    volume: SharedVolume,
    status: AtomicStreamStatus,
    active: Option<ActiveStream>,
}

impl ToneOutput {
    /// Describe the output; nothing is opened yet
    pub fn new(device_name: Option<String>, volume: f32) -> Self {
        Self {
            device_name,
            volume: SharedVolume::new(volume),
            status: AtomicStreamStatus::default(),
            active: None,
        }
    }

    pub fn status(&self) -> StreamStatus {
        self.status.get()
    }

    pub fn volume(&self) -> f32 {
        self.volume.get()
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume.set(volume);
    }

    /// Handle for reading the stream status from another owner
    pub fn status_handle(&self) -> AtomicStreamStatus {
        self.status.clone()
    }

    /// Handle for adjusting the volume from another owner
    pub fn volume_handle(&self) -> SharedVolume {
        self.volume.clone()
    }

    /// Open the stream unless a healthy one already exists
    pub fn open(&mut self) -> Result<(), AudioError> {
        if self.active.is_some() && self.status.get() == StreamStatus::Open {
            return Ok(());
        }

        // A stream that reported an error is dropped and rebuilt
        self.active = None;

        match self.build() {
            Ok(active) => {
                self.active = Some(active);
                self.status.set(StreamStatus::Open);
                Ok(())
            }
            Err(e) => {
                self.status.set(StreamStatus::Unavailable);
                Err(e)
            }
        }
    }

    fn build(&self) -> Result<ActiveStream, AudioError> {
        let manager = OutputDeviceManager::new();
        let device = manager
            .output_device(self.device_name.as_deref())
            .ok_or(AudioError::NoDevice)?;

        log::info!(
            "Audio output: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported_config = device
            .default_output_config()
            .map_err(|e| AudioError::Config(e.to_string()))?;
        let sample_format = supported_config.sample_format();
        let config: StreamConfig = supported_config.into();
        log::debug!("Output config: {:?}, format {:?}", config, sample_format);

        let (producer, consumer) = create_tone_channel(TONE_CHANNEL_CAPACITY);

        let stream = match sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(&device, &config, consumer),
            SampleFormat::I16 => self.build_stream::<i16>(&device, &config, consumer),
            SampleFormat::U16 => self.build_stream::<u16>(&device, &config, consumer),
            other => Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        }?;

        stream.play().map_err(|e| AudioError::Play(e.to_string()))?;

        Ok(ActiveStream {
            _stream: stream,
            producer,
        })
    }

    fn build_stream<T>(
        &self,
        device: &Device,
        config: &StreamConfig,
        mut consumer: ToneConsumer,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;
        let mut voice = ToneVoice::new(config.sample_rate.0 as f32);
        let volume = self.volume.clone();
        let status = self.status.clone();

        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    // Realtime: no allocation, no locks
                    while let Some(tone) = consumer.try_pop() {
                        voice.start(tone);
                    }

                    let gain = volume.get();
                    for frame in data.chunks_mut(channels) {
                        let sample = voice.next_sample() * gain;
                        write_mono_to_frame(sample, frame);
                    }
                },
                move |err| {
                    log::error!("Audio stream error: {}", err);
                    status.set(StreamStatus::Error);
                },
                None,
            )
            .map_err(|e| AudioError::Build(e.to_string()))
    }
}

impl ToneSink for ToneOutput {
    fn ensure_ready(&mut self) {
        if let Err(e) = self.open() {
            log::warn!("Audio unavailable, continuing silently: {}", e);
        }
    }

    fn play_tone(&mut self, tone: Tone) {
        // Retrying a refused device is left to the next user interaction
        if self.status.get() != StreamStatus::Unavailable {
            self.ensure_ready();
        }
        if let Some(active) = self.active.as_mut()
            && active.producer.try_push(tone).is_err()
        {
            log::debug!("Tone queue full, dropping {:?}", tone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_volume_clamps() {
        let volume = SharedVolume::new(1.5);
        assert_eq!(volume.get(), 1.0);

        let callback_side = volume.clone();
        volume.set(0.25);
        assert_eq!(callback_side.get(), 0.25);

        volume.set(-1.0);
        assert_eq!(volume.get(), 0.0);
    }

    #[test]
    fn test_output_is_not_opened_eagerly() {
        let output = ToneOutput::new(None, 0.8);
        assert_eq!(output.status(), StreamStatus::Closed);
        assert_eq!(output.volume(), 0.8);
    }

    #[test]
    fn test_handles_share_state() {
        let output = ToneOutput::new(None, 0.5);
        output.volume_handle().set(0.2);
        assert_eq!(output.volume(), 0.2);

        output.status_handle().set(StreamStatus::Unavailable);
        assert_eq!(output.status(), StreamStatus::Unavailable);
    }
}
