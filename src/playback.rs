//! Audio playback of mu-law samples through cpal
//!
//! Decoded 8 kHz samples are held and repeated to reach the device rate, and
//! written to every output channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::header::OUTPUT_SAMPLE_RATE;
use crate::codec::mulaw;
use crate::error::{ConversionError, Result};

/// Cursor over decoded samples at the device rate
struct PlaybackSource {
    samples: Vec<f32>,
    position: f64,
    step: f64,
    channels: usize,
    finished: Arc<AtomicBool>,
}

impl PlaybackSource {
    fn new(encoded: &[u8], device_rate: u32, channels: usize, finished: Arc<AtomicBool>) -> Self {
        let samples = encoded
            .iter()
            .map(|&byte| mulaw::decode(byte) as f32 / 32768.0)
            .collect();
        Self {
            samples,
            position: 0.0,
            step: OUTPUT_SAMPLE_RATE as f64 / device_rate.max(1) as f64,
            channels: channels.max(1),
            finished,
        }
    }

    /// Fill interleaved frames, silence once exhausted
    fn fill<T>(&mut self, data: &mut [T], convert: impl Fn(f32) -> T) {
        for frame in data.chunks_mut(self.channels) {
            let index = self.position as usize;
            let value = match self.samples.get(index) {
                Some(&sample) => {
                    self.position += self.step;
                    sample
                }
                None => {
                    self.finished.store(true, Ordering::SeqCst);
                    0.0
                }
            };
            for out in frame.iter_mut() {
                *out = convert(value);
            }
        }
    }
}

/// Play encoded samples on the default output device and block until done
pub fn play_mulaw(encoded: &[u8]) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| ConversionError::playback("No audio output device available"))?;
    let supported = device
        .default_output_config()
        .map_err(|e| ConversionError::playback(format!("Failed to get default output config: {}", e)))?;

    let sample_format = supported.sample_format();
    let config: cpal::StreamConfig = supported.into();
    let finished = Arc::new(AtomicBool::new(false));
    let mut source = PlaybackSource::new(encoded, config.sample_rate.0, config.channels as usize, finished.clone());

    log::debug!(
        "Playback: {} samples on {} Hz x{} ({:?})",
        encoded.len(), config.sample_rate.0, config.channels, sample_format
    );

    let err_fn = |err: cpal::StreamError| log::error!("Audio stream error: {}", err);
    let stream = match sample_format {
        cpal::SampleFormat::F32 => device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| source.fill(data, |v| v),
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_output_stream(
            &config,
            move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                source.fill(data, |v| (v * 32767.0).clamp(-32768.0, 32767.0) as i16)
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::U16 => device.build_output_stream(
            &config,
            move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                source.fill(data, |v| (v * 32767.0 + 32768.0).clamp(0.0, 65535.0) as u16)
            },
            err_fn,
            None,
        ),
        other => {
            return Err(ConversionError::playback(format!("Unsupported sample format: {:?}", other)));
        }
    }
    .map_err(|e| ConversionError::playback(format!("Failed to build audio stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| ConversionError::playback(format!("Failed to play audio stream: {}", e)))?;

    while !finished.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(20));
    }
    // Let the device drain its last buffer
    std::thread::sleep(Duration::from_millis(100));
    Ok(())
}
