//! Conversion pipeline
//!
//! A [`Conversion`] owns everything one run needs: the parsed header, the
//! downsampler with its smoothing window, and the output buffer. It is driven in
//! batches through [`Conversion::advance`], so a host can interleave other work
//! between batches, or run to completion with [`Conversion::run`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::audio::converter::Downsampler;
use crate::audio::header;
use crate::audio::riff;
use crate::audio::validate::{validate, validate_strict};
use crate::audio::WavHeaderInfo;
use crate::codec::mulaw;
use crate::error::{ConversionError, Result};
use crate::processing::progress::{percent, ProgressReporter};

pub const DEFAULT_BATCH_SIZE: usize = 4096;

/// Shared flag checked between batches
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Also require a canonical 16-byte `fmt ` chunk
    pub strict: bool,
    /// Output samples produced per [`Conversion::advance`] call
    pub batch_size: usize,
    pub cancel: Option<CancelToken>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            strict: false,
            batch_size: DEFAULT_BATCH_SIZE,
            cancel: None,
        }
    }
}

/// Source properties surfaced to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMetadata {
    /// Bits per second
    pub bit_rate: u64,
    pub channels: u16,
    /// Hz
    pub sample_rate: u32,
    /// Bits per sample
    pub sample_size: u16,
    pub duration_seconds: f64,
    /// Length of the original file in bytes
    pub file_size: usize,
}

impl AudioMetadata {
    pub fn from_header(info: &WavHeaderInfo, file_size: usize) -> Self {
        Self {
            bit_rate: info.byte_rate as u64 * 8,
            channels: info.num_channels,
            sample_rate: info.sample_rate,
            sample_size: info.bits_per_sample,
            duration_seconds: info.duration_seconds(),
            file_size,
        }
    }
}

impl fmt::Display for AudioMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bit rate: {} bps", self.bit_rate)?;
        writeln!(f, "Channels: {}", self.channels)?;
        writeln!(f, "Sample rate: {} Hz", self.sample_rate)?;
        writeln!(f, "Sample size: {} bit", self.sample_size)?;
        writeln!(f, "Duration: {:.2}s", self.duration_seconds)?;
        write!(f, "File size: {} bytes", self.file_size)
    }
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// 8 kHz mono mu-law samples, no header
    pub encoded: Vec<u8>,
    pub metadata: AudioMetadata,
}

impl ConversionResult {
    /// Encoded samples behind a canonical mu-law WAV header
    pub fn to_wav(&self) -> Vec<u8> {
        header::wrap(&self.encoded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Pending,
    Complete,
}

/// One in-flight conversion over a borrowed input buffer
#[derive(Debug)]
pub struct Conversion<'a> {
    info: WavHeaderInfo,
    metadata: AudioMetadata,
    downsampler: Downsampler<'a>,
    encoded: Vec<u8>,
    batch_size: usize,
    cancel: Option<CancelToken>,
}

impl<'a> Conversion<'a> {
    /// Parse and validate `bytes`; nothing is encoded yet
    pub fn new(bytes: &'a [u8], options: &ConversionOptions) -> Result<Self> {
        let info = riff::parse(bytes)?;
        if options.strict {
            validate_strict(&info)?;
        } else {
            validate(&info)?;
        }

        let downsampler = Downsampler::new(bytes, &info)?;
        let total = downsampler.total();

        log::debug!(
            "Conversion: {}Hz {}ch -> 8000Hz mono, factor {}, {} output samples",
            info.sample_rate, info.num_channels, downsampler.factor(), total
        );

        Ok(Self {
            metadata: AudioMetadata::from_header(&info, bytes.len()),
            info,
            downsampler,
            encoded: Vec::with_capacity(total),
            batch_size: options.batch_size.max(1),
            cancel: options.cancel.clone(),
        })
    }

    pub fn header(&self) -> &WavHeaderInfo {
        &self.info
    }

    pub fn metadata(&self) -> &AudioMetadata {
        &self.metadata
    }

    /// Total number of samples this conversion produces
    pub fn total(&self) -> usize {
        self.downsampler.total()
    }

    pub fn produced(&self) -> usize {
        self.encoded.len()
    }

    /// Encode up to one batch of samples, reporting progress after each
    pub fn advance<P: ProgressReporter + ?Sized>(&mut self, progress: &mut P) -> Result<Step> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            log::warn!("Conversion cancelled after {}/{} samples", self.encoded.len(), self.total());
            return Err(ConversionError::Cancelled);
        }

        let total = self.total();
        for _ in 0..self.batch_size {
            match self.downsampler.next_sample()? {
                Some(sample) => {
                    self.encoded.push(mulaw::encode(sample));
                    progress.report(percent(self.encoded.len(), total));
                }
                None => return Ok(Step::Complete),
            }
        }

        if self.downsampler.is_finished() {
            Ok(Step::Complete)
        } else {
            Ok(Step::Pending)
        }
    }

    /// Drive the conversion to completion, yielding the thread between batches
    pub fn run<P: ProgressReporter + ?Sized>(mut self, progress: &mut P) -> Result<ConversionResult> {
        while self.advance(progress)? == Step::Pending {
            std::thread::yield_now();
        }
        Ok(self.into_result())
    }

    /// Finish a conversion whose last [`Conversion::advance`] returned [`Step::Complete`]
    pub fn into_result(self) -> ConversionResult {
        debug_assert_eq!(self.encoded.len(), self.downsampler.total());
        ConversionResult {
            encoded: self.encoded,
            metadata: self.metadata,
        }
    }
}

/// Convert a WAV file held in memory
pub fn convert<P: ProgressReporter>(bytes: &[u8], options: &ConversionOptions, mut on_progress: P) -> Result<ConversionResult> {
    Conversion::new(bytes, options)?.run(&mut on_progress)
}

/// Encoded mu-law samples for `bytes` with default options
pub fn encode<P: ProgressReporter>(bytes: &[u8], on_progress: P) -> Result<Vec<u8>> {
    convert(bytes, &ConversionOptions::default(), on_progress).map(|result| result.encoded)
}

/// Parse and describe a file without converting it
pub fn inspect(bytes: &[u8]) -> Result<(WavHeaderInfo, AudioMetadata)> {
    let info = riff::parse(bytes)?;
    Ok((info, AudioMetadata::from_header(&info, bytes.len())))
}
