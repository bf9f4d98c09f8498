//! Downmix, smoothing and decimation to 8 kHz

use crate::audio::riff::ByteView;
use crate::audio::validate::{downsample_factor, validate};
use crate::audio::WavHeaderInfo;
use crate::error::{BoundsError, ValidationError};
use crate::processing::window::{rounded_mean, SampleWindow};

const BYTES_PER_SAMPLE: usize = 2;

/// Number of 8 kHz samples a validated input produces
pub fn output_len(info: &WavHeaderInfo) -> usize {
    let frame_bytes = info.num_channels as usize * BYTES_PER_SAMPLE;
    let factor = downsample_factor(info);
    if frame_bytes == 0 || factor == 0 {
        return 0;
    }
    info.data_size as usize / frame_bytes / factor
}

/// Lazily produces smoothed 8 kHz mono samples from the PCM payload
///
/// Every input frame is averaged across channels and pushed through a
/// [`SampleWindow`]; every `factor`-th frame (counting from the first) emits the
/// window mean. Frames after the last full output period are never read.
#[derive(Debug, Clone)]
pub struct Downsampler<'a> {
    view: ByteView<'a>,
    cursor: usize,
    data_end: usize,
    channels: usize,
    factor: usize,
    frame_index: usize,
    window: SampleWindow,
    produced: usize,
    total: usize,
}

impl<'a> Downsampler<'a> {
    pub fn new(bytes: &'a [u8], info: &WavHeaderInfo) -> Result<Self, ValidationError> {
        validate(info)?;
        Ok(Self {
            view: ByteView::new(bytes),
            cursor: info.data_offset,
            data_end: info.data_range().end,
            channels: info.num_channels as usize,
            factor: downsample_factor(info),
            frame_index: 0,
            window: SampleWindow::default(),
            produced: 0,
            total: output_len(info),
        })
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn produced(&self) -> usize {
        self.produced
    }

    pub fn is_finished(&self) -> bool {
        self.produced >= self.total
    }

    /// Average one interleaved frame down to a single sample
    fn read_frame(&self) -> Result<i32, BoundsError> {
        let mut sum = 0i64;
        for channel in 0..self.channels {
            let offset = self.cursor + channel * BYTES_PER_SAMPLE;
            if offset + BYTES_PER_SAMPLE > self.data_end {
                continue;
            }
            sum += self.view.i16_le(offset)? as i64;
        }
        Ok(rounded_mean(sum, self.channels))
    }

    /// Next smoothed sample, or `None` once all outputs are produced
    pub fn next_sample(&mut self) -> Result<Option<i16>, BoundsError> {
        while self.produced < self.total {
            let mono = self.read_frame()?;
            self.window.push(mono);

            let tick = self.frame_index % self.factor == 0;
            self.cursor += self.channels * BYTES_PER_SAMPLE;
            self.frame_index += 1;

            if tick {
                self.produced += 1;
                return Ok(Some(self.window.mean() as i16));
            }
        }
        Ok(None)
    }
}

impl Iterator for Downsampler<'_> {
    type Item = Result<i16, BoundsError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_sample().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.produced;
        (remaining, Some(remaining))
    }
}
