//! RIFF/WAVE container parsing
//!
//! Walks the chunk list of an in-memory WAV file and extracts the fields of the
//! `fmt ` chunk together with the location of the `data` payload. The parser does
//! not judge whether the format can be converted; see [`crate::audio::validate`].

use crate::error::{BoundsError, FormatError};

/// Offset of the first chunk after the `fmt ` chunk header
const FMT_BODY_OFFSET: usize = 20;

/// Header fields of a parsed WAV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeaderInfo {
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub byte_rate: u32,
    pub block_align: u16,
    pub fmt_chunk_size: u32,
    /// Start of the sample payload, just past the `data` chunk header
    pub data_offset: usize,
    pub data_size: u32,
}

impl WavHeaderInfo {
    /// Byte range of the sample payload inside the original buffer
    pub fn data_range(&self) -> std::ops::Range<usize> {
        self.data_offset..self.data_offset + self.data_size as usize
    }

    pub fn frame_bytes(&self) -> usize {
        (self.bits_per_sample as usize / 8) * self.num_channels as usize
    }

    pub fn frame_count(&self) -> usize {
        match self.frame_bytes() {
            0 => 0,
            n => self.data_size as usize / n,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.byte_rate == 0 {
            return 0.0;
        }
        self.data_size as f64 / self.byte_rate as f64
    }
}

/// Bounds-checked little-endian reads over a byte slice
#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteView<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], BoundsError> {
        let err = BoundsError { offset, len, available: self.bytes.len() };
        let end = offset.checked_add(len).ok_or(err)?;
        self.bytes.get(offset..end).ok_or(err)
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], BoundsError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(offset, N)?);
        Ok(out)
    }

    pub fn tag(&self, offset: usize) -> Result<[u8; 4], BoundsError> {
        self.array(offset)
    }

    pub fn u16_le(&self, offset: usize) -> Result<u16, BoundsError> {
        self.array(offset).map(u16::from_le_bytes)
    }

    pub fn i16_le(&self, offset: usize) -> Result<i16, BoundsError> {
        self.array(offset).map(i16::from_le_bytes)
    }

    pub fn u32_le(&self, offset: usize) -> Result<u32, BoundsError> {
        self.array(offset).map(u32::from_le_bytes)
    }
}

/// Parse the RIFF/WAVE header of `bytes`
pub fn parse(bytes: &[u8]) -> Result<WavHeaderInfo, FormatError> {
    let view = ByteView::new(bytes);

    if view.tag(0)? != *b"RIFF" {
        return Err(FormatError::NotRiff);
    }
    if view.tag(8)? != *b"WAVE" {
        return Err(FormatError::NotWave);
    }
    if view.tag(12)? != *b"fmt " {
        return Err(FormatError::MissingFmt);
    }

    let fmt_chunk_size = view.u32_le(16)?;
    let audio_format = view.u16_le(20)?;
    let num_channels = view.u16_le(22)?;
    let sample_rate = view.u32_le(24)?;
    let byte_rate = view.u32_le(28)?;
    let block_align = view.u16_le(32)?;
    let bits_per_sample = view.u16_le(34)?;

    let (data_offset, data_size) = find_data_chunk(&view, FMT_BODY_OFFSET as u64 + fmt_chunk_size as u64)?;

    log::debug!(
        "Parsed WAV header: format={}, channels={}, rate={}Hz, bits={}, data={}@{}",
        audio_format, num_channels, sample_rate, bits_per_sample, data_size, data_offset
    );

    Ok(WavHeaderInfo {
        audio_format,
        num_channels,
        sample_rate,
        bits_per_sample,
        byte_rate,
        block_align,
        fmt_chunk_size,
        data_offset,
        data_size,
    })
}

/// Skip chunks until `data`, returning its payload offset and declared size
fn find_data_chunk(view: &ByteView<'_>, start: u64) -> Result<(usize, u32), FormatError> {
    let total = view.len() as u64;
    let mut offset = start;

    loop {
        if offset >= total {
            return Err(FormatError::DataChunkNotFound);
        }
        let cursor = offset as usize;
        let id = view.tag(cursor)?;
        let size = view.u32_le(cursor + 4)?;

        if id == *b"data" {
            let data_offset = cursor + 8;
            // The payload must lie entirely inside the buffer
            view.slice(data_offset, size as usize)?;
            return Ok((data_offset, size));
        }

        log::debug!("Skipping '{}' chunk ({} bytes) at offset {}", String::from_utf8_lossy(&id), size, cursor);
        offset += 8 + size as u64;
    }
}
