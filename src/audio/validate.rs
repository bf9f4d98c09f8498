//! Format validation for conversion input
//!
//! Each check is a standalone function so callers can evaluate them one at a time.

use crate::audio::WavHeaderInfo;
use crate::error::{Unsupported, ValidationError};

pub const PCM_FORMAT_TAG: u16 = 1;
pub const REQUIRED_BITS_PER_SAMPLE: u16 = 16;
pub const TARGET_SAMPLE_RATE: u32 = 8000;
pub const CANONICAL_FMT_CHUNK_SIZE: u32 = 16;

fn reject(reason: Unsupported) -> Result<(), ValidationError> {
    Err(ValidationError::UnsupportedFormat(reason))
}

pub fn check_pcm(info: &WavHeaderInfo) -> Result<(), ValidationError> {
    if info.audio_format != PCM_FORMAT_TAG {
        return reject(Unsupported::NonPcm(info.audio_format));
    }
    Ok(())
}

pub fn check_bit_depth(info: &WavHeaderInfo) -> Result<(), ValidationError> {
    if info.bits_per_sample != REQUIRED_BITS_PER_SAMPLE {
        return reject(Unsupported::BitDepth(info.bits_per_sample));
    }
    Ok(())
}

pub fn check_channels(info: &WavHeaderInfo) -> Result<(), ValidationError> {
    if !matches!(info.num_channels, 1 | 2) {
        return reject(Unsupported::ChannelCount(info.num_channels));
    }
    Ok(())
}

/// A zero rate would yield a zero downsample factor, so it is rejected too
pub fn check_sample_rate(info: &WavHeaderInfo) -> Result<(), ValidationError> {
    if info.sample_rate == 0 || info.sample_rate % TARGET_SAMPLE_RATE != 0 {
        return reject(Unsupported::SampleRate(info.sample_rate));
    }
    Ok(())
}

pub fn check_fmt_chunk(info: &WavHeaderInfo) -> Result<(), ValidationError> {
    if info.fmt_chunk_size != CANONICAL_FMT_CHUNK_SIZE {
        return reject(Unsupported::NonCanonicalFmtChunk(info.fmt_chunk_size));
    }
    Ok(())
}

type Check = fn(&WavHeaderInfo) -> Result<(), ValidationError>;

const CHECKS: [Check; 4] = [check_pcm, check_bit_depth, check_channels, check_sample_rate];
const STRICT_CHECKS: [Check; 1] = [check_fmt_chunk];

/// Validate a parsed header, returning the first failing check
pub fn validate(info: &WavHeaderInfo) -> Result<(), ValidationError> {
    CHECKS.iter().try_for_each(|check| check(info))
}

/// [`validate`] plus the canonical 16-byte `fmt ` chunk requirement
pub fn validate_strict(info: &WavHeaderInfo) -> Result<(), ValidationError> {
    validate(info)?;
    check_fmt_chunk(info)
}

/// Every failing check, in evaluation order
pub fn violations(info: &WavHeaderInfo, strict: bool) -> Vec<Unsupported> {
    let strict_checks: &[Check] = if strict { &STRICT_CHECKS } else { &[] };

    CHECKS
        .iter()
        .chain(strict_checks)
        .filter_map(|check| check(info).err().map(|e| e.reason()))
        .collect()
}

/// Integral ratio between the source rate and 8000 Hz
pub fn downsample_factor(info: &WavHeaderInfo) -> usize {
    (info.sample_rate / TARGET_SAMPLE_RATE) as usize
}
