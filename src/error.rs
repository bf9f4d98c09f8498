//! Error Types

use std::fmt;
use thiserror::Error;

/// A read that would run past the end of the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("read of {len} bytes at offset {offset} exceeds buffer of {available} bytes")]
pub struct BoundsError {
    pub offset: usize,
    pub len: usize,
    pub available: usize,
}

/// Container-level problems found while walking the RIFF chunks
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Not a valid RIFF file")]
    NotRiff,
    #[error("Not a valid WAVE file")]
    NotWave,
    #[error("fmt chunk not found")]
    MissingFmt,
    #[error("Data chunk not found")]
    DataChunkNotFound,
    #[error("Truncated file: {0}")]
    Truncated(#[from] BoundsError),
}

/// Reason a well-formed container cannot be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    NonPcm(u16),
    BitDepth(u16),
    ChannelCount(u16),
    SampleRate(u32),
    NonCanonicalFmtChunk(u32),
    /// Decoding expects mu-law (format tag 7) input
    NotMulaw(u16),
}

impl Unsupported {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NonPcm(_) => "non-PCM",
            Self::BitDepth(_) => "bit depth",
            Self::ChannelCount(_) => "channel count",
            Self::SampleRate(_) => "sample rate",
            Self::NonCanonicalFmtChunk(_) => "non-canonical fmt chunk",
            Self::NotMulaw(_) => "non-mu-law",
        }
    }
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPcm(tag) => write!(f, "{} (format tag {}, only PCM is supported)", self.label(), tag),
            Self::BitDepth(bits) => write!(f, "{} ({} bits, only 16-bit is supported)", self.label(), bits),
            Self::ChannelCount(n) => write!(f, "{} ({} channels, expected 1 or 2)", self.label(), n),
            Self::SampleRate(rate) => write!(f, "{} ({} Hz, must be a multiple of 8000 Hz)", self.label(), rate),
            Self::NonCanonicalFmtChunk(size) => write!(f, "{} ({} bytes, expected 16)", self.label(), size),
            Self::NotMulaw(tag) => write!(f, "{} (format tag {}, expected 7)", self.label(), tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(Unsupported),
}

impl ValidationError {
    pub fn reason(&self) -> Unsupported {
        match self {
            Self::UnsupportedFormat(reason) => *reason,
        }
    }
}

/// Main error type
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Bounds error: {0}")]
    Bounds(#[from] BoundsError),
    #[error("Conversion cancelled")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("Playback error: {message}")]
    Playback { message: String },
}

impl ConversionError {
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn playback<S: Into<String>>(msg: S) -> Self { Self::Playback { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

impl From<hound::Error> for ConversionError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => Self::Io(e),
            other => Self::Io(std::io::Error::other(other.to_string())),
        }
    }
}
