//! Audio Container Module
//!
//! RIFF/WAVE parsing, format validation, downsampling to 8 kHz, the mu-law
//! output header and WAV file I/O.

pub mod converter;
pub mod header;
pub mod riff;
pub mod validate;
pub mod wav;

pub use converter::{output_len, Downsampler};
pub use header::{build_header, wrap};
pub use riff::{parse, WavHeaderInfo};
pub use validate::{validate, validate_strict};
pub use wav::{FormatTag, PcmAudio};
