//! wav2ulaw - PCM WAV to G.711 mu-law conversion
//!
//! Parses RIFF/WAVE input, smooths and decimates it to 8 kHz mono, and
//! companding-encodes each sample to one mu-law byte.

pub mod audio;
pub mod codec;
pub mod config;
pub mod error;
#[cfg(feature = "playback")]
pub mod playback;
pub mod processing;

pub use audio::{build_header, parse, validate, validate_strict, WavHeaderInfo};
pub use codec::{decode_sample, encode_sample};
pub use config::{Args, Config};
pub use error::{ConversionError, Result};
pub use processing::{convert, encode, ConversionOptions, ConversionResult, ProgressReporter};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Install the env_logger backend; `RUST_LOG` still overrides the default level
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
