//! WAV file input and output

use std::fs::File;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::audio::header::{MULAW_FORMAT_TAG, OUTPUT_SAMPLE_RATE};
use crate::audio::riff;
use crate::audio::validate::PCM_FORMAT_TAG;
use crate::codec::mulaw;
use crate::error::{ConversionError, Result, Unsupported, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    Pcm,
    MuLaw,
    Other(u16),
}

impl From<u16> for FormatTag {
    fn from(tag: u16) -> Self {
        match tag {
            PCM_FORMAT_TAG => FormatTag::Pcm,
            MULAW_FORMAT_TAG => FormatTag::MuLaw,
            other => FormatTag::Other(other),
        }
    }
}

impl FormatTag {
    pub fn name(&self) -> &'static str {
        match self {
            FormatTag::Pcm => "PCM",
            FormatTag::MuLaw => "mu-law",
            FormatTag::Other(_) => "unknown",
        }
    }
}

/// Read a whole file into memory
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        ConversionError::Io(std::io::Error::new(e.kind(), format!("Cannot read {}: {}", path.display(), e)))
    })?;
    log::debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Mu-law payload of `bytes`
///
/// A RIFF file must carry mono mu-law audio; anything else is taken as raw
/// headerless 8 kHz samples.
pub fn mulaw_payload(bytes: &[u8]) -> Result<&[u8]> {
    if !bytes.starts_with(b"RIFF") {
        return Ok(bytes);
    }

    let info = riff::parse(bytes)?;
    if info.audio_format != MULAW_FORMAT_TAG {
        return Err(ValidationError::UnsupportedFormat(Unsupported::NotMulaw(info.audio_format)).into());
    }
    if info.num_channels != 1 {
        return Err(ValidationError::UnsupportedFormat(Unsupported::ChannelCount(info.num_channels)).into());
    }
    Ok(&bytes[info.data_range()])
}

/// Mono 16-bit PCM audio
#[derive(Debug, Clone)]
pub struct PcmAudio {
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl PcmAudio {
    /// Expand 8 kHz mu-law samples
    pub fn from_mulaw(encoded: &[u8]) -> Self {
        Self {
            sample_rate: OUTPUT_SAMPLE_RATE,
            samples: mulaw::decode_bytes(encoded),
        }
    }

    pub fn spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let mut writer = WavWriter::new(file, self.spec())?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        log::debug!("Wrote {} samples to {}", self.samples.len(), path.display());
        Ok(())
    }

    /// Load a mono 16-bit PCM WAV
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(ValidationError::UnsupportedFormat(Unsupported::BitDepth(spec.bits_per_sample)).into());
        }
        if spec.channels != 1 {
            return Err(ValidationError::UnsupportedFormat(Unsupported::ChannelCount(spec.channels)).into());
        }

        let samples = reader.samples::<i16>().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { sample_rate: spec.sample_rate, samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::header;
    use tempfile::TempDir;

    #[test]
    fn test_format_tags() {
        assert_eq!(FormatTag::from(1), FormatTag::Pcm);
        assert_eq!(FormatTag::from(7), FormatTag::MuLaw);
        assert_eq!(FormatTag::from(3), FormatTag::Other(3));
        assert_eq!(FormatTag::MuLaw.name(), "mu-law");
    }

    #[test]
    fn test_payload_of_raw_and_wrapped() {
        let raw = [0x6f, 0x68, 0xe8];
        assert_eq!(mulaw_payload(&raw).unwrap(), &raw);

        let wrapped = header::wrap(&raw);
        assert_eq!(mulaw_payload(&wrapped).unwrap(), &raw);
    }

    #[test]
    fn test_payload_rejects_pcm_wav() {
        let mut wrapped = header::wrap(&[0u8; 4]);
        wrapped[20..22].copy_from_slice(&1u16.to_le_bytes());
        assert!(matches!(
            mulaw_payload(&wrapped),
            Err(ConversionError::Validation(ValidationError::UnsupportedFormat(Unsupported::NotMulaw(1))))
        ));
    }

    #[test]
    fn test_pcm_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("decoded.wav");

        let audio = PcmAudio::from_mulaw(&[mulaw::encode(0), mulaw::encode(1000), mulaw::encode(-1000)]);
        assert_eq!(audio.sample_rate, 8000);
        audio.save_to_file(&path).unwrap();

        let loaded = PcmAudio::from_file(&path).unwrap();
        assert_eq!(loaded.sample_rate, 8000);
        assert_eq!(loaded.samples, audio.samples);
        assert!((loaded.duration() - 3.0 / 8000.0).abs() < 1e-12);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_bytes("/definitely/not/here.wav").unwrap_err();
        assert!(err.to_string().contains("here.wav"));
    }
}
