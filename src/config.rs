//! Configuration management for conversion runs

use crate::error::{ConversionError, Result};
use crate::processing::{ConversionOptions, DEFAULT_BATCH_SIZE};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ULAW_EXTENSION: &str = "ulaw";
pub const WAV_EXTENSION: &str = "wav";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub strict: bool,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix the samples with a mu-law WAV header
    pub wrap_header: bool,
    /// Write outputs here instead of next to each input
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub jobs: usize,
    pub show_progress: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_path: None,
            conversion: ConversionConfig::default(),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            strict: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            wrap_header: false,
            directory: None,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            jobs: utils::cpu_count().min(4),
            show_progress: true,
            verbose: false,
        }
    }
}

impl Config {
    pub fn strict(&self) -> bool {
        self.conversion.strict
    }

    pub fn batch_size(&self) -> usize {
        self.conversion.batch_size
    }

    pub fn wrap_header(&self) -> bool {
        self.output.wrap_header
    }

    pub fn jobs(&self) -> usize {
        self.processing.jobs
    }

    pub fn verbose(&self) -> bool {
        self.processing.verbose
    }

    pub fn show_progress(&self) -> bool {
        self.processing.show_progress
    }

    /// Options for a single in-memory conversion
    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            strict: self.strict(),
            batch_size: self.batch_size(),
            cancel: None,
        }
    }

    /// Where the converted form of `input` is written
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        if let Some(path) = &self.output_path {
            return path.clone();
        }
        let extension = if self.wrap_header() { WAV_EXTENSION } else { ULAW_EXTENSION };
        let stem = input.file_stem().unwrap_or(input.as_os_str());
        let directory = match &self.output.directory {
            Some(dir) => dir.clone(),
            None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let mut output = directory.join(stem);
        output.set_extension(extension);
        output
    }
}

#[derive(Debug, Parser)]
#[command(name = "wav2ulaw", about = "Convert 16-bit PCM WAV files to 8 kHz G.711 mu-law", version, author)]
pub struct Args {
    #[arg(short = 'v', long = "verbose", global = true, help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'c', long = "config", global = true, help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the header fields of a WAV file
    Info {
        #[arg(help = "Input WAV file")]
        input: PathBuf,
    },
    /// Convert PCM WAV files to mu-law
    Convert(ConvertArgs),
    /// Expand mu-law audio back to a 16-bit PCM WAV
    Decode {
        #[arg(help = "Raw .ulaw file or mu-law WAV")]
        input: PathBuf,
        #[arg(short = 'o', long = "output", help = "Output WAV file path")]
        output: PathBuf,
    },
    /// Play mu-law audio on the default output device (needs the `playback` feature)
    Play {
        #[arg(help = "Raw .ulaw file, mu-law WAV or PCM WAV to convert first")]
        input: PathBuf,
    },
    /// Write the default configuration to a TOML file
    InitConfig {
        #[arg(default_value = "wav2ulaw.toml")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct ConvertArgs {
    #[arg(required = true, help = "Input WAV files")]
    pub inputs: Vec<PathBuf>,

    #[arg(short = 'o', long = "output", help = "Output file path (single input only)")]
    pub output: Option<PathBuf>,

    #[arg(short = 'd', long = "output-dir", help = "Directory for converted files")]
    pub output_dir: Option<PathBuf>,

    #[arg(long = "wav", help = "Write a playable mu-law WAV instead of raw samples")]
    pub wav: bool,

    #[arg(long = "strict", help = "Reject files whose fmt chunk is not exactly 16 bytes")]
    pub strict: bool,

    #[arg(long = "batch-size", help = "Samples encoded between scheduler yields")]
    pub batch_size: Option<usize>,

    #[arg(short = 'j', long = "jobs", help = "Files converted in parallel")]
    pub jobs: Option<usize>,

    #[arg(short = 'q', long = "quiet", help = "Do not report progress")]
    pub quiet: bool,
}

impl Config {
    /// Load the config file (if any) and apply command line overrides
    pub fn from_args_and_config(args: &Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        config.processing.verbose |= args.verbose;

        if let Command::Convert(convert) = &args.command {
            config.apply_convert_args(convert);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn apply_convert_args(&mut self, args: &ConvertArgs) {
        self.inputs = args.inputs.clone();
        if args.output.is_some() {
            self.output_path = args.output.clone();
        }
        if args.output_dir.is_some() {
            self.output.directory = args.output_dir.clone();
        }
        self.output.wrap_header |= args.wav;
        self.conversion.strict |= args.strict;
        if let Some(batch_size) = args.batch_size {
            self.conversion.batch_size = batch_size;
        }
        if let Some(jobs) = args.jobs {
            self.processing.jobs = jobs;
        }
        if args.quiet {
            self.processing.show_progress = false;
        }
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConversionError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ConversionError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.conversion.batch_size == 0 {
            return Err(ConversionError::config("Batch size must be greater than 0"));
        }

        if self.processing.jobs == 0 {
            return Err(ConversionError::config("Job count must be greater than 0"));
        }
        if self.processing.jobs > utils::cpu_count() * 2 {
            return Err(ConversionError::config("Job count cannot exceed 2x logical CPU cores"));
        }

        if self.output_path.is_some() && self.inputs.len() > 1 {
            return Err(ConversionError::config("An output path can only be given for a single input"));
        }

        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConversionError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConversionError::config(format!("Failed to write config file: {}", e)))
    }

    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

pub mod utils {
    pub fn cpu_count() -> usize {
        num_cpus::get()
    }

    /// Never more workers than files
    pub fn recommended_jobs(file_count: usize, configured: usize) -> usize {
        configured.min(file_count).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.strict());
        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE);
        assert!(!config.wrap_header());
        assert!(config.jobs() >= 1);
        assert!(config.show_progress());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.conversion.batch_size = 0;
        assert!(config.validate().is_err());
        config.conversion.batch_size = 1024;

        config.processing.jobs = 0;
        assert!(config.validate().is_err());
        config.processing.jobs = utils::cpu_count() * 2 + 1;
        assert!(config.validate().is_err());
        config.processing.jobs = 1;

        config.inputs = vec![PathBuf::from("a.wav"), PathBuf::from("b.wav")];
        config.output_path = Some(PathBuf::from("out.ulaw"));
        assert!(config.validate().is_err());
        config.inputs.truncate(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.conversion.strict = true;
        config.conversion.batch_size = 512;

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path).unwrap();
        assert!(loaded_config.strict());
        assert_eq!(loaded_config.batch_size(), 512);
        assert_eq!(loaded_config.jobs(), config.jobs());
    }

    #[test]
    fn test_partial_config_file() {
        let config: Config = toml::from_str("[output]\nwrap_header = true\n").unwrap();
        assert!(config.wrap_header());
        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE);
        assert!(config.inputs.is_empty());
    }

    #[test]
    fn test_output_paths() {
        let mut config = Config::default();
        let input = Path::new("audio/voice.wav");
        assert_eq!(config.output_path_for(input), PathBuf::from("audio/voice.ulaw"));

        config.output.wrap_header = true;
        assert_eq!(config.output_path_for(input), PathBuf::from("audio/voice.wav"));

        config.output.directory = Some(PathBuf::from("out"));
        assert_eq!(config.output_path_for(input), PathBuf::from("out/voice.wav"));

        config.output_path = Some(PathBuf::from("explicit.bin"));
        assert_eq!(config.output_path_for(input), PathBuf::from("explicit.bin"));
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "wav2ulaw", "-v", "convert", "in.wav", "--wav", "--strict", "--batch-size", "64", "-j", "1", "-q",
        ]);
        let config = Config::from_args_and_config(&args).unwrap();
        assert!(config.verbose());
        assert!(config.wrap_header());
        assert!(config.strict());
        assert_eq!(config.batch_size(), 64);
        assert_eq!(config.jobs(), 1);
        assert!(!config.show_progress());
        assert_eq!(config.inputs, vec![PathBuf::from("in.wav")]);
    }

    #[test]
    fn test_recommended_jobs() {
        assert_eq!(utils::recommended_jobs(1, 8), 1);
        assert_eq!(utils::recommended_jobs(10, 4), 4);
        assert_eq!(utils::recommended_jobs(0, 4), 1);
    }
}
