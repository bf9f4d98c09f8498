//! Parallel conversion of independent files
//!
//! Each file gets its own [`Conversion`], so no state is shared between workers.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::audio::{header, wav};
use crate::config::{utils, Config};
use crate::error::{ConversionError, Result};
use crate::processing::processor::{AudioMetadata, CancelToken, Conversion, ConversionOptions};
use crate::processing::progress::{LogProgress, NoProgress};

#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub metadata: AudioMetadata,
    pub encoded_samples: usize,
    pub processing_time_secs: f64,
    /// Processing time over audio duration
    pub rtf: f64,
}

#[derive(Debug)]
pub struct ParallelConversionResult {
    pub outcomes: Vec<FileOutcome>,
    pub failures: Vec<(PathBuf, ConversionError)>,
    pub processing_time_secs: f64,
    pub worker_count: usize,
}

impl ParallelConversionResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct ParallelConverter {
    config: Config,
    pool: ThreadPool,
    workers: usize,
    cancel: CancelToken,
}

impl ParallelConverter {
    pub fn new(config: Config) -> Result<Self> {
        let workers = utils::recommended_jobs(config.inputs.len(), config.jobs());
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("wav2ulaw-worker-{}", i))
            .build()
            .map_err(|e| ConversionError::config(format!("Failed to build worker pool: {}", e)))?;

        Ok(Self {
            config,
            pool,
            workers,
            cancel: CancelToken::new(),
        })
    }

    /// Token that aborts every in-flight conversion at its next batch boundary
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    pub fn process_all(&self) -> ParallelConversionResult {
        let start = Instant::now();
        log::info!("Converting {} file(s) with {} worker(s)", self.config.inputs.len(), self.workers);

        let results: Vec<(PathBuf, Result<FileOutcome>)> = self.pool.install(|| {
            self.config
                .inputs
                .par_iter()
                .map(|input| (input.clone(), self.process_file(input)))
                .collect()
        });

        let mut outcomes = Vec::new();
        let mut failures = Vec::new();
        for (input, result) in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    log::error!("{}: {}", input.display(), e);
                    failures.push((input, e));
                }
            }
        }

        ParallelConversionResult {
            outcomes,
            failures,
            processing_time_secs: start.elapsed().as_secs_f64(),
            worker_count: self.workers,
        }
    }

    /// Convert one file and write the result next to it (or where configured)
    pub fn process_file(&self, input: &Path) -> Result<FileOutcome> {
        let start = Instant::now();
        let bytes = wav::read_bytes(input)?;

        let options = ConversionOptions {
            cancel: Some(self.cancel.clone()),
            ..self.config.conversion_options()
        };
        let conversion = Conversion::new(&bytes, &options)?;
        log::debug!(
            "{}: {} Hz, {} channel(s), {:.2}s -> {} samples",
            input.display(),
            conversion.header().sample_rate,
            conversion.header().num_channels,
            conversion.metadata().duration_seconds,
            conversion.total()
        );
        let result = if self.config.show_progress() {
            let label = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            conversion.run(&mut LogProgress::new(label))?
        } else {
            conversion.run(&mut NoProgress)?
        };

        let output_path = self.config.output_path_for(input);
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        if is_same_file(input, &output_path) {
            return Err(ConversionError::config(format!(
                "Output {} would overwrite input {}; choose another output directory",
                output_path.display(),
                input.display()
            )));
        }
        if self.config.wrap_header() {
            std::fs::write(&output_path, header::wrap(&result.encoded))?;
        } else {
            std::fs::write(&output_path, &result.encoded)?;
        }

        let elapsed = start.elapsed().as_secs_f64();
        let duration = result.metadata.duration_seconds;
        log::info!("{} -> {} ({} samples)", input.display(), output_path.display(), result.encoded.len());

        Ok(FileOutcome {
            input_path: input.to_path_buf(),
            output_path,
            encoded_samples: result.encoded.len(),
            metadata: result.metadata,
            processing_time_secs: elapsed,
            rtf: if duration > 0.0 { elapsed / duration } else { 0.0 },
        })
    }
}

/// Whether `output` resolves to the existing `input` file, however either is spelled
///
/// The output's parent directory must already exist.
fn is_same_file(input: &Path, output: &Path) -> bool {
    let Ok(input) = std::fs::canonicalize(input) else {
        return false;
    };
    if let Ok(existing) = std::fs::canonicalize(output) {
        return existing == input;
    }
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (std::fs::canonicalize(parent), output.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name) == input,
        _ => false,
    }
}
