//! Conversion Pipeline

pub mod parallel_processor;
pub mod processor;
pub mod progress;
pub mod window;

pub use parallel_processor::{FileOutcome, ParallelConverter, ParallelConversionResult};
pub use processor::{
    convert, encode, inspect, AudioMetadata, CancelToken, Conversion, ConversionOptions, ConversionResult, Step,
    DEFAULT_BATCH_SIZE,
};
pub use progress::{LogProgress, NoProgress, ProgressReporter};
pub use window::SampleWindow;
