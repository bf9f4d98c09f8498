//! wav2ulaw - PCM WAV to mu-law converter

use anyhow::Context;
use clap::Parser;
use std::path::Path;
use std::process;
use wav2ulaw::audio::{validate::violations, wav, FormatTag, PcmAudio};
use wav2ulaw::config::Command;
use wav2ulaw::processing::{inspect, ParallelConverter};
use wav2ulaw::{init_logging, Args, Config};

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        println!("{}", wav2ulaw::get_library_info());
        println!();
    }

    let config = Config::from_args_and_config(&args)?;

    match &args.command {
        Command::Info { input } => run_info(input, &config),
        Command::Convert(_) => run_convert(config),
        Command::Decode { input, output } => run_decode(input, output),
        Command::Play { input } => run_play(input),
        Command::InitConfig { path } => {
            Config::create_default_config(path)?;
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
    }
}

fn run_info(input: &Path, config: &Config) -> anyhow::Result<()> {
    let bytes = wav::read_bytes(input)?;
    let (info, metadata) = inspect(&bytes).with_context(|| format!("Cannot parse {}", input.display()))?;

    println!("=== {} ===", input.display());
    println!("Format: {} ({})", FormatTag::from(info.audio_format).name(), info.audio_format);
    println!("{}", metadata);
    println!("Block align: {}", info.block_align);
    println!("fmt chunk: {} bytes", info.fmt_chunk_size);
    println!("Data: {} bytes at offset {}", info.data_size, info.data_offset);

    let problems = violations(&info, config.strict());
    if problems.is_empty() {
        println!("Convertible: yes");
    } else {
        for problem in &problems {
            println!("Unsupported: {}", problem);
        }
    }
    Ok(())
}

fn run_convert(config: Config) -> anyhow::Result<()> {
    for input in &config.inputs {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
    }

    println!("=== wav2ulaw ===");
    println!("Files: {}", config.inputs.len());
    println!("Output: {}", if config.wrap_header() { "mu-law WAV" } else { "raw mu-law" });

    let converter = ParallelConverter::new(config.clone())?;
    println!("Workers: {}", converter.worker_count());
    println!("================\n");

    let result = converter.process_all();

    for outcome in &result.outcomes {
        println!(
            "{} -> {} ({} samples, {:.2}s audio)",
            outcome.input_path.display(),
            outcome.output_path.display(),
            outcome.encoded_samples,
            outcome.metadata.duration_seconds
        );
        if config.verbose() {
            println!("  Time: {:.3}s  RTF: {:.4}", outcome.processing_time_secs, outcome.rtf);
        }
    }
    for (input, error) in &result.failures {
        eprintln!("{}: {}", input.display(), error);
    }

    println!("\n=== Conversion Complete ===");
    println!("Converted: {}/{}", result.outcomes.len(), config.inputs.len());
    println!("Time: {:.2}s", result.processing_time_secs);

    if !result.is_success() {
        anyhow::bail!("{} of {} file(s) failed", result.failures.len(), config.inputs.len());
    }
    Ok(())
}

fn run_decode(input: &Path, output: &Path) -> anyhow::Result<()> {
    let bytes = wav::read_bytes(input)?;
    let payload = wav::mulaw_payload(&bytes).with_context(|| format!("Cannot decode {}", input.display()))?;

    let audio = PcmAudio::from_mulaw(payload);
    audio.save_to_file(output)?;

    println!("{} -> {} ({:.2}s)", input.display(), output.display(), audio.duration());
    Ok(())
}

#[cfg(feature = "playback")]
fn run_play(input: &Path) -> anyhow::Result<()> {
    use wav2ulaw::audio::validate::PCM_FORMAT_TAG;
    use wav2ulaw::processing::{convert, ConversionOptions, NoProgress};

    let bytes = wav::read_bytes(input)?;
    let is_pcm = wav2ulaw::parse(&bytes).is_ok_and(|info| info.audio_format == PCM_FORMAT_TAG);
    let encoded = if is_pcm {
        convert(&bytes, &ConversionOptions::default(), NoProgress)?.encoded
    } else {
        wav::mulaw_payload(&bytes)?.to_vec()
    };

    println!("Playing {} ({:.2}s)", input.display(), encoded.len() as f64 / 8000.0);
    wav2ulaw::playback::play_mulaw(&encoded)?;
    Ok(())
}

#[cfg(not(feature = "playback"))]
fn run_play(_input: &Path) -> anyhow::Result<()> {
    anyhow::bail!("Playback support is not compiled in; rebuild with --features playback")
}
