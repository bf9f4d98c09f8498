//! Command line behavior

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;
use wav2ulaw::audio::PcmAudio;
use wav2ulaw::codec::decode_bytes;

fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames * channels as usize {
        writer.write_sample(((i * 97) % 6000) as i16 - 3000).unwrap();
    }
    writer.finalize().unwrap();
}

fn wav2ulaw() -> Command {
    Command::cargo_bin("wav2ulaw").unwrap()
}

#[test]
fn test_info_prints_metadata() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tone.wav");
    write_wav(&input, 2, 16000, 16000);

    wav2ulaw()
        .arg("info")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bit rate: 512000 bps"))
        .stdout(predicate::str::contains("Channels: 2"))
        .stdout(predicate::str::contains("Convertible: yes"));
}

#[test]
fn test_info_reports_unsupported_rate() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cd.wav");
    write_wav(&input, 1, 11025, 100);

    wav2ulaw()
        .args(["info", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unsupported: sample rate"));
}

#[test]
fn test_convert_writes_ulaw_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("voice.wav");
    write_wav(&input, 1, 16000, 1000);

    wav2ulaw()
        .args(["convert", "-q", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted: 1/1"));

    let output = std::fs::read(dir.path().join("voice.ulaw")).unwrap();
    assert_eq!(output.len(), 500);
}

#[test]
fn test_convert_wav_to_output_dir() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("one.wav");
    let second = dir.path().join("two.wav");
    write_wav(&first, 1, 8000, 80);
    write_wav(&second, 2, 24000, 240);
    let out_dir = dir.path().join("out");

    wav2ulaw()
        .arg("convert")
        .arg(&first)
        .arg(&second)
        .arg("--wav")
        .arg("-d")
        .arg(&out_dir)
        .args(["-j", "1", "-q"])
        .assert()
        .success();

    let one = std::fs::read(out_dir.join("one.wav")).unwrap();
    let two = std::fs::read(out_dir.join("two.wav")).unwrap();
    assert_eq!(one.len(), 44 + 80);
    assert_eq!(two.len(), 44 + 80);
    assert_eq!(&one[8..12], b"WAVE");
}

#[test]
fn test_convert_failure_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cd.wav");
    write_wav(&input, 1, 22050, 100);

    wav2ulaw()
        .args(["convert", "-q", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sample rate"));
}

#[test]
fn test_convert_missing_input() {
    wav2ulaw()
        .args(["convert", "/no/such/file.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_decode_round_trip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("speech.wav");
    write_wav(&input, 1, 8000, 400);

    wav2ulaw().args(["convert", "-q", input.to_str().unwrap()]).assert().success();

    let decoded = dir.path().join("decoded.wav");
    wav2ulaw()
        .arg("decode")
        .arg(dir.path().join("speech.ulaw"))
        .arg("-o")
        .arg(&decoded)
        .assert()
        .success();

    let encoded = std::fs::read(dir.path().join("speech.ulaw")).unwrap();
    let audio = PcmAudio::from_file(&decoded).unwrap();
    assert_eq!(audio.sample_rate, 8000);
    assert_eq!(audio.samples, decode_bytes(&encoded));
    assert!((audio.duration() - 0.05).abs() < 1e-9);
}

#[test]
fn test_decode_rejects_pcm_wav() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pcm.wav");
    write_wav(&input, 1, 8000, 10);

    wav2ulaw()
        .arg("decode")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("x.wav"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-mu-law"));
}

#[test]
fn test_init_config_then_use_it() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("wav2ulaw.toml");

    wav2ulaw().arg("init-config").arg(&config_path).assert().success();
    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[conversion]"));
    assert!(content.contains("batch_size"));

    std::fs::write(&config_path, "[output]\nwrap_header = true\n").unwrap();
    let input = dir.path().join("a.wav");
    write_wav(&input, 1, 8000, 20);

    // Same name as the input, so it is refused
    wav2ulaw()
        .arg("-c")
        .arg(&config_path)
        .args(["convert", "-q", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overwrite"));

    let out_dir = dir.path().join("wrapped");
    wav2ulaw()
        .arg("-c")
        .arg(&config_path)
        .args(["convert", "-q", input.to_str().unwrap(), "-d", out_dir.to_str().unwrap()])
        .assert()
        .success();
    assert_eq!(std::fs::read(out_dir.join("a.wav")).unwrap().len(), 44 + 20);
}

#[test]
fn test_bad_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("broken.toml");
    std::fs::write(&config_path, "[conversion]\nbatch_size = 0\n").unwrap();

    wav2ulaw()
        .arg("-c")
        .arg(&config_path)
        .args(["info", "whatever.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Batch size"));
}

#[test]
fn test_convert_refuses_aliased_overwrite() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("voice.wav");
    write_wav(&input, 1, 8000, 100);
    let before = std::fs::read(&input).unwrap();
    let alias = dir.path().join("sub").join("..");

    wav2ulaw()
        .args(["convert", "-q", "--wav", input.to_str().unwrap(), "-d", alias.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overwrite"));
    assert_eq!(std::fs::read(&input).unwrap(), before);
}
