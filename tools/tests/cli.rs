//! Runs the compiled binaries end to end

use std::{fs, path::Path, process::Command};

use hound::{SampleFormat, WavSpec, WavWriter};

fn write_clip(path: &Path, secs: f64) {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 24000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("create wav");
    for i in 0..(secs * 24000.0) as usize {
        writer.write_sample(((i % 200) as i16 - 100) * 50).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

#[test]
fn prepare_dataset_writes_all_artifacts() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(data.path().join("wavs")).unwrap();
    write_clip(&data.path().join("wavs/clip01.wav"), 2.0);
    fs::write(
        data.path().join("texts.txt"),
        "clip01.wav|Tenho 3 gatos\nbroken line\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_prepare_dataset"))
        .args([
            "--dataset_path",
            data.path().to_str().unwrap(),
            "--output_path",
            out.path().to_str().unwrap(),
        ])
        .output()
        .expect("run prepare_dataset");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["accepted"], 1);
    assert_eq!(report["skipped_no_fields"], 1);
    assert_eq!(report["skipped_decode_error"], 0);

    assert!(out.path().join("wavs_processed/f5_clip01.wav").is_file());
    assert!(out.path().join("raw/data-00000-of-00001.arrow").is_file());
    let durations: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("duration.json")).unwrap())
            .unwrap();
    assert_eq!(durations["duration"]["f5_clip01.wav"].as_f64(), Some(2.0));
    let vocab = fs::read_to_string(out.path().join("vocab.txt")).unwrap();
    assert!(vocab.contains("ê\n"));
}

#[test]
fn prepare_dataset_without_index_fails() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");

    let output = Command::new(env!("CARGO_BIN_EXE_prepare_dataset"))
        .args([
            "--dataset_path",
            data.path().to_str().unwrap(),
            "--output_path",
            out.path().to_str().unwrap(),
        ])
        .output()
        .expect("run prepare_dataset");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("texts.txt"));
}

#[test]
fn infer_with_missing_checkpoint_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ref_audio = dir.path().join("ref.wav");
    let output_file = dir.path().join("generated.wav");
    write_clip(&ref_audio, 1.0);

    let output = Command::new(env!("CARGO_BIN_EXE_infer"))
        .args([
            "--ckpt_path",
            dir.path().join("missing.pt").to_str().unwrap(),
            "--ref_audio",
            ref_audio.to_str().unwrap(),
            "--text",
            "Olá",
            "--output_file",
            output_file.to_str().unwrap(),
        ])
        .env("F5_INFER_BIN", "/nonexistent/f5-cli")
        .output()
        .expect("run infer");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not found: checkpoint"), "stderr: {stderr}");
    assert!(!output_file.exists());
}
