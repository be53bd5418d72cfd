//! The dataset preparation run.

use std::{fs, path::Path};

use tracing::{debug, info, warn};

use crate::{
    audio,
    config::PrepareConfig,
    error::PrepareResult,
    normalize::clean_text,
    report::{LineOutcome, PrepareReport, SkipReason},
    transcript::{self, TranscriptRecord},
    writer::{DatasetTable, Sample},
};

const PROGRESS_EVERY: usize = 100;

/// Process every line of the dataset index and write all artifacts.
///
/// Only a missing index or a failure writing the final artifacts aborts the
/// run; individual lines are skipped and counted.
pub fn prepare(config: &PrepareConfig) -> PrepareResult<PrepareReport> {
    let raw_dir = config.raw_dir();
    let wavs_dir = config.wavs_dir();
    fs::create_dir_all(&raw_dir)?;
    fs::create_dir_all(&wavs_dir)?;

    let index_path = transcript::find_index(&config.dataset_path)?;
    info!("Using index: {}", index_path.display());

    let content = fs::read_to_string(&index_path)?;
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    info!("Processing {} transcript lines", lines.len());

    let mut report = PrepareReport::default();
    let mut table = DatasetTable::default();
    for (i, line) in lines.iter().enumerate() {
        let outcome = process_line(config, &index_path, line);
        report.record(&outcome);
        if let LineOutcome::Accepted(sample) = outcome {
            table.push(sample);
        }
        if (i + 1) % PROGRESS_EVERY == 0 {
            info!("Processed {}/{} lines ({} accepted)", i + 1, lines.len(), report.accepted);
        }
    }

    if table.is_empty() {
        warn!("No clip was accepted, writing an empty dataset");
    }
    table.save_to_disk(&raw_dir)?;
    table.write_vocab(&config.vocab_path())?;
    table.write_duration_map(&config.duration_path())?;

    info!("Done: {report}");
    Ok(report)
}

/// Turn one index line into an accepted sample or a skip reason.
pub fn process_line(config: &PrepareConfig, index_path: &Path, line: &str) -> LineOutcome {
    let Some(TranscriptRecord { base_name, text }) = transcript::parse_line(line) else {
        debug!("Skipping line without two fields: {line:?}");
        return LineOutcome::Skipped(SkipReason::NoFields);
    };

    let Some(src) = transcript::resolve_audio(index_path, &config.dataset_path, &base_name) else {
        debug!("No audio found for {base_name}");
        return LineOutcome::Skipped(SkipReason::Unresolved);
    };

    let clip = match audio::load_mono(&src, config.target_sample_rate) {
        Ok(clip) => clip,
        Err(e) => {
            debug!("Decode failed for {}: {e:#}", src.display());
            return LineOutcome::Skipped(SkipReason::DecodeError);
        }
    };

    let duration = clip.duration_secs();
    if !config.accepts_duration(duration) {
        debug!("Rejecting {base_name}: {duration:.3}s outside window");
        return LineOutcome::Skipped(SkipReason::BadDuration);
    }

    let file_name = format!("f5_{base_name}.wav");
    let dst = config.wavs_dir().join(&file_name);
    if let Err(e) = audio::write_wav(&dst, &clip.samples, clip.sample_rate) {
        warn!("Re-encode failed for {}: {e:#}", src.display());
        return LineOutcome::Skipped(SkipReason::DecodeError);
    }
    let audio_path = match std::path::absolute(&dst) {
        Ok(p) => p,
        Err(e) => {
            warn!("Cannot absolutize {}: {e}", dst.display());
            return LineOutcome::Skipped(SkipReason::DecodeError);
        }
    };

    LineOutcome::Accepted(Sample {
        audio_path,
        file_name,
        text: clean_text(&text),
        duration,
    })
}
