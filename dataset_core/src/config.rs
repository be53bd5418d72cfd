// Configuration for a dataset preparation run

use std::path::PathBuf;

/// Output root used when none is given.
pub const DEFAULT_OUTPUT_PATH: &str = "./F5-TTS/data/braille_custom";

#[derive(Debug, Clone)]
pub struct PrepareConfig {
    /// Root containing `texts.txt` and the audio files.
    pub dataset_path: PathBuf,
    /// Destination root for `raw/`, `wavs_processed/`, `vocab.txt` and `duration.json`.
    pub output_path: PathBuf,
    pub target_sample_rate: u32,
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("."),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            target_sample_rate: 24000,
            min_duration_secs: 0.5,
            max_duration_secs: 15.0,
        }
    }
}

impl PrepareConfig {
    pub fn new(dataset_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.output_path.join("raw")
    }

    pub fn wavs_dir(&self) -> PathBuf {
        self.output_path.join("wavs_processed")
    }

    pub fn vocab_path(&self) -> PathBuf {
        self.output_path.join("vocab.txt")
    }

    pub fn duration_path(&self) -> PathBuf {
        self.output_path.join("duration.json")
    }

    /// Closed acceptance window for clip durations.
    pub fn accepts_duration(&self, secs: f64) -> bool {
        secs >= self.min_duration_secs && secs <= self.max_duration_secs
    }
}
