// Configuration for one inference run

use std::path::PathBuf;

pub const DEFAULT_OUTPUT_FILE: &str = "generated.wav";
pub const DEFAULT_VOCAB_FILE: &str = "./F5-TTS/data/braille_arrow_custom/vocab.txt";

/// Sample rate of every waveform this crate writes.
pub const OUTPUT_SAMPLE_RATE: u32 = 24000;

#[derive(Debug, Clone)]
pub struct InferConfig {
    /// Trained weights (`.pt` pickle or `.safetensors`).
    pub ckpt_path: PathBuf,
    /// Reference speaker audio.
    pub ref_audio: PathBuf,
    pub text: String,
    pub output_file: PathBuf,
    pub vocab_file: PathBuf,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            ckpt_path: PathBuf::new(),
            ref_audio: PathBuf::new(),
            text: String::new(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            vocab_file: PathBuf::from(DEFAULT_VOCAB_FILE),
        }
    }
}

impl InferConfig {
    pub fn new(
        ckpt_path: impl Into<PathBuf>,
        ref_audio: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            ckpt_path: ckpt_path.into(),
            ref_audio: ref_audio.into(),
            text: text.into(),
            ..Self::default()
        }
    }
}
