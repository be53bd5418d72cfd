// Command-line arguments for both tools, mapped onto the library configs

use std::path::PathBuf;

use clap::Parser;
use dataset_core::{config::DEFAULT_OUTPUT_PATH, PrepareConfig};
use infer_core::{
    config::{DEFAULT_OUTPUT_FILE, DEFAULT_VOCAB_FILE},
    InferConfig,
};

/// Prepare an (audio, transcript) folder for F5-TTS training.
#[derive(Debug, Parser)]
#[command(name = "prepare_dataset", version)]
pub struct PrepareArgs {
    /// Root folder containing `texts.txt` and the audio (`wavs/` or alongside).
    #[arg(long = "dataset_path")]
    pub dataset_path: PathBuf,

    /// Where to write `raw/`, `wavs_processed/`, `vocab.txt` and `duration.json`.
    #[arg(long = "output_path", env = "F5_OUTPUT_PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: PathBuf,
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(args: PrepareArgs) -> Self {
        PrepareConfig::new(args.dataset_path, args.output_path)
    }
}

/// Generate speech with a trained F5-TTS checkpoint.
#[derive(Debug, Parser)]
#[command(name = "infer", version)]
pub struct InferArgs {
    /// Checkpoint file (.pt or .safetensors).
    #[arg(long = "ckpt_path")]
    pub ckpt_path: PathBuf,

    /// Reference speaker audio, 5-10 seconds of WAV.
    #[arg(long = "ref_audio")]
    pub ref_audio: PathBuf,

    /// Text to speak.
    #[arg(long)]
    pub text: String,

    /// Output WAV file (24 kHz), overwritten if present.
    #[arg(long = "output_file", default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// Vocabulary written by `prepare_dataset`.
    #[arg(long = "vocab_file", env = "F5_VOCAB_FILE", default_value = DEFAULT_VOCAB_FILE)]
    pub vocab_file: PathBuf,
}

impl From<InferArgs> for InferConfig {
    fn from(args: InferArgs) -> Self {
        InferConfig {
            ckpt_path: args.ckpt_path,
            ref_audio: args.ref_audio,
            text: args.text,
            output_file: args.output_file,
            vocab_file: args.vocab_file,
        }
    }
}
