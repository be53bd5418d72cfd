//! Backend driving the upstream F5-TTS inference CLI.
//!
//! Weights are restored and checked here, then handed to the CLI as a
//! `.safetensors` file together with the vocabulary the model was built with.

use std::{
    env,
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Context;
use candle_core::Device;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::{
    checkpoint::StateDict,
    config::OUTPUT_SAMPLE_RATE,
    device::device_name,
    error::{InferError, InferResult},
    model::{ModelFactory, ModelShell, Synthesizer},
    model_config::ModelConfig,
    vocab::VocabMap,
};

pub const DEFAULT_PROGRAM: &str = "f5-tts_infer-cli";
/// Environment variable overriding [`DEFAULT_PROGRAM`].
pub const PROGRAM_ENV: &str = "F5_INFER_BIN";
/// Upstream model name matching [`ModelConfig::f5_base`].
pub const MODEL_NAME: &str = "F5TTS_Base";
pub const DEFAULT_VOCODER: &str = "vocos";

const OUTPUT_NAME: &str = "out.wav";

#[derive(Debug, Clone)]
pub struct F5CliFactory {
    program: String,
}

impl F5CliFactory {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program from `F5_INFER_BIN`, falling back to `f5-tts_infer-cli`.
    pub fn from_env() -> Self {
        Self::new(env::var(PROGRAM_ENV).unwrap_or_else(|_| DEFAULT_PROGRAM.into()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F5CliVocoder {
    pub name: String,
}

impl ModelFactory for F5CliFactory {
    type Vocoder = F5CliVocoder;
    type Model = F5CliModel;
    type Shell = F5CliShell;

    fn build(
        &self,
        config: &ModelConfig,
        vocab: Option<&VocabMap>,
        device: &Device,
    ) -> InferResult<F5CliShell> {
        Ok(F5CliShell {
            program: self.program.clone(),
            config: config.clone(),
            vocab: vocab.cloned(),
            device: device_name(device),
            state: None,
        })
    }

    fn load_vocoder(&self, _device: &Device) -> InferResult<F5CliVocoder> {
        Ok(F5CliVocoder {
            name: DEFAULT_VOCODER.to_string(),
        })
    }
}

#[derive(Debug)]
pub struct F5CliShell {
    program: String,
    config: ModelConfig,
    vocab: Option<VocabMap>,
    device: &'static str,
    state: Option<StateDict>,
}

impl ModelShell for F5CliShell {
    type Ready = F5CliModel;

    fn load_state_dict(&mut self, state: StateDict) -> InferResult<()> {
        state.verify_against(&self.config)?;
        debug!("Restored {} parameters", state.len());
        self.state = Some(state);
        Ok(())
    }

    fn eval(self) -> InferResult<F5CliModel> {
        let state = self.state.ok_or_else(|| InferError::WeightRestore {
            missing: vec!["<no state dict restored>".to_string()],
            unexpected: Vec::new(),
            mismatched: Vec::new(),
        })?;

        let workdir = tempfile::tempdir()?;
        let ckpt_file = workdir.path().join("model.safetensors");
        candle_core::safetensors::save(state.tensors(), &ckpt_file)?;

        let vocab_file = match &self.vocab {
            Some(vocab) => {
                let path = workdir.path().join("vocab.txt");
                write_vocab(&path, vocab)?;
                Some(path)
            }
            None => None,
        };

        Ok(F5CliModel {
            program: self.program,
            device: self.device,
            ckpt_file,
            vocab_file,
            workdir,
        })
    }
}

fn write_vocab(path: &Path, vocab: &VocabMap) -> std::io::Result<()> {
    let mut entries: Vec<(&String, &usize)> = vocab.iter().collect();
    entries.sort_by_key(|(_, i)| **i);
    let mut out = fs::File::create(path)?;
    for (token, _) in entries {
        writeln!(out, "{token}")?;
    }
    Ok(())
}

/// Frozen model: exported weights in a scratch directory that lives as long
/// as the model.
#[derive(Debug)]
pub struct F5CliModel {
    program: String,
    device: &'static str,
    ckpt_file: PathBuf,
    vocab_file: Option<PathBuf>,
    workdir: TempDir,
}

impl F5CliModel {
    fn command(&self, vocoder: &F5CliVocoder, ref_audio: &Path, text: &str, out_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--model")
            .arg(MODEL_NAME)
            .arg("--ckpt_file")
            .arg(&self.ckpt_file)
            .arg("--ref_audio")
            .arg(ref_audio)
            .arg("--ref_text")
            .arg("")
            .arg("--gen_text")
            .arg(text)
            .arg("--output_dir")
            .arg(out_dir)
            .arg("--output_file")
            .arg(OUTPUT_NAME)
            .arg("--vocoder_name")
            .arg(&vocoder.name)
            .arg("--device")
            .arg(self.device);
        if let Some(vocab_file) = &self.vocab_file {
            cmd.arg("--vocab_file").arg(vocab_file);
        }
        cmd
    }
}

impl Synthesizer for F5CliModel {
    type Vocoder = F5CliVocoder;

    fn infer(&self, vocoder: &F5CliVocoder, ref_audio: &Path, text: &str) -> InferResult<Vec<f32>> {
        let out_dir = self.workdir.path().join("out");
        fs::create_dir_all(&out_dir)?;

        info!("Running {}", self.program);
        let output = self
            .command(vocoder, ref_audio, text, &out_dir)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;
        if !output.status.success() {
            return Err(anyhow::anyhow!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )
            .into());
        }

        let produced = out_dir.join(OUTPUT_NAME);
        let audio = dataset_core::audio::load_mono(&produced, OUTPUT_SAMPLE_RATE)
            .with_context(|| format!("{} produced no readable audio", self.program))?;
        Ok(audio.samples)
    }
}
