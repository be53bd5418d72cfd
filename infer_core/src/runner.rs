//! The inference run: checks, vocabulary, model, weights, synthesis, output.

use std::path::PathBuf;

use candle_core::Device;
use tracing::{debug, info};

use crate::{
    checkpoint::Checkpoint,
    config::{InferConfig, OUTPUT_SAMPLE_RATE},
    error::{InferError, InferResult},
    model::{ModelFactory, ModelShell, Synthesizer},
    model_config::ModelConfig,
    vocab::load_vocab,
};

/// Run one synthesis and write the result to `config.output_file`.
///
/// The checkpoint and reference audio are checked before anything else, so a
/// bad path never leaves a partial output behind.
pub fn run<F: ModelFactory>(
    config: &InferConfig,
    factory: &F,
    device: &Device,
) -> InferResult<PathBuf> {
    info!("Starting inference");
    if !config.ckpt_path.exists() {
        return Err(InferError::not_found("checkpoint", &config.ckpt_path));
    }
    if !config.ref_audio.exists() {
        return Err(InferError::not_found("reference audio", &config.ref_audio));
    }

    let vocab = load_vocab(&config.vocab_file)?;
    let model_config = ModelConfig::f5_base(vocab.as_ref());
    debug!(
        "Model config: {}",
        serde_json::to_string(&model_config).unwrap_or_default()
    );

    let mut shell = factory.build(&model_config, vocab.as_ref(), device)?;

    info!("Loading checkpoint: {}", config.ckpt_path.display());
    let checkpoint = Checkpoint::load(&config.ckpt_path, device)?;
    shell.load_state_dict(checkpoint.state_dict)?;
    let model = shell.eval()?;

    let vocoder = factory.load_vocoder(device)?;

    info!("Speaking: '{}'", config.text);
    let samples = model.infer(&vocoder, &config.ref_audio, &config.text)?;

    dataset_core::audio::write_wav(&config.output_file, &samples, OUTPUT_SAMPLE_RATE)
        .map_err(InferError::Output)?;
    info!(
        "Audio saved to {} ({:.2}s)",
        config.output_file.display(),
        samples.len() as f64 / OUTPUT_SAMPLE_RATE as f64
    );
    Ok(config.output_file.clone())
}
