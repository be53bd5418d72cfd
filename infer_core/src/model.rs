//! Seams to the external modeling framework.
//!
//! A [`ModelFactory`] builds an untrained [`ModelShell`] from the fixed
//! architecture description. Restoring weights mutates the shell; switching
//! it to evaluation mode consumes it and yields a [`Synthesizer`], which only
//! exposes read-only synthesis for the rest of the run.

use std::path::Path;

use candle_core::Device;

use crate::{
    checkpoint::StateDict, error::InferResult, model_config::ModelConfig, vocab::VocabMap,
};

pub trait ModelFactory {
    type Vocoder;
    type Model: Synthesizer<Vocoder = Self::Vocoder>;
    type Shell: ModelShell<Ready = Self::Model>;

    /// Construct a model with freshly initialized weights.
    fn build(
        &self,
        config: &ModelConfig,
        vocab: Option<&VocabMap>,
        device: &Device,
    ) -> InferResult<Self::Shell>;

    fn load_vocoder(&self, device: &Device) -> InferResult<Self::Vocoder>;
}

pub trait ModelShell {
    type Ready: Synthesizer;

    /// Strict restore: missing or unexpected parameters are an error.
    fn load_state_dict(&mut self, state: StateDict) -> InferResult<()>;

    /// Freeze the model for inference.
    fn eval(self) -> InferResult<Self::Ready>;
}

pub trait Synthesizer {
    type Vocoder;

    /// Generate speech for `text` in the voice of `ref_audio`.
    ///
    /// Returns mono samples at 24 kHz.
    fn infer(&self, vocoder: &Self::Vocoder, ref_audio: &Path, text: &str) -> InferResult<Vec<f32>>;
}
