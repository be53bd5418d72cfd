//! Inference orchestration for F5-style TTS checkpoints.
//!
//! Loads the character vocabulary produced by `dataset_core`, builds a model
//! shell with the fixed architecture description, restores weights from a
//! checkpoint and runs one synthesis through a [`model::ModelFactory`].

pub mod checkpoint;
pub mod config;
pub mod device;
pub mod error;
pub mod f5_cli;
pub mod model;
pub mod model_config;
pub mod runner;
pub mod vocab;

pub use checkpoint::{Checkpoint, StateDict, WeightLayout};
pub use config::InferConfig;
pub use device::select_device;
pub use error::{InferError, InferResult};
pub use f5_cli::F5CliFactory;
pub use model::{ModelFactory, ModelShell, Synthesizer};
pub use model_config::ModelConfig;
pub use runner::run;
pub use vocab::{load_vocab, VocabMap};
