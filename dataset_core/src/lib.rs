//! Dataset preparation for F5-style TTS training.
//!
//! Reads a `texts.txt` index, resolves each line to a WAV file, normalizes the
//! transcript, filters clips by duration, re-encodes them at 24 kHz and writes
//! an on-disk Arrow dataset plus `vocab.txt` and `duration.json`.

pub mod audio;
pub mod config;
pub mod error;
pub mod normalize;
pub mod numerals;
pub mod pipeline;
pub mod report;
pub mod transcript;
pub mod writer;

pub use config::PrepareConfig;
pub use error::{PrepareError, PrepareResult};
pub use normalize::clean_text;
pub use pipeline::prepare;
pub use report::{LineOutcome, PrepareReport, SkipReason};
pub use writer::{DatasetTable, Sample};
