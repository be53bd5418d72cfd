//! Fixed architecture description of the F5 checkpoints this tool loads.
//!
//! These values must match the configuration the checkpoint was trained
//! with. Nothing checks that up front; a mismatch shows up when weights are
//! restored.

use serde::Serialize;

use crate::vocab::{vocab_size, VocabMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DitConfig {
    pub dim: usize,
    pub depth: usize,
    pub heads: usize,
    pub ff_mult: usize,
    pub text_dim: usize,
    pub conv_layers: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MelSpecConfig {
    pub target_sample_rate: u32,
    pub n_mel_channels: usize,
    pub hop_length: usize,
    pub win_length: usize,
    pub n_fft: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelConfig {
    pub name: String,
    pub vocab_size: usize,
    pub backbone: DitConfig,
    pub mel_spec: MelSpecConfig,
}

impl ModelConfig {
    /// F5-TTS base: DiT 1024 x 22, 16 heads, 100 mel bins at 24 kHz.
    pub fn f5_base(vocab: Option<&VocabMap>) -> Self {
        Self {
            name: "F5-TTS".to_string(),
            vocab_size: vocab_size(vocab),
            backbone: DitConfig {
                dim: 1024,
                depth: 22,
                heads: 16,
                ff_mult: 2,
                text_dim: 512,
                conv_layers: 4,
            },
            mel_spec: MelSpecConfig {
                target_sample_rate: 24000,
                n_mel_channels: 100,
                hop_length: 256,
                win_length: 1024,
                n_fft: 1024,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_vocab_size() {
        let cfg = ModelConfig::f5_base(None);
        assert_eq!(cfg.vocab_size, 100);
        assert_eq!(cfg.backbone.depth, 22);
        assert_eq!(cfg.mel_spec.target_sample_rate, 24000);
    }

    #[test]
    fn test_vocab_size_from_map() {
        let vocab = VocabMap::parse("a\nb\n");
        assert_eq!(ModelConfig::f5_base(Some(&vocab)).vocab_size, 3);
    }
}
