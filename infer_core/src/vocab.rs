//! Character vocabulary written by the dataset preparer.

use std::{collections::HashMap, fs, path::Path};

use tracing::{info, warn};

use crate::error::InferResult;

/// Vocabulary size used when no vocabulary file is available.
pub const FALLBACK_VOCAB_SIZE: usize = 100;

/// Character (one line of `vocab.txt`) to index, index == line number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabMap {
    map: HashMap<String, usize>,
}

impl VocabMap {
    /// Parse vocabulary text. Only line terminators are stripped so the
    /// space entry survives.
    pub fn parse(content: &str) -> Self {
        let map = content
            .lines()
            .enumerate()
            .map(|(i, line)| (line.to_string(), i))
            .collect();
        Self { map }
    }

    pub fn get(&self, token: &str) -> Option<usize> {
        self.map.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &usize)> {
        self.map.iter()
    }
}

/// Load `vocab.txt` if it exists.
///
/// A missing file is not an error: a warning is logged and `None` is
/// returned, and the model is then built with [`FALLBACK_VOCAB_SIZE`] and no
/// character map. Text encoding may be wrong in that mode.
pub fn load_vocab(path: &Path) -> InferResult<Option<VocabMap>> {
    if !path.exists() {
        warn!(
            "vocab.txt not found at {}; using the default map, characters may not encode correctly",
            path.display()
        );
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let vocab = VocabMap::parse(&content);
    info!("Loaded {} vocabulary entries from {}", vocab.len(), path.display());
    Ok(Some(vocab))
}

/// Size of the text embedding table: one slot per entry plus padding.
pub fn vocab_size(vocab: Option<&VocabMap>) -> usize {
    match vocab {
        Some(v) if !v.is_empty() => v.len() + 1,
        _ => FALLBACK_VOCAB_SIZE,
    }
}
