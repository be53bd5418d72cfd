//! Checkpoint loading and weight-layout resolution.
//!
//! Training code saves checkpoints in a few shapes: a dict holding
//! `ema_model_state_dict`, a dict holding `model_state_dict`, or the bare
//! state dict itself. The shape is resolved once, at load time, into a
//! [`WeightLayout`].

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    path::Path,
};

use candle_core::{pickle, Device, Tensor};
use tracing::{debug, info, warn};

use crate::{
    error::{InferError, InferResult},
    model_config::ModelConfig,
};

/// Prefix `DistributedDataParallel` adds to every parameter name.
pub const DDP_PREFIX: &str = "module.";

const TEXT_EMBED: &str = "transformer.text_embed.text_embed.weight";
const PROJ_OUT: &str = "transformer.proj_out.weight";
const BLOCKS: &str = "transformer.transformer_blocks.";
const ROOTS: [&str; 2] = ["transformer.", "mel_spec."];

/// Which sub-structure of the checkpoint the weights came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightLayout {
    /// `ema_model_state_dict`
    Ema,
    /// `model_state_dict`
    Model,
    /// The whole file is the state dict.
    Raw,
}

impl WeightLayout {
    /// Lookup order for pickled checkpoints.
    pub const ORDER: [WeightLayout; 3] = [WeightLayout::Ema, WeightLayout::Model, WeightLayout::Raw];

    pub fn key(self) -> Option<&'static str> {
        match self {
            WeightLayout::Ema => Some("ema_model_state_dict"),
            WeightLayout::Model => Some("model_state_dict"),
            WeightLayout::Raw => None,
        }
    }
}

impl fmt::Display for WeightLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => f.write_str(key),
            None => f.write_str("raw state dict"),
        }
    }
}

/// Parameter name to tensor, with the DDP prefix removed.
#[derive(Debug, Clone, Default)]
pub struct StateDict {
    tensors: HashMap<String, Tensor>,
}

impl StateDict {
    pub fn from_named(named: impl IntoIterator<Item = (String, Tensor)>) -> Self {
        let tensors = named
            .into_iter()
            .map(|(name, t)| match name.strip_prefix(DDP_PREFIX) {
                Some(stripped) => (stripped.to_string(), t),
                None => (name, t),
            })
            .collect();
        Self { tensors }
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.tensors.get(name)
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(String::as_str)
    }

    pub fn tensors(&self) -> &HashMap<String, Tensor> {
        &self.tensors
    }

    /// Check the parameter set against the architecture the shell was built
    /// with. Any missing, unexpected or wrongly shaped parameter fails the
    /// restore.
    pub fn verify_against(&self, config: &ModelConfig) -> InferResult<()> {
        let mut missing = Vec::new();
        let mut unexpected = Vec::new();
        let mut mismatched = Vec::new();

        let mut expect_shape = |name: &str, dims: [usize; 2]| match self.get(name) {
            None => missing.push(name.to_string()),
            Some(t) if t.dims() != dims => {
                mismatched.push(format!("{name} {:?} != {:?}", t.dims(), dims))
            }
            Some(_) => {}
        };
        expect_shape(
            TEXT_EMBED,
            [config.vocab_size + 1, config.backbone.text_dim],
        );
        expect_shape(
            PROJ_OUT,
            [config.mel_spec.n_mel_channels, config.backbone.dim],
        );

        let mut blocks = BTreeSet::new();
        for name in self.names() {
            if !ROOTS.iter().any(|root| name.starts_with(root)) {
                unexpected.push(name.to_string());
                continue;
            }
            if let Some(rest) = name.strip_prefix(BLOCKS) {
                match rest.split('.').next().and_then(|i| i.parse::<usize>().ok()) {
                    Some(i) if i < config.backbone.depth => {
                        blocks.insert(i);
                    }
                    _ => unexpected.push(name.to_string()),
                }
            }
        }
        for i in 0..config.backbone.depth {
            if !blocks.contains(&i) {
                missing.push(format!("{BLOCKS}{i}.*"));
            }
        }

        if missing.is_empty() && unexpected.is_empty() && mismatched.is_empty() {
            return Ok(());
        }
        unexpected.sort();
        Err(InferError::WeightRestore {
            missing,
            unexpected,
            mismatched,
        })
    }
}

/// Weights read from disk plus the layout they were found in.
#[derive(Debug)]
pub struct Checkpoint {
    pub layout: WeightLayout,
    pub state_dict: StateDict,
}

impl Checkpoint {
    /// Load a `.safetensors` file or a PyTorch pickle.
    pub fn load(path: &Path, device: &Device) -> InferResult<Self> {
        let is_safetensors = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("safetensors"));

        let (layout, named) = if is_safetensors {
            let tensors = candle_core::safetensors::load(path, device)?;
            (WeightLayout::Raw, tensors.into_iter().collect::<Vec<_>>())
        } else {
            let (layout, named) = select_layout(|key| pickle::read_all_with_key(path, key))?;
            let named = named
                .into_iter()
                .map(|(name, t)| Ok((name, t.to_device(device)?)))
                .collect::<candle_core::Result<Vec<_>>>()?;
            (layout, named)
        };

        let state_dict = StateDict::from_named(named);
        if state_dict.is_empty() {
            warn!("Checkpoint {} holds no tensors", path.display());
        }
        info!(
            "Checkpoint {}: {} tensors from {layout}",
            path.display(),
            state_dict.len()
        );
        Ok(Self { layout, state_dict })
    }
}

/// Try each layout in [`WeightLayout::ORDER`]; the first that yields tensors
/// wins. Only an absent key moves on to the next layout, any other read
/// error is returned as-is.
pub fn select_layout<F>(mut read: F) -> InferResult<(WeightLayout, Vec<(String, Tensor)>)>
where
    F: FnMut(Option<&str>) -> candle_core::Result<Vec<(String, Tensor)>>,
{
    for layout in WeightLayout::ORDER {
        match layout.key() {
            Some(key) => match read(Some(key)) {
                Ok(named) if !named.is_empty() => return Ok((layout, named)),
                Ok(_) => warn!("{key} present but holds no tensors, trying next layout"),
                Err(e) if is_missing_key(&e, key) => debug!("{key} not in checkpoint"),
                Err(e) => return Err(e.into()),
            },
            None => return Ok((layout, read(None)?)),
        }
    }
    unreachable!("WeightLayout::ORDER ends with Raw")
}

fn is_missing_key(err: &candle_core::Error, key: &str) -> bool {
    matches!(err, candle_core::Error::Msg(msg) if *msg == format!("key {key} not found"))
}
