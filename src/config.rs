//! Architecture configuration files
//!
//! A JSON document lists blocks in order; each block is assembled with the
//! same helpers used from code and the results are concatenated. Integer
//! slots follow the sentinel convention: `-1`, or leaving trailing entries
//! out, selects the default. The dropout slot of a linear layer differs:
//! leaving it out means no dropout, while a negative value selects 0.5.
//!
//! ```json
//! {
//!   "blocks": [
//!     { "type": "conv", "layers": [[3, 64, 3, -1, 1], [64, 64, 3, -1, 1]], "pool": [2] },
//!     { "type": "flatten" },
//!     { "type": "linear", "layers": [[16384, 256, -1]] },
//!     { "type": "linear", "layers": [[256, 10]], "activation": null }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::builders::{
    concat_sequences, conv_block, linear_block, BlockOptions, ConvSpec, LinearSpec, PoolSpec, DEFAULT,
};
use crate::error::{Result, SeqnetError};
use crate::layers::{FlattenLayer, PoolKind, WeightInit};
use crate::sequential::Sequential;

/// One block of an architecture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockConfig {
    /// Convolutions with a shared activation, optionally closed by pooling
    Conv {
        /// `[in, out, kernel, stride, padding]`; only `in` and `out` are required
        layers: Vec<Vec<i64>>,
        /// `[kernel, stride, padding]`, all optional
        #[serde(default)]
        pool: Option<Vec<i64>>,
        #[serde(default)]
        pool_kind: PoolKind,
        #[serde(default = "default_activation")]
        activation: Option<Activation>,
        #[serde(default)]
        weight_init: Option<WeightInit>,
    },

    /// Fully connected layers; `null` activation gives a bare output head
    Linear {
        /// `[in, out, dropout]`; an omitted dropout means none, a negative one means 0.5
        layers: Vec<Vec<f64>>,
        #[serde(default = "default_activation")]
        activation: Option<Activation>,
        #[serde(default)]
        weight_init: Option<WeightInit>,
        #[serde(default)]
        dropout_seed: Option<u64>,
    },

    Flatten,
}

fn default_activation() -> Option<Activation> {
    Some(Activation::Relu)
}

/// Configuration for the entire network: blocks applied in the order listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    pub blocks: Vec<BlockConfig>,
}

impl ArchitectureConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: ArchitectureConfig = serde_json::from_str(contents)?;
        if config.blocks.is_empty() {
            return Err(SeqnetError::Config(
                "Architecture must have at least one block".to_string(),
            ));
        }
        Ok(config)
    }

    /// Use `init` for every block, replacing what the file asked for
    pub fn override_weight_init(&mut self, init: WeightInit) {
        for block in &mut self.blocks {
            match block {
                BlockConfig::Conv { weight_init, .. } | BlockConfig::Linear { weight_init, .. } => {
                    *weight_init = Some(init);
                }
                BlockConfig::Flatten => {}
            }
        }
    }

    /// Assemble every block and concatenate them
    pub fn build(&self) -> Result<Sequential> {
        let blocks = self
            .blocks
            .iter()
            .enumerate()
            .map(|(index, block)| block.build().map_err(|e| e.in_block(index)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(blocks = blocks.len(), "built architecture from config");
        Ok(concat_sequences(blocks))
    }
}

impl BlockConfig {
    /// Assemble this block alone
    pub fn build(&self) -> Result<Sequential> {
        match self {
            BlockConfig::Conv {
                layers,
                pool,
                pool_kind,
                activation,
                weight_init,
            } => {
                let specs = layers
                    .iter()
                    .map(|entry| {
                        let [i, o, k, s, p] = padded_slots::<5>("conv layer", entry, 2)?;
                        ConvSpec::from_params((i, o, k, s, p))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let pool = pool
                    .as_ref()
                    .map(|entry| -> Result<PoolSpec> {
                        let [k, s, p] = padded_slots::<3>("pool", entry, 0)?;
                        Ok(PoolSpec::from_params((k, s, p))?.kind(*pool_kind))
                    })
                    .transpose()?;

                conv_block(&specs, pool, &options(*activation, *weight_init, None))
            }

            BlockConfig::Linear {
                layers,
                activation,
                weight_init,
                dropout_seed,
            } => {
                let specs = layers
                    .iter()
                    .map(|entry| linear_spec(entry))
                    .collect::<Result<Vec<_>>>()?;

                linear_block(&specs, &options(*activation, *weight_init, *dropout_seed))
            }

            BlockConfig::Flatten => Ok(Sequential::new().add(FlattenLayer::new())),
        }
    }
}

fn options(activation: Option<Activation>, weight_init: Option<WeightInit>, dropout_seed: Option<u64>) -> BlockOptions {
    BlockOptions {
        activation,
        weight_init,
        dropout_seed,
    }
}

/// Fill the slots missing from `entry` with the sentinel.
///
/// The first `required` slots must be present.
fn padded_slots<const N: usize>(what: &str, entry: &[i64], required: usize) -> Result<[i64; N]> {
    if entry.len() < required || entry.len() > N {
        return Err(SeqnetError::Config(format!(
            "{} expects between {} and {} entries, got {}",
            what,
            required,
            N,
            entry.len()
        )));
    }
    let mut slots = [DEFAULT; N];
    slots[..entry.len()].copy_from_slice(entry);
    Ok(slots)
}

fn linear_spec(entry: &[f64]) -> Result<LinearSpec> {
    match *entry {
        [i, o] => LinearSpec::from_params((whole("in_features", i)?, whole("out_features", o)?, 0.0)),
        [i, o, dropout] => LinearSpec::from_params((whole("in_features", i)?, whole("out_features", o)?, dropout)),
        _ => Err(SeqnetError::Config(format!(
            "linear layer expects 2 or 3 entries, got {}",
            entry.len()
        ))),
    }
}

fn whole(name: &str, value: f64) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(SeqnetError::Config(format!("{} must be an integer, got {}", name, value)));
    }
    // i64::MAX as f64 rounds up to 2^63
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(SeqnetError::Config(format!("{} is out of range, got {}", name, value)));
    }
    Ok(value as i64)
}

/// Loads an architecture configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use seqnet::config::load_architecture;
///
/// let arch = load_architecture("architectures/vgg19.json").unwrap();
/// let model = arch.build().unwrap();
/// assert!(!model.is_empty());
/// ```
pub fn load_architecture<P: AsRef<Path>>(path: P) -> Result<ArchitectureConfig> {
    let contents = fs::read_to_string(path)?;
    ArchitectureConfig::from_json(&contents)
}
