use std::fmt;

use ndarray::{Array, Dimension};
use serde::{Deserialize, Serialize};

use super::gelu::Gelu;

/// An enumeration of the activation functions a block can insert after each layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Relu,
    Linear,
    Sigmoid,
    Tanh,
    LeakyRelu { alpha: f32 },
    Elu { alpha: f32 },
    Gelu,
}

impl Activation {
    /// Apply the activation function to an input array in-place.
    pub fn apply<D: Dimension>(&self, input: &mut Array<f32, D>) {
        match self {
            Activation::Relu => {
                input.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
            Activation::Sigmoid => {
                input.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp()));
            }
            Activation::Tanh => {
                input.mapv_inplace(|v| v.tanh());
            }
            Activation::LeakyRelu { alpha } => {
                let a = *alpha;
                input.mapv_inplace(|v| if v > 0.0 { v } else { a * v });
            }
            Activation::Elu { alpha } => {
                let a = *alpha;
                input.mapv_inplace(|v| if v > 0.0 { v } else { a * (v.exp() - 1.0) });
            }
            Activation::Gelu => {
                input.mapv_inplace(Gelu::value);
            }
        }
    }

    /// Whether the activation scales like ReLU, which decides the default weight init
    pub fn is_relu_family(&self) -> bool {
        matches!(
            self,
            Activation::Relu | Activation::LeakyRelu { .. } | Activation::Elu { .. }
        )
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Relu => write!(f, "ReLU()"),
            Activation::Linear => write!(f, "Identity()"),
            Activation::Sigmoid => write!(f, "Sigmoid()"),
            Activation::Tanh => write!(f, "Tanh()"),
            Activation::LeakyRelu { alpha } => write!(f, "LeakyReLU(negative_slope={})", alpha),
            Activation::Elu { alpha } => write!(f, "ELU(alpha={})", alpha),
            Activation::Gelu => write!(f, "GELU(approximate='tanh')"),
        }
    }
}
