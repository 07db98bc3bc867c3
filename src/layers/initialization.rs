use ndarray::{Array, Array1, Dimension, ShapeBuilder};
use ndarray_rand::rand_distr::{Normal, Uniform};
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

use crate::activations::Activation;
use crate::error::{Result, SeqnetError};

/// Weight initialization strategies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightInit {
    /// Xavier/Glorot uniform initialization
    XavierUniform,

    /// Xavier/Glorot normal initialization
    XavierNormal,

    /// He/Kaiming uniform initialization (for ReLU)
    HeUniform,

    /// He/Kaiming normal initialization (for ReLU)
    HeNormal,

    /// Uniform distribution with custom range
    Uniform { min: f32, max: f32 },

    /// Normal distribution with custom mean and std
    Normal { mean: f32, std: f32 },

    /// All zeros
    Zeros,

    /// All ones
    Ones,
}

impl WeightInit {
    /// Initialize a weight tensor of any rank.
    ///
    /// `fan_in` and `fan_out` are supplied by the layer, since their meaning
    /// differs between linear and convolutional kernels.
    pub fn initialize<Sh, D>(&self, shape: Sh, fan_in: usize, fan_out: usize) -> Array<f32, D>
    where
        Sh: ShapeBuilder<Dim = D>,
        D: Dimension,
    {
        let fan_in = fan_in.max(1) as f32;
        let fan_out = fan_out.max(1) as f32;

        match *self {
            WeightInit::XavierUniform => {
                let limit = (6.0 / (fan_in + fan_out)).sqrt();
                Array::random(shape, Uniform::new_inclusive(-limit, limit))
            }

            WeightInit::XavierNormal => {
                let std = (2.0 / (fan_in + fan_out)).sqrt();
                Array::random(shape, normal_or_fallback(0.0, std))
            }

            WeightInit::HeUniform => {
                let limit = (6.0 / fan_in).sqrt();
                Array::random(shape, Uniform::new_inclusive(-limit, limit))
            }

            WeightInit::HeNormal => {
                let std = (2.0 / fan_in).sqrt();
                Array::random(shape, normal_or_fallback(0.0, std))
            }

            WeightInit::Uniform { min, max } => {
                Array::random(shape, Uniform::new_inclusive(min.min(max), max.max(min)))
            }

            WeightInit::Normal { mean, std } => Array::random(shape, normal_or_fallback(mean, std)),

            WeightInit::Zeros => Array::zeros(shape),

            WeightInit::Ones => Array::ones(shape),
        }
    }

    /// Initialize biases for a layer
    pub fn initialize_biases(&self, size: usize) -> Array1<f32> {
        match self {
            WeightInit::Ones => Array1::ones(size),
            _ => Array1::zeros(size),
        }
    }

    /// Get the recommended initialization for an activation function
    pub fn for_activation(activation: Option<&Activation>) -> Self {
        match activation {
            Some(a) if a.is_relu_family() => WeightInit::HeNormal,
            _ => WeightInit::XavierNormal,
        }
    }
}

/// Element count of a `f32` tensor with axes `dims`.
///
/// Fails when the count or its size in bytes does not fit in `isize`.
pub(crate) fn checked_len(name: &str, dims: &[usize]) -> Result<usize> {
    let max_len = isize::MAX as usize / std::mem::size_of::<f32>();
    dims.iter()
        .try_fold(1usize, |len, &dim| len.checked_mul(dim))
        .filter(|&len| len <= max_len)
        .ok_or_else(|| {
            SeqnetError::invalid_parameter(name.to_string(), format!("shape {:?} is too large to allocate", dims))
        })
}

fn normal_or_fallback(mean: f32, std: f32) -> Normal<f32> {
    Normal::new(mean, std).unwrap_or(Normal::new(0.0, 0.01).expect("valid normal"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Ix2;

    #[test]
    fn test_xavier_uniform_bounds() {
        let weights: Array<f32, Ix2> = WeightInit::XavierUniform.initialize((10, 20), 10, 20);
        let limit = (6.0 / 30.0_f32).sqrt();
        assert!(weights.iter().all(|&w| w >= -limit && w <= limit));
    }

    #[test]
    fn test_constant_inits() {
        let zeros: Array<f32, Ix2> = WeightInit::Zeros.initialize((3, 4), 3, 4);
        assert!(zeros.iter().all(|&w| w == 0.0));
        let ones: Array<f32, Ix2> = WeightInit::Ones.initialize((3, 4), 3, 4);
        assert!(ones.iter().all(|&w| w == 1.0));
        assert_eq!(WeightInit::Ones.initialize_biases(4), Array1::<f32>::ones(4));
        assert_eq!(WeightInit::HeNormal.initialize_biases(4), Array1::<f32>::zeros(4));
    }

    #[test]
    fn test_for_activation() {
        assert_eq!(WeightInit::for_activation(Some(&Activation::Relu)), WeightInit::HeNormal);
        assert_eq!(WeightInit::for_activation(Some(&Activation::Tanh)), WeightInit::XavierNormal);
        assert_eq!(WeightInit::for_activation(None), WeightInit::XavierNormal);
    }

    #[test]
    fn test_checked_len() {
        assert_eq!(checked_len("weights", &[3, 4, 5]).unwrap(), 60);
        assert!(checked_len("weights", &[1 << 40, 1 << 40]).is_err());
        assert!(checked_len("weights", &[usize::MAX / 2, 1]).is_err());
    }
}
