use std::fmt;

use ndarray::ArrayD;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::traits::Module;
use crate::error::{Result, SeqnetError};

/// Dropout Layer
///
/// Randomly sets input units to 0 with probability p during training and
/// scales the survivors by `1 / (1 - p)`. Identity in inference mode.
#[derive(Clone, Debug)]
pub struct DropoutLayer {
    /// Dropout probability (probability of dropping a unit)
    pub dropout_rate: f32,

    /// Whether we're in training mode
    pub training: bool,

    rng: StdRng,
}

impl DropoutLayer {
    /// Create a new dropout layer in training mode
    pub fn new(dropout_rate: f32) -> Result<Self> {
        Self::build(dropout_rate, StdRng::from_entropy())
    }

    /// Create a dropout layer whose masks are reproducible
    pub fn with_seed(dropout_rate: f32, seed: u64) -> Result<Self> {
        Self::build(dropout_rate, StdRng::seed_from_u64(seed))
    }

    fn build(dropout_rate: f32, rng: StdRng) -> Result<Self> {
        if !(0.0..1.0).contains(&dropout_rate) {
            return Err(SeqnetError::invalid_parameter(
                "dropout_rate".to_string(),
                format!("Dropout rate must be in [0, 1), got {}", dropout_rate),
            ));
        }

        Ok(DropoutLayer {
            dropout_rate,
            training: true,
            rng,
        })
    }
}

impl Module for DropoutLayer {
    fn forward(&mut self, mut input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        if !self.training || self.dropout_rate == 0.0 {
            // No dropout during inference or if rate is 0
            return Ok(input);
        }

        let rate = self.dropout_rate;
        let scale = 1.0 / (1.0 - rate);
        let rng = &mut self.rng;
        input.mapv_inplace(|v| if rng.gen::<f32>() < rate { 0.0 } else { v * scale });
        Ok(input)
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        Ok(input.to_vec())
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn name(&self) -> &'static str {
        "Dropout"
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }
}

impl fmt::Display for DropoutLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dropout(p={})", self.dropout_rate)
    }
}
