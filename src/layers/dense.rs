use std::fmt;

use ndarray::{Array1, Array2, ArrayD, Axis, Ix2};

use super::initialization::{checked_len, WeightInit};
use super::traits::{shape_str, Module};
use crate::error::{Result, SeqnetError};

/// A fully connected (dense) layer: `y = x W + b`
#[derive(Clone, Debug)]
pub struct DenseLayer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
}

impl DenseLayer {
    /// Create a new dense layer with weights of shape `[input_size, output_size]`.
    /// The biases are initialized with zeros unless `weight_init` is `Ones`.
    pub fn new(input_size: usize, output_size: usize, weight_init: WeightInit) -> Result<Self> {
        if input_size == 0 || output_size == 0 {
            return Err(SeqnetError::invalid_parameter(
                "size",
                "Linear layer sizes must be greater than 0",
            ));
        }
        checked_len("Linear weights", &[input_size, output_size])?;

        Ok(DenseLayer {
            weights: weight_init.initialize((input_size, output_size), input_size, output_size),
            biases: weight_init.initialize_biases(output_size),
        })
    }

    pub fn with_weights(mut self, weights: Array2<f32>) -> Result<Self> {
        if weights.dim() != self.weights.dim() {
            return Err(SeqnetError::dimension_mismatch(
                format!("{:?}", self.weights.dim()),
                format!("{:?}", weights.dim()),
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    pub fn with_biases(mut self, biases: Array1<f32>) -> Result<Self> {
        if biases.dim() != self.biases.dim() {
            return Err(SeqnetError::dimension_mismatch(
                format!("{} biases", self.biases.len()),
                format!("{} biases", biases.len()),
            ));
        }
        self.biases = biases;
        Ok(self)
    }

    /// Get the input size of the layer
    pub fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }

    /// Get the output size of the layer
    pub fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }
}

impl Module for DenseLayer {
    fn forward(&mut self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.output_shape(input.shape())?;
        let inputs = input.into_dimensionality::<Ix2>()?;
        let outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        Ok(outputs.into_dyn())
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        match *input {
            [batch, features] if features == self.input_size() => Ok(vec![batch, self.output_size()]),
            [_, features] => Err(SeqnetError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", features),
            )),
            _ => Err(SeqnetError::dimension_mismatch(
                "[batch, features]".to_string(),
                shape_str(input),
            )),
        }
    }

    fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    fn name(&self) -> &'static str {
        "Linear"
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }
}

impl fmt::Display for DenseLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Linear(in_features={}, out_features={}, bias=True)",
            self.input_size(),
            self.output_size()
        )
    }
}
