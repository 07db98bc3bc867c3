use std::fmt;

use ndarray::ArrayD;

use super::traits::Module;
use crate::activations::Activation;
use crate::error::Result;

/// An activation function standing as its own layer in a container
#[derive(Clone, Copy, Debug)]
pub struct ActivationLayer {
    pub activation: Activation,
}

impl ActivationLayer {
    pub fn new(activation: Activation) -> Self {
        ActivationLayer { activation }
    }
}

impl Module for ActivationLayer {
    fn forward(&mut self, mut input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.activation.apply(&mut input);
        Ok(input)
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        Ok(input.to_vec())
    }

    fn name(&self) -> &'static str {
        match self.activation {
            Activation::Relu => "ReLU",
            Activation::Linear => "Identity",
            Activation::Sigmoid => "Sigmoid",
            Activation::Tanh => "Tanh",
            Activation::LeakyRelu { .. } => "LeakyReLU",
            Activation::Elu { .. } => "ELU",
            Activation::Gelu => "GELU",
        }
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(*self)
    }
}

impl fmt::Display for ActivationLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.activation, f)
    }
}
