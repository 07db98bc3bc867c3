use std::fmt;

use ndarray::ArrayD;

use crate::error::Result;

/// Trait defining the interface every layer in a [`Sequential`](crate::sequential::Sequential) exposes
pub trait Module: fmt::Display + Send + Sync {
    /// Perform forward propagation. Inputs keep their leading batch axis.
    fn forward(&mut self, input: ArrayD<f32>) -> Result<ArrayD<f32>>;

    /// Infer the output shape for `input` without running the layer
    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>>;

    /// Total number of learnable scalars (weights and biases)
    fn num_parameters(&self) -> usize {
        0
    }

    /// Switch between training and inference behaviour
    fn set_training(&mut self, training: bool) {
        let _ = training;
    }

    /// Short type name, used in error reports and summaries
    fn name(&self) -> &'static str;

    /// Clone the layer into a boxed trait object
    fn clone_box(&self) -> Box<dyn Module>;
}

impl Clone for Box<dyn Module> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Render a shape the way the error messages and summaries print it
pub(crate) fn shape_str(shape: &[usize]) -> String {
    format!("{:?}", shape)
}
