use std::fmt;

use ndarray::{ArrayD, IxDyn};

use super::traits::{shape_str, Module};
use crate::error::{Result, SeqnetError};

/// Collapses every axis after the batch axis into one
#[derive(Clone, Copy, Debug, Default)]
pub struct FlattenLayer;

impl FlattenLayer {
    pub fn new() -> Self {
        FlattenLayer
    }
}

impl Module for FlattenLayer {
    fn forward(&mut self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let shape = self.output_shape(input.shape())?;
        let input = if input.is_standard_layout() {
            input
        } else {
            input.as_standard_layout().into_owned()
        };
        Ok(input.into_shape(IxDyn(&shape))?)
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        match input.split_first() {
            Some((&batch, rest)) => Ok(vec![batch, rest.iter().product()]),
            None => Err(SeqnetError::dimension_mismatch(
                "at least a batch axis".to_string(),
                shape_str(input),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "Flatten"
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(*self)
    }
}

impl fmt::Display for FlattenLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Flatten(start_dim=1, end_dim=-1)")
    }
}
