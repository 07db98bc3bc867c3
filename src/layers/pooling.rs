//! Pooling layers for downsampling spatial data
//!
//! This module provides max pooling and average pooling over NCHW batches.

use std::fmt;

use ndarray::{s, Array4, ArrayD, Ix4};
use serde::{Deserialize, Serialize};

use super::conv::{pad_spatial, window_output_size};
use super::traits::{shape_str, Module};
use crate::error::{Result, SeqnetError};

/// Reduction applied over each pooling window
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    #[default]
    Max,
    Avg,
}

/// Window geometry shared by both pooling layers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolWindow {
    /// Pooling window size
    pub pool_size: (usize, usize),

    /// Stride for pooling
    pub stride: (usize, usize),

    /// Implicit padding on both sides of each spatial axis
    pub padding: (usize, usize),
}

impl PoolWindow {
    /// A window whose stride defaults to its size
    pub fn new(
        pool_size: (usize, usize),
        stride: Option<(usize, usize)>,
        padding: (usize, usize),
    ) -> Result<Self> {
        let stride = stride.unwrap_or(pool_size);

        if pool_size.0 == 0 || pool_size.1 == 0 {
            return Err(SeqnetError::invalid_parameter(
                "kernel_size",
                "Pooling window must be greater than 0",
            ));
        }
        if stride.0 == 0 || stride.1 == 0 {
            return Err(SeqnetError::invalid_parameter("stride", "Pooling stride must be greater than 0"));
        }
        // Same restriction as PyTorch: padding may not exceed half the window
        if padding.0 * 2 > pool_size.0 || padding.1 * 2 > pool_size.1 {
            return Err(SeqnetError::invalid_parameter(
                "padding",
                "Pooling padding must be at most half the window size",
            ));
        }

        Ok(PoolWindow {
            pool_size,
            stride,
            padding,
        })
    }

    fn output_dims(&self, shape: &[usize]) -> Result<(usize, usize, usize, usize)> {
        match *shape {
            [batch, channels, height, width] => Ok((
                batch,
                channels,
                window_output_size("pool height", height, self.pool_size.0, self.stride.0, self.padding.0)?,
                window_output_size("pool width", width, self.pool_size.1, self.stride.1, self.padding.1)?,
            )),
            _ => Err(SeqnetError::dimension_mismatch(
                "[batch, channels, height, width]".to_string(),
                shape_str(shape),
            )),
        }
    }

    /// Reduce every window of a padded input with `reduce`
    fn pool<F>(&self, input: ArrayD<f32>, pad_value: f32, reduce: F) -> Result<Array4<f32>>
    where
        F: Fn(ndarray::ArrayView4<f32>) -> f32,
    {
        let (batch_size, channels, out_height, out_width) = self.output_dims(input.shape())?;
        let input = input.into_dimensionality::<Ix4>()?;
        let padded = pad_spatial(&input, self.padding, pad_value)?;

        let mut output = Array4::zeros((batch_size, channels, out_height, out_width));
        for oh in 0..out_height {
            for ow in 0..out_width {
                let h_start = oh * self.stride.0;
                let w_start = ow * self.stride.1;
                let h_end = h_start + self.pool_size.0;
                let w_end = w_start + self.pool_size.1;

                for b in 0..batch_size {
                    for c in 0..channels {
                        let window = padded.slice(s![b..b + 1, c..c + 1, h_start..h_end, w_start..w_end]);
                        output[[b, c, oh, ow]] = reduce(window);
                    }
                }
            }
        }

        Ok(output)
    }
}

/// 2D Max Pooling Layer
///
/// Applies max pooling over spatial dimensions to reduce size and extract dominant features.
#[derive(Clone, Debug)]
pub struct MaxPool2DLayer {
    pub window: PoolWindow,
}

impl MaxPool2DLayer {
    /// Create a new 2D max pooling layer
    pub fn new(window: PoolWindow) -> Self {
        MaxPool2DLayer { window }
    }
}

impl Module for MaxPool2DLayer {
    fn forward(&mut self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let output = self.window.pool(input, f32::NEG_INFINITY, |window| {
            window.iter().fold(f32::NEG_INFINITY, |max, &v| max.max(v))
        })?;
        Ok(output.into_dyn())
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        let (b, c, h, w) = self.window.output_dims(input)?;
        Ok(vec![b, c, h, w])
    }

    fn name(&self) -> &'static str {
        "MaxPool2d"
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }
}

impl fmt::Display for MaxPool2DLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MaxPool2d(kernel_size={:?}, stride={:?}, padding={:?})",
            self.window.pool_size, self.window.stride, self.window.padding
        )
    }
}

/// 2D Average Pooling Layer
///
/// Padded zeros count towards the average.
#[derive(Clone, Debug)]
pub struct AvgPool2DLayer {
    pub window: PoolWindow,
}

impl AvgPool2DLayer {
    /// Create a new 2D average pooling layer
    pub fn new(window: PoolWindow) -> Self {
        AvgPool2DLayer { window }
    }
}

impl Module for AvgPool2DLayer {
    fn forward(&mut self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let pool_area = (self.window.pool_size.0 * self.window.pool_size.1) as f32;
        let output = self.window.pool(input, 0.0, |window| window.sum() / pool_area)?;
        Ok(output.into_dyn())
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        let (b, c, h, w) = self.window.output_dims(input)?;
        Ok(vec![b, c, h, w])
    }

    fn name(&self) -> &'static str {
        "AvgPool2d"
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }
}

impl fmt::Display for AvgPool2DLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AvgPool2d(kernel_size={:?}, stride={:?}, padding={:?})",
            self.window.pool_size, self.window.stride, self.window.padding
        )
    }
}

/// Build the pooling layer for `kind`
pub fn pool_layer(kind: PoolKind, window: PoolWindow) -> Box<dyn Module> {
    match kind {
        PoolKind::Max => Box::new(MaxPool2DLayer::new(window)),
        PoolKind::Avg => Box::new(AvgPool2DLayer::new(window)),
    }
}
