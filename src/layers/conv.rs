//! Convolutional layer for processing spatial data
//!
//! Inputs are NCHW batches `[batch, channels, height, width]`.

use std::fmt;

use ndarray::{s, Array1, Array2, Array4, ArrayD, Axis, Ix4};

use super::initialization::{checked_len, WeightInit};
use super::traits::{shape_str, Module};
use crate::error::{Result, SeqnetError};

/// 2D Convolutional Layer
///
/// Applies 2D convolution over an input signal composed of several input planes.
#[derive(Clone, Debug)]
pub struct Conv2DLayer {
    /// Convolution kernels/filters [out_channels, in_channels, kernel_height, kernel_width]
    pub kernels: Array4<f32>,

    /// Bias terms for each output channel
    pub biases: Array1<f32>,

    /// Stride for convolution
    pub stride: (usize, usize),

    /// Zero padding added to both sides of each spatial axis
    pub padding: (usize, usize),

    /// Number of input channels
    pub in_channels: usize,

    /// Number of output channels (filters)
    pub out_channels: usize,

    /// Kernel size
    pub kernel_size: (usize, usize),
}

impl Conv2DLayer {
    /// Create a new 2D convolutional layer
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        weight_init: WeightInit,
    ) -> Result<Self> {
        for (name, value) in [
            ("in_channels", in_channels),
            ("out_channels", out_channels),
            ("kernel_size", kernel_size.0.min(kernel_size.1)),
            ("stride", stride.0.min(stride.1)),
        ] {
            if value == 0 {
                return Err(SeqnetError::invalid_parameter(
                    name.to_string(),
                    format!("{} must be greater than 0 for Conv2d", name),
                ));
            }
        }

        checked_len("Conv2d kernels", &[out_channels, in_channels, kernel_size.0, kernel_size.1])?;
        let fan_in = checked_len("Conv2d fan_in", &[in_channels, kernel_size.0, kernel_size.1])?;
        let fan_out = checked_len("Conv2d fan_out", &[out_channels, kernel_size.0, kernel_size.1])?;
        let kernels = weight_init.initialize(
            (out_channels, in_channels, kernel_size.0, kernel_size.1),
            fan_in,
            fan_out,
        );
        let biases = weight_init.initialize_biases(out_channels);

        Ok(Conv2DLayer {
            kernels,
            biases,
            stride,
            padding,
            in_channels,
            out_channels,
            kernel_size,
        })
    }

    /// Spatial output size for an input of `height` x `width`
    pub fn spatial_output(&self, height: usize, width: usize) -> Result<(usize, usize)> {
        Ok((
            window_output_size("Conv2d height", height, self.kernel_size.0, self.stride.0, self.padding.0)?,
            window_output_size("Conv2d width", width, self.kernel_size.1, self.stride.1, self.padding.1)?,
        ))
    }

    fn check_input(&self, shape: &[usize]) -> Result<(usize, usize, usize, usize)> {
        match *shape {
            [batch, channels, height, width] if channels == self.in_channels => {
                let (out_height, out_width) = self.spatial_output(height, width)?;
                Ok((batch, channels, out_height, out_width))
            }
            [_, channels, _, _] => Err(SeqnetError::dimension_mismatch(
                format!("{} input channels", self.in_channels),
                format!("{} input channels", channels),
            )),
            _ => Err(SeqnetError::dimension_mismatch(
                "[batch, channels, height, width]".to_string(),
                shape_str(shape),
            )),
        }
    }

    /// Perform 2D convolution by unrolling each receptive field into a column
    fn convolve2d(&self, input: &Array4<f32>) -> Result<Array4<f32>> {
        let (batch_size, _, out_height, out_width) = self.check_input(input.shape())?;
        let (kh, kw) = self.kernel_size;
        let patch_len = self.in_channels * kh * kw;

        let padded = pad_spatial(input, self.padding, 0.0)?;
        let kernels_2d = self.kernels.to_shape((self.out_channels, patch_len))?;
        let biases = self.biases.view().insert_axis(Axis(1));

        let mut output = Array4::zeros((batch_size, self.out_channels, out_height, out_width));
        let mut columns = Array2::zeros((patch_len, out_height * out_width));

        for b in 0..batch_size {
            for oh in 0..out_height {
                for ow in 0..out_width {
                    let h_start = oh * self.stride.0;
                    let w_start = ow * self.stride.1;
                    let patch = padded.slice(s![b, .., h_start..h_start + kh, w_start..w_start + kw]);
                    let mut column = columns.column_mut(oh * out_width + ow);
                    for (dst, &src) in column.iter_mut().zip(patch.iter()) {
                        *dst = src;
                    }
                }
            }

            let result = kernels_2d.dot(&columns) + &biases;
            let result = result.into_shape((self.out_channels, out_height, out_width))?;
            output.index_axis_mut(Axis(0), b).assign(&result);
        }

        Ok(output)
    }
}

impl Module for Conv2DLayer {
    fn forward(&mut self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        self.check_input(input.shape())?;
        let input = input.into_dimensionality::<Ix4>()?;
        Ok(self.convolve2d(&input)?.into_dyn())
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        let (batch, _, out_height, out_width) = self.check_input(input)?;
        Ok(vec![batch, self.out_channels, out_height, out_width])
    }

    fn num_parameters(&self) -> usize {
        self.kernels.len() + self.biases.len()
    }

    fn name(&self) -> &'static str {
        "Conv2d"
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }
}

impl fmt::Display for Conv2DLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conv2d({}, {}, kernel_size={:?}, stride={:?}, padding={:?})",
            self.in_channels, self.out_channels, self.kernel_size, self.stride, self.padding
        )
    }
}

/// Output length of a sliding window along one axis.
///
/// Fails when the padded input is smaller than the window.
pub(crate) fn window_output_size(
    axis: &str,
    input: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
) -> Result<usize> {
    let padded = padding
        .checked_mul(2)
        .and_then(|both_sides| both_sides.checked_add(input))
        .ok_or_else(|| {
            SeqnetError::invalid_parameter("padding".to_string(), format!("{} padding of {} overflows", axis, padding))
        })?;
    if padded < kernel {
        return Err(SeqnetError::dimension_mismatch(
            format!("{} of at least {} (after padding)", axis, kernel),
            format!("{} of {}", axis, padded),
        ));
    }
    Ok((padded - kernel) / stride + 1)
}

/// Pad the two spatial axes of an NCHW batch with `value`
pub(crate) fn pad_spatial(input: &Array4<f32>, padding: (usize, usize), value: f32) -> Result<Array4<f32>> {
    if padding == (0, 0) {
        return Ok(input.clone());
    }

    let (batch_size, channels, height, width) = input.dim();
    let padded_height = window_output_size("height", height, 1, 1, padding.0)?;
    let padded_width = window_output_size("width", width, 1, 1, padding.1)?;
    checked_len("padded input", &[batch_size, channels, padded_height, padded_width])?;
    let mut padded = Array4::from_elem((batch_size, channels, padded_height, padded_width), value);

    // Copy input to center of padded array
    padded
        .slice_mut(s![.., .., padding.0..padding.0 + height, padding.1..padding.1 + width])
        .assign(input);

    Ok(padded)
}
