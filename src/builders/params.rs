//! Parameter normalization for tuple-style layer specifications.
//!
//! Tuple slots carry plain integers, and the sentinel [`DEFAULT`] (`-1`) in an
//! optional slot stands for "use the default". Every tuple is normalized into a
//! typed spec before any layer is built, so the rest of the crate only ever
//! sees `usize` sizes and validated rates.

use crate::error::{Result, SeqnetError};
use crate::layers::{PoolKind, PoolWindow};

/// Sentinel meaning "use the default" in a tuple slot
pub const DEFAULT: i64 = -1;

/// `(in_channels, out_channels, kernel_size, stride, padding)`
pub type ConvParams = (i64, i64, i64, i64, i64);

/// `(kernel_size, stride, padding)`
pub type PoolParams = (i64, i64, i64);

/// `(in_features, out_features, dropout)`
pub type LinearParams = (i64, i64, f64);

/// Resolve an optional slot: the sentinel yields `default`.
pub fn resolve(name: &str, value: i64, default: usize) -> Result<usize> {
    match value {
        DEFAULT => Ok(default),
        v if v < 0 => Err(SeqnetError::invalid_parameter(
            name.to_string(),
            format!("{} is negative; use {} for the default", v, DEFAULT),
        )),
        v => to_usize(name, v),
    }
}

/// Resolve a required slot, which has no default.
pub fn require(name: &str, value: i64) -> Result<usize> {
    if value < 0 {
        return Err(SeqnetError::invalid_parameter(
            name.to_string(),
            format!("{} is required and has no default (got {})", name, value),
        ));
    }
    to_usize(name, value)
}

/// Resolve a probability slot. Any negative value is the sentinel.
pub fn resolve_rate(name: &str, value: f64, default: f32) -> Result<f32> {
    if value.is_nan() {
        return Err(SeqnetError::invalid_parameter(name, "rate is NaN"));
    }
    if value < 0.0 {
        return Ok(default);
    }
    if value >= 1.0 {
        return Err(SeqnetError::invalid_parameter(
            name.to_string(),
            format!("rate must be in [0, 1), got {}", value),
        ));
    }
    Ok(value as f32)
}

fn to_usize(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        SeqnetError::invalid_parameter(name.to_string(), format!("{} does not fit in usize", value))
    })
}

fn positive(name: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(SeqnetError::invalid_parameter(
            name.to_string(),
            format!("{} must be greater than 0", name),
        ));
    }
    Ok(value)
}

/// One convolution of a block, square kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvSpec {
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: usize,
    pub stride: usize,
    pub padding: usize,
}

impl ConvSpec {
    pub const DEFAULT_KERNEL_SIZE: usize = 3;
    pub const DEFAULT_STRIDE: usize = 1;
    pub const DEFAULT_PADDING: usize = 0;

    /// A convolution with every optional slot at its default
    pub fn new(in_channels: usize, out_channels: usize) -> Self {
        ConvSpec {
            in_channels,
            out_channels,
            kernel_size: Self::DEFAULT_KERNEL_SIZE,
            stride: Self::DEFAULT_STRIDE,
            padding: Self::DEFAULT_PADDING,
        }
    }

    pub fn kernel_size(mut self, kernel_size: usize) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Normalize one tuple, substituting defaults for sentinel slots
    pub fn from_params(params: ConvParams) -> Result<Self> {
        let (in_channels, out_channels, kernel_size, stride, padding) = params;
        let spec = ConvSpec {
            in_channels: require("in_channels", in_channels)?,
            out_channels: require("out_channels", out_channels)?,
            kernel_size: resolve("kernel_size", kernel_size, Self::DEFAULT_KERNEL_SIZE)?,
            stride: resolve("stride", stride, Self::DEFAULT_STRIDE)?,
            padding: resolve("padding", padding, Self::DEFAULT_PADDING)?,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        positive("in_channels", self.in_channels)?;
        positive("out_channels", self.out_channels)?;
        positive("kernel_size", self.kernel_size)?;
        positive("stride", self.stride)?;
        Ok(())
    }
}

impl TryFrom<ConvParams> for ConvSpec {
    type Error = SeqnetError;

    fn try_from(params: ConvParams) -> Result<Self> {
        ConvSpec::from_params(params)
    }
}

/// `(in_channels, out_channels, kernel_size, stride)`
impl TryFrom<(i64, i64, i64, i64)> for ConvSpec {
    type Error = SeqnetError;

    fn try_from((i, o, k, s): (i64, i64, i64, i64)) -> Result<Self> {
        ConvSpec::from_params((i, o, k, s, DEFAULT))
    }
}

/// `(in_channels, out_channels, kernel_size)`
impl TryFrom<(i64, i64, i64)> for ConvSpec {
    type Error = SeqnetError;

    fn try_from((i, o, k): (i64, i64, i64)) -> Result<Self> {
        ConvSpec::from_params((i, o, k, DEFAULT, DEFAULT))
    }
}

/// `(in_channels, out_channels)`
impl TryFrom<(i64, i64)> for ConvSpec {
    type Error = SeqnetError;

    fn try_from((i, o): (i64, i64)) -> Result<Self> {
        ConvSpec::from_params((i, o, DEFAULT, DEFAULT, DEFAULT))
    }
}

/// The pooling layer closing a convolution block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSpec {
    pub kind: PoolKind,
    pub kernel_size: usize,
    pub stride: usize,
    pub padding: usize,
}

impl PoolSpec {
    pub const DEFAULT_KERNEL_SIZE: usize = 2;
    pub const DEFAULT_PADDING: usize = 0;

    /// Max pooling whose stride equals its window
    pub fn new(kernel_size: usize) -> Self {
        PoolSpec {
            kind: PoolKind::Max,
            kernel_size,
            stride: kernel_size,
            padding: Self::DEFAULT_PADDING,
        }
    }

    pub fn kind(mut self, kind: PoolKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Normalize one tuple. A sentinel stride follows the (resolved) kernel size.
    pub fn from_params(params: PoolParams) -> Result<Self> {
        let (kernel_size, stride, padding) = params;
        let kernel_size = resolve("pool kernel_size", kernel_size, Self::DEFAULT_KERNEL_SIZE)?;
        let spec = PoolSpec {
            kind: PoolKind::Max,
            kernel_size,
            stride: resolve("pool stride", stride, kernel_size)?,
            padding: resolve("pool padding", padding, Self::DEFAULT_PADDING)?,
        };
        spec.window()?;
        Ok(spec)
    }

    /// The validated square window for this spec
    pub fn window(&self) -> Result<PoolWindow> {
        PoolWindow::new(
            (self.kernel_size, self.kernel_size),
            Some((self.stride, self.stride)),
            (self.padding, self.padding),
        )
    }
}

impl Default for PoolSpec {
    fn default() -> Self {
        PoolSpec::new(Self::DEFAULT_KERNEL_SIZE)
    }
}

impl TryFrom<PoolParams> for PoolSpec {
    type Error = SeqnetError;

    fn try_from(params: PoolParams) -> Result<Self> {
        PoolSpec::from_params(params)
    }
}

/// `(kernel_size, stride)`
impl TryFrom<(i64, i64)> for PoolSpec {
    type Error = SeqnetError;

    fn try_from((k, s): (i64, i64)) -> Result<Self> {
        PoolSpec::from_params((k, s, DEFAULT))
    }
}

/// `kernel_size` alone
impl TryFrom<i64> for PoolSpec {
    type Error = SeqnetError;

    fn try_from(kernel_size: i64) -> Result<Self> {
        PoolSpec::from_params((kernel_size, DEFAULT, DEFAULT))
    }
}

/// One fully connected layer of a block, with the dropout that follows it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearSpec {
    pub in_features: usize,
    pub out_features: usize,
    /// `0.0` means no dropout layer is emitted
    pub dropout: f32,
}

impl LinearSpec {
    pub const DEFAULT_DROPOUT: f32 = 0.5;

    /// A linear layer without dropout
    pub fn new(in_features: usize, out_features: usize) -> Self {
        LinearSpec {
            in_features,
            out_features,
            dropout: 0.0,
        }
    }

    pub fn dropout(mut self, dropout: f32) -> Self {
        self.dropout = dropout;
        self
    }

    /// Normalize one tuple; a negative dropout is the sentinel for 0.5
    pub fn from_params(params: LinearParams) -> Result<Self> {
        let (in_features, out_features, dropout) = params;
        let spec = LinearSpec {
            in_features: require("in_features", in_features)?,
            out_features: require("out_features", out_features)?,
            dropout: resolve_rate("dropout", dropout, Self::DEFAULT_DROPOUT)?,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        positive("in_features", self.in_features)?;
        positive("out_features", self.out_features)?;
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(SeqnetError::invalid_parameter(
                "dropout".to_string(),
                format!("rate must be in [0, 1), got {}", self.dropout),
            ));
        }
        Ok(())
    }
}

impl TryFrom<LinearParams> for LinearSpec {
    type Error = SeqnetError;

    fn try_from(params: LinearParams) -> Result<Self> {
        LinearSpec::from_params(params)
    }
}

/// `(in_features, out_features)` with the default dropout
impl TryFrom<(i64, i64)> for LinearSpec {
    type Error = SeqnetError;

    fn try_from((i, o): (i64, i64)) -> Result<Self> {
        LinearSpec::from_params((i, o, DEFAULT as f64))
    }
}
