//! Helpers that turn tuple-style parameter lists into sequential containers.

pub mod blocks;
pub mod params;

pub use blocks::{concat_sequences, conv_block, conv_sequence, linear_block, linear_sequence, BlockOptions};
pub use params::{
    require, resolve, resolve_rate, ConvParams, ConvSpec, LinearParams, LinearSpec, PoolParams, PoolSpec,
    DEFAULT,
};
