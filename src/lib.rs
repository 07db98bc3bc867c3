//! # seqnet - Sequential Network Assembly from Parameter Tuples
//!
//! seqnet assembles layer primitives (convolution, pooling, linear,
//! activation, dropout) into ordered [`Sequential`](sequential::Sequential)
//! containers from compact lists of parameter tuples. Optional tuple slots
//! take the sentinel [`DEFAULT`](builders::DEFAULT) (`-1`) to mean "use the
//! default", and containers can be concatenated into one.
//!
//! ## Quick Start
//!
//! ```rust
//! use seqnet::builders::{concat_sequences, conv_sequence, linear_sequence, BlockOptions, DEFAULT};
//! use seqnet::layers::{FlattenLayer, Module};
//! use seqnet::sequential::Sequential;
//!
//! let options = BlockOptions::default();
//! let features = conv_sequence(
//!     &[(3, 16, DEFAULT, DEFAULT, 1), (16, 16, DEFAULT, DEFAULT, 1)],
//!     Some((2, DEFAULT, DEFAULT)),
//!     &options,
//! )
//! .unwrap();
//! let classifier = linear_sequence(&[(16 * 16 * 16, 10, 0.0)], &options.clone().without_activation()).unwrap();
//!
//! let model = concat_sequences([features, Sequential::new().add(FlattenLayer::new()), classifier]);
//! assert_eq!(model.output_shape(&[1, 3, 32, 32]).unwrap(), vec![1, 10]);
//! ```
//!
//! ## Module Organization
//!
//! - [`activations`] - Activation functions (ReLU, Sigmoid, Tanh, etc.)
//! - [`builders`] - Sentinel normalization and block assembly helpers
//! - [`config`] - JSON architecture descriptions
//! - [`error`] - Error types and result handling
//! - [`layers`] - Layer primitives (Conv2d, pooling, Linear, Dropout, Flatten)
//! - [`models`] - VGG family built from the helpers
//! - [`sequential`] - The sequential container

#[macro_use]
pub mod macros;

pub mod activations;
pub mod builders;
pub mod config;
pub mod error;
pub mod layers;
pub mod models;
pub mod sequential;

pub use error::{Result, SeqnetError};
pub use sequential::Sequential;

#[cfg(test)]
mod tests;
