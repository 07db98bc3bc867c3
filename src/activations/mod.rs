//! # Activation Functions Module
//!
//! Element-wise non-linearities that the block helpers interleave between
//! convolution and linear layers. Each variant can be applied in place to an
//! array of any rank, or wrapped in an [`ActivationLayer`](crate::layers::ActivationLayer)
//! to sit inside a [`Sequential`](crate::sequential::Sequential).
//!
//! ## Available Activations
//!
//! - **ReLU**: `max(0, x)`, the default for every helper
//! - **Sigmoid**: `1 / (1 + e^(-x))`
//! - **Tanh**: hyperbolic tangent
//! - **Linear**: identity
//! - **LeakyReLU**: ReLU with a small negative slope
//! - **ELU**: smooth alternative to ReLU
//! - **GELU**: tanh approximation
//!
//! ## Usage Example
//!
//! ```rust
//! use seqnet::activations::Activation;
//! use ndarray::array;
//!
//! let mut data = array![1.0, -0.5, 0.0, 2.0];
//! Activation::Relu.apply(&mut data);
//! assert_eq!(data, array![1.0, 0.0, 0.0, 2.0]);
//! ```

pub mod functions;
pub mod gelu;

pub use functions::Activation;
