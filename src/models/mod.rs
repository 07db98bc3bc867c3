//! Reference architectures assembled from the block helpers.

pub mod vgg;

pub use vgg::{vgg19, Vgg, VggDepth};
