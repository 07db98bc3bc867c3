//! Layer primitives that the block helpers compose into containers.
//!
//! Every layer implements [`Module`]; containers hold them as `Box<dyn Module>`.

pub mod activation;
pub mod conv;
pub mod dense;
pub mod dropout;
pub mod flatten;
pub mod initialization;
pub mod pooling;
pub mod traits;

pub use activation::ActivationLayer;
pub use conv::Conv2DLayer;
pub use dense::DenseLayer;
pub use dropout::DropoutLayer;
pub use flatten::FlattenLayer;
pub use initialization::WeightInit;
pub use pooling::{pool_layer, AvgPool2DLayer, MaxPool2DLayer, PoolKind, PoolWindow};
pub use traits::Module;
