use crate::activations::Activation;
use crate::error::{Result, SeqnetError};
use crate::layers::{pool_layer, ActivationLayer, Conv2DLayer, DenseLayer, DropoutLayer, WeightInit};
use crate::sequential::{empty_error, Sequential};

use super::params::{ConvParams, ConvSpec, LinearParams, LinearSpec, PoolParams, PoolSpec};

/// Options shared by every layer of one block
#[derive(Clone, Debug, PartialEq)]
pub struct BlockOptions {
    /// Activation inserted after each convolution or linear layer; `None` inserts nothing
    pub activation: Option<Activation>,

    /// Weight initialization; `None` picks one suited to the activation
    pub weight_init: Option<WeightInit>,

    /// Seed for the dropout masks of the block
    pub dropout_seed: Option<u64>,
}

impl BlockOptions {
    /// ReLU after every layer, default initialization
    pub fn new() -> Self {
        BlockOptions {
            activation: Some(Activation::Relu),
            weight_init: None,
            dropout_seed: None,
        }
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }

    /// Emit bare layers, as for an output head
    pub fn without_activation(mut self) -> Self {
        self.activation = None;
        self
    }

    pub fn weight_init(mut self, init: WeightInit) -> Self {
        self.weight_init = Some(init);
        self
    }

    pub fn dropout_seed(mut self, seed: u64) -> Self {
        self.dropout_seed = Some(seed);
        self
    }

    fn resolved_init(&self) -> WeightInit {
        self.weight_init
            .unwrap_or_else(|| WeightInit::for_activation(self.activation.as_ref()))
    }

    fn push_activation(&self, model: &mut Sequential) {
        if let Some(activation) = self.activation {
            model.push(ActivationLayer::new(activation));
        }
    }
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a convolution block from tuples, where `-1` marks a default slot.
///
/// Each tuple becomes a convolution followed by the block activation; the
/// optional pooling layer goes last.
///
/// ```
/// use seqnet::builders::{conv_sequence, BlockOptions, DEFAULT};
///
/// let block = conv_sequence(
///     &[(3, 64, DEFAULT, DEFAULT, 1), (64, 64, DEFAULT, DEFAULT, 1)],
///     Some((2, DEFAULT, DEFAULT)),
///     &BlockOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(block.len(), 5);
/// ```
pub fn conv_sequence(
    convs: &[ConvParams],
    pool: Option<PoolParams>,
    options: &BlockOptions,
) -> Result<Sequential> {
    let specs = convs
        .iter()
        .map(|&params| ConvSpec::from_params(params))
        .collect::<Result<Vec<_>>>()?;
    let pool = pool.map(PoolSpec::from_params).transpose()?;
    conv_block(&specs, pool, options)
}

/// Build a convolution block from already normalized specs
pub fn conv_block(specs: &[ConvSpec], pool: Option<PoolSpec>, options: &BlockOptions) -> Result<Sequential> {
    if specs.is_empty() {
        return Err(empty_error("convs"));
    }
    for (i, pair) in specs.windows(2).enumerate() {
        if pair[0].out_channels != pair[1].in_channels {
            return Err(SeqnetError::dimension_mismatch(
                format!("conv {} to take {} input channels", i + 1, pair[0].out_channels),
                format!("{} input channels", pair[1].in_channels),
            ));
        }
    }

    let init = options.resolved_init();
    let mut model = Sequential::new();

    for spec in specs {
        spec.validate()?;
        model.push(Conv2DLayer::new(
            spec.in_channels,
            spec.out_channels,
            (spec.kernel_size, spec.kernel_size),
            (spec.stride, spec.stride),
            (spec.padding, spec.padding),
            init,
        )?);
        options.push_activation(&mut model);
    }

    if let Some(pool) = pool {
        model.push_boxed(pool_layer(pool.kind, pool.window()?));
    }

    tracing::debug!(convs = specs.len(), layers = model.len(), "assembled conv block");
    Ok(model)
}

/// Build a fully connected block from tuples, where a negative dropout marks the default rate.
///
/// Each tuple becomes a linear layer, the block activation (if any), and a
/// dropout layer when its rate is above zero.
pub fn linear_sequence(linears: &[LinearParams], options: &BlockOptions) -> Result<Sequential> {
    let specs = linears
        .iter()
        .map(|&params| LinearSpec::from_params(params))
        .collect::<Result<Vec<_>>>()?;
    linear_block(&specs, options)
}

/// Build a fully connected block from already normalized specs
pub fn linear_block(specs: &[LinearSpec], options: &BlockOptions) -> Result<Sequential> {
    if specs.is_empty() {
        return Err(empty_error("linears"));
    }
    for (i, pair) in specs.windows(2).enumerate() {
        if pair[0].out_features != pair[1].in_features {
            return Err(SeqnetError::dimension_mismatch(
                format!("linear {} to take {} input features", i + 1, pair[0].out_features),
                format!("{} input features", pair[1].in_features),
            ));
        }
    }

    let init = options.resolved_init();
    let mut model = Sequential::new();

    for (i, spec) in specs.iter().enumerate() {
        spec.validate()?;
        model.push(DenseLayer::new(spec.in_features, spec.out_features, init)?);
        options.push_activation(&mut model);

        if spec.dropout > 0.0 {
            let dropout = match options.dropout_seed {
                Some(seed) => DropoutLayer::with_seed(spec.dropout, seed.wrapping_add(i as u64))?,
                None => DropoutLayer::new(spec.dropout)?,
            };
            model.push(dropout);
        }
    }

    tracing::debug!(linears = specs.len(), layers = model.len(), "assembled linear block");
    Ok(model)
}

/// Concatenate containers into one holding all their layers in order.
///
/// Only the top level is flattened: a container nested inside one of the
/// inputs stays a single layer of the result.
pub fn concat_sequences<I>(sequences: I) -> Sequential
where
    I: IntoIterator<Item = Sequential>,
{
    let mut model = Sequential::new();
    let mut count = 0;
    for sequence in sequences {
        model.extend(sequence);
        count += 1;
    }
    tracing::debug!(sequences = count, layers = model.len(), "concatenated sequences");
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::DEFAULT;
    use crate::layers::Module;

    #[test]
    fn test_conv_sequence_layer_order() {
        let block = conv_sequence(
            &[(3, 16, DEFAULT, DEFAULT, 1), (16, 32, 3, 1, 1)],
            Some((2, DEFAULT, DEFAULT)),
            &BlockOptions::default(),
        )
        .unwrap();

        let names: Vec<_> = block.iter().map(|layer| layer.name()).collect();
        assert_eq!(names, vec!["Conv2d", "ReLU", "Conv2d", "ReLU", "MaxPool2d"]);
        assert_eq!(block.output_shape(&[1, 3, 8, 8]).unwrap(), vec![1, 32, 4, 4]);
    }

    #[test]
    fn test_conv_sequence_without_pool_or_activation() {
        let options = BlockOptions::default().without_activation();
        let block = conv_sequence(&[(1, 4, 1, DEFAULT, DEFAULT)], None, &options).unwrap();
        assert_eq!(block.len(), 1);
        assert_eq!(block.get(0).unwrap().name(), "Conv2d");
    }

    #[test]
    fn test_conv_sequence_rejects_broken_chain() {
        let err = conv_sequence(&[(3, 16, 3, 1, 1), (8, 32, 3, 1, 1)], None, &BlockOptions::default());
        assert!(matches!(err, Err(SeqnetError::DimensionMismatch { .. })));
        assert!(conv_sequence(&[], None, &BlockOptions::default()).is_err());
    }

    #[test]
    fn test_oversized_tuples_are_errors() {
        let options = BlockOptions::default().weight_init(WeightInit::Zeros);
        let block = conv_sequence(&[(1, 1, 3, 1, i64::MAX)], None, &options).unwrap();
        assert!(block.output_shape(&[1, 1, 4, 4]).is_err());

        let err = linear_sequence(&[(1 << 40, 1 << 40, 0.0)], &options);
        assert!(matches!(err, Err(SeqnetError::InvalidParameter { .. })));
        assert!(conv_sequence(&[(1 << 30, 1 << 30, 1 << 10, 1, 0)], None, &options).is_err());
    }

    #[test]
    fn test_linear_sequence_dropout_handling() {
        let block = linear_sequence(&[(8, 4, -1.0), (4, 2, 0.0)], &BlockOptions::default()).unwrap();
        let names: Vec<_> = block.iter().map(|layer| layer.name()).collect();
        assert_eq!(names, vec!["Linear", "ReLU", "Dropout", "Linear", "ReLU"]);
        assert_eq!(block.get(2).unwrap().to_string(), "Dropout(p=0.5)");
    }

    #[test]
    fn test_linear_sequence_rejects_broken_chain() {
        assert!(linear_sequence(&[(8, 4, 0.0), (5, 2, 0.0)], &BlockOptions::default()).is_err());
        assert!(linear_sequence(&[], &BlockOptions::default()).is_err());
    }

    #[test]
    fn test_concat_preserves_order() {
        let options = BlockOptions::default().weight_init(WeightInit::Zeros);
        let features = conv_sequence(&[(1, 2, 3, 1, 1)], Some((2, 2, 0)), &options).unwrap();
        let head = linear_sequence(&[(8, 3, 0.0)], &options.clone().without_activation()).unwrap();
        let flatten = Sequential::new().add(crate::layers::FlattenLayer::new());

        let model = concat_sequences(vec![features, flatten, head]);
        let names: Vec<_> = model.iter().map(|layer| layer.name()).collect();
        assert_eq!(names, vec!["Conv2d", "ReLU", "MaxPool2d", "Flatten", "Linear"]);
        assert_eq!(model.output_shape(&[5, 1, 4, 4]).unwrap(), vec![5, 3]);
    }

    #[test]
    fn test_concat_keeps_nested_containers() {
        let inner = Sequential::new().add(ActivationLayer::new(Activation::Tanh));
        let outer = Sequential::new().add(inner.clone());
        let model = concat_sequences([outer, inner]);
        assert_eq!(model.len(), 2);
        assert_eq!(model.get(0).unwrap().name(), "Sequential");
        assert_eq!(model.get(1).unwrap().name(), "Tanh");
    }

    #[test]
    fn test_concat_of_nothing_is_empty() {
        assert!(concat_sequences(Vec::new()).is_empty());
    }
}
