//! VGG networks from [Simonyan & Zisserman](https://arxiv.org/abs/1409.1556).
//!
//! Five convolution stages of 3x3 kernels, each closed by a 2x2 max pool,
//! followed by a three-layer classifier. The whole network is one flat
//! [`Sequential`] produced by concatenating the blocks.

use serde::{Deserialize, Serialize};

use crate::builders::{concat_sequences, conv_sequence, linear_sequence, BlockOptions, ConvParams, DEFAULT};
use crate::error::{Result, SeqnetError};
use crate::layers::{FlattenLayer, WeightInit};
use crate::sequential::Sequential;

/// Output channels of the five convolution stages
pub const STAGE_WIDTHS: [usize; 5] = [64, 128, 256, 512, 512];

/// Each stage halves the spatial size once
const DOWNSAMPLE: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VggDepth {
    Vgg11,
    Vgg13,
    Vgg16,
    Vgg19,
}

impl VggDepth {
    /// Number of convolutions in each stage
    pub fn stage_depths(&self) -> [usize; 5] {
        match self {
            VggDepth::Vgg11 => [1, 1, 2, 2, 2],
            VggDepth::Vgg13 => [2, 2, 2, 2, 2],
            VggDepth::Vgg16 => [2, 2, 3, 3, 3],
            VggDepth::Vgg19 => [2, 2, 4, 4, 4],
        }
    }

    /// Total weight layers, the number in the model's name
    pub fn weight_layers(&self) -> usize {
        self.stage_depths().iter().sum::<usize>() + 3
    }
}

/// Builder for a VGG network
#[derive(Clone, Debug, PartialEq)]
pub struct Vgg {
    depth: VggDepth,
    in_channels: usize,
    num_classes: usize,
    input_size: usize,
    hidden_features: usize,
    dropout: f32,
    weight_init: Option<WeightInit>,
    dropout_seed: Option<u64>,
}

impl Vgg {
    /// ImageNet defaults: RGB 224x224 input, 1000 classes, 4096 hidden units
    pub fn new(depth: VggDepth) -> Self {
        Vgg {
            depth,
            in_channels: 3,
            num_classes: 1000,
            input_size: 224,
            hidden_features: 4096,
            dropout: 0.5,
            weight_init: None,
            dropout_seed: None,
        }
    }

    pub fn in_channels(mut self, in_channels: usize) -> Self {
        self.in_channels = in_channels;
        self
    }

    pub fn num_classes(mut self, num_classes: usize) -> Self {
        self.num_classes = num_classes;
        self
    }

    /// Side length of the square input image; must be a multiple of 32
    pub fn input_size(mut self, input_size: usize) -> Self {
        self.input_size = input_size;
        self
    }

    pub fn hidden_features(mut self, hidden_features: usize) -> Self {
        self.hidden_features = hidden_features;
        self
    }

    pub fn dropout(mut self, dropout: f32) -> Self {
        self.dropout = dropout;
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

    /// Features reaching the classifier after flattening
    pub fn flattened_features(&self) -> usize {
        let side = self.input_size / DOWNSAMPLE;
        STAGE_WIDTHS[STAGE_WIDTHS.len() - 1] * side * side
    }

    fn validate(&self) -> Result<()> {
        if self.input_size < DOWNSAMPLE || self.input_size % DOWNSAMPLE != 0 {
            return Err(SeqnetError::invalid_parameter(
                "input_size".to_string(),
                format!("must be a positive multiple of {}, got {}", DOWNSAMPLE, self.input_size),
            ));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(SeqnetError::invalid_parameter(
                "dropout".to_string(),
                format!("rate must be in [0, 1), got {}", self.dropout),
            ));
        }
        Ok(())
    }

    fn options(&self) -> BlockOptions {
        let mut options = BlockOptions::default();
        options.weight_init = self.weight_init;
        options.dropout_seed = self.dropout_seed;
        options
    }

    /// One block per stage: padded 3x3 convolutions, ReLU, then max pooling
    pub fn feature_blocks(&self) -> Result<Vec<Sequential>> {
        self.validate()?;
        let options = self.options();
        let mut in_channels = self.in_channels as i64;

        self.depth
            .stage_depths()
            .iter()
            .zip(STAGE_WIDTHS)
            .map(|(&convs, width)| {
                let width = width as i64;
                let params: Vec<ConvParams> = (0..convs)
                    .map(|i| {
                        let input = if i == 0 { in_channels } else { width };
                        (input, width, DEFAULT, DEFAULT, 1)
                    })
                    .collect();
                in_channels = width;
                conv_sequence(&params, Some((2, DEFAULT, DEFAULT)), &options)
            })
            .collect()
    }

    /// Two hidden layers with ReLU and dropout, then the bare output layer
    pub fn classifier_blocks(&self) -> Result<Vec<Sequential>> {
        self.validate()?;
        let options = self.options();
        let flat = self.flattened_features() as i64;
        let hidden = self.hidden_features as i64;
        let dropout = f64::from(self.dropout);

        let hidden_block = linear_sequence(&[(flat, hidden, dropout), (hidden, hidden, dropout)], &options)?;
        let head = linear_sequence(
            &[(hidden, self.num_classes as i64, 0.0)],
            &options.without_activation(),
        )?;
        Ok(vec![hidden_block, head])
    }

    /// Assemble the full network as one flat container
    pub fn build(&self) -> Result<Sequential> {
        let mut blocks = self.feature_blocks()?;
        blocks.push(Sequential::new().add(FlattenLayer::new()));
        blocks.extend(self.classifier_blocks()?);

        let model = concat_sequences(blocks);
        tracing::debug!(
            depth = self.depth.weight_layers(),
            layers = model.len(),
            "built VGG network"
        );
        Ok(model)
    }
}

/// VGG-19 at ImageNet resolution with `num_classes` outputs
pub fn vgg19(num_classes: usize) -> Result<Sequential> {
    Vgg::new(VggDepth::Vgg19).num_classes(num_classes).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::Module;

    fn small(depth: VggDepth) -> Vgg {
        Vgg::new(depth)
            .input_size(32)
            .hidden_features(16)
            .num_classes(10)
            .weight_init(WeightInit::Zeros)
    }

    #[test]
    fn test_weight_layer_counts() {
        assert_eq!(VggDepth::Vgg11.weight_layers(), 11);
        assert_eq!(VggDepth::Vgg13.weight_layers(), 13);
        assert_eq!(VggDepth::Vgg16.weight_layers(), 16);
        assert_eq!(VggDepth::Vgg19.weight_layers(), 19);
    }

    #[test]
    fn test_vgg19_layout() {
        let model = small(VggDepth::Vgg19).build().unwrap();
        // 16 conv+relu pairs, 5 pools, flatten, 2 x (linear, relu, dropout), head
        assert_eq!(model.len(), 16 * 2 + 5 + 1 + 6 + 1);

        let convs = model.iter().filter(|layer| layer.name() == "Conv2d").count();
        let linears = model.iter().filter(|layer| layer.name() == "Linear").count();
        assert_eq!(convs + linears, 19);
        assert_eq!(model.output_shape(&[2, 3, 32, 32]).unwrap(), vec![2, 10]);
    }

    #[test]
    fn test_custom_input_channels() {
        let model = small(VggDepth::Vgg11).in_channels(1).build().unwrap();
        assert_eq!(model.get(0).unwrap().to_string(), "Conv2d(1, 64, kernel_size=(3, 3), stride=(1, 1), padding=(1, 1))");
        assert!(model.output_shape(&[1, 3, 32, 32]).is_err());
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(small(VggDepth::Vgg16).input_size(48).build().is_err());
        assert!(small(VggDepth::Vgg16).input_size(0).build().is_err());
        assert!(small(VggDepth::Vgg16).dropout(1.0).build().is_err());
        assert!(small(VggDepth::Vgg16).num_classes(0).build().is_err());
        assert!(small(VggDepth::Vgg16).in_channels(0).build().is_err());
    }

    #[test]
    fn test_flattened_features() {
        assert_eq!(Vgg::new(VggDepth::Vgg19).flattened_features(), 512 * 7 * 7);
        assert_eq!(Vgg::new(VggDepth::Vgg19).input_size(64).flattened_features(), 512 * 2 * 2);
    }
}
