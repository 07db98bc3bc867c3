use std::fmt;

use ndarray::ArrayD;

use crate::error::{Result, SeqnetError};
use crate::layers::traits::shape_str;
use crate::layers::Module;

/// An ordered composition of layers applied one after another.
///
/// Layer `i + 1` receives the output of layer `i`. Containers can be nested,
/// since `Sequential` is itself a [`Module`].
#[derive(Clone, Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Module>>,
}

/// One row of [`Sequential::summary`]
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSummary {
    pub index: usize,
    pub description: String,
    pub output_shape: Vec<usize>,
    pub num_parameters: usize,
}

impl Sequential {
    /// Create an empty container
    pub fn new() -> Self {
        Sequential { layers: Vec::new() }
    }

    /// Create a container from already boxed layers
    pub fn from_layers(layers: Vec<Box<dyn Module>>) -> Self {
        Sequential { layers }
    }

    /// Append a layer at the end
    pub fn push<M: Module + 'static>(&mut self, layer: M) {
        self.layers.push(Box::new(layer));
    }

    /// Append an already boxed layer at the end
    pub fn push_boxed(&mut self, layer: Box<dyn Module>) {
        self.layers.push(layer);
    }

    /// Builder form of [`push`](Self::push)
    pub fn add<M: Module + 'static>(mut self, layer: M) -> Self {
        self.push(layer);
        self
    }

    /// Move every layer of `other` to the end of this container
    pub fn extend(&mut self, other: Sequential) {
        self.layers.extend(other.layers);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Module> {
        self.layers.get(index).map(|layer| layer.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Module> {
        self.layers.iter().map(|layer| layer.as_ref())
    }

    pub fn layers(&self) -> &[Box<dyn Module>] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<Box<dyn Module>> {
        self.layers
    }

    /// Put every layer in training mode
    pub fn train(&mut self) {
        self.set_training(true);
    }

    /// Put every layer in inference mode
    pub fn eval(&mut self) {
        self.set_training(false);
    }

    /// Per-layer output shapes and parameter counts for an input of `input_shape`
    pub fn summary(&self, input_shape: &[usize]) -> Result<Vec<LayerSummary>> {
        let mut shape = input_shape.to_vec();
        let mut rows = Vec::with_capacity(self.layers.len());

        for (index, layer) in self.layers.iter().enumerate() {
            shape = layer
                .output_shape(&shape)
                .map_err(|e| e.in_layer(index, layer.name()))?;
            let row = LayerSummary {
                index,
                description: layer.to_string(),
                output_shape: shape.clone(),
                num_parameters: layer.num_parameters(),
            };
            tracing::debug!(
                index,
                layer = %row.description,
                output = %shape_str(&row.output_shape),
                params = row.num_parameters,
                "summary"
            );
            rows.push(row);
        }

        Ok(rows)
    }
}

impl Module for Sequential {
    fn forward(&mut self, input: ArrayD<f32>) -> Result<ArrayD<f32>> {
        let mut current = input;
        for (index, layer) in self.layers.iter_mut().enumerate() {
            tracing::trace!(index, layer = layer.name(), input = %shape_str(current.shape()), "forward");
            current = layer
                .forward(current)
                .map_err(|e| e.in_layer(index, layer.name()))?;
        }
        Ok(current)
    }

    fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        self.layers
            .iter()
            .enumerate()
            .try_fold(input.to_vec(), |shape, (index, layer)| {
                layer
                    .output_shape(&shape)
                    .map_err(|e| e.in_layer(index, layer.name()))
            })
    }

    fn num_parameters(&self) -> usize {
        self.layers.iter().map(|layer| layer.num_parameters()).sum()
    }

    fn set_training(&mut self, training: bool) {
        for layer in &mut self.layers {
            layer.set_training(training);
        }
    }

    fn name(&self) -> &'static str {
        "Sequential"
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }
}

impl fmt::Display for Sequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sequential(")?;
        for (index, layer) in self.layers.iter().enumerate() {
            // Nested containers span several lines; indent all of them
            let description = layer.to_string().replace('\n', "\n  ");
            writeln!(f, "  ({}): {}", index, description)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Sequential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromIterator<Box<dyn Module>> for Sequential {
    fn from_iter<I: IntoIterator<Item = Box<dyn Module>>>(iter: I) -> Self {
        Sequential {
            layers: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Sequential {
    type Item = Box<dyn Module>;
    type IntoIter = std::vec::IntoIter<Box<dyn Module>>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}

/// Error for a container that must not be empty
pub(crate) fn empty_error(name: &str) -> SeqnetError {
    SeqnetError::invalid_parameter(name.to_string(), format!("{} must contain at least one entry", name))
}
