use ndarray::{Array, ArrayD};
use crate::activations::Activation;
use crate::error::SeqnetError;
use crate::layers::{ActivationLayer, Conv2DLayer, DenseLayer, DropoutLayer, FlattenLayer, Module, WeightInit};
use crate::sequential::Sequential;

fn tiny_classifier() -> Sequential {
    sequential![
        Conv2DLayer::new(1, 2, (3, 3), (1, 1), (1, 1), WeightInit::Ones).unwrap(),
        ActivationLayer::new(Activation::Relu),
        FlattenLayer::new(),
        DenseLayer::new(2 * 4 * 4, 3, WeightInit::Ones).unwrap(),
    ]
}

#[test]
fn test_forward_runs_in_order() {
    let mut model = tiny_classifier();
    let input: ArrayD<f32> = Array::ones((2, 1, 4, 4)).into_dyn();
    let output = model.forward(input).unwrap();

    assert_eq!(output.shape(), &[2, 3]);
    // Every output sums the same conv activations, so all logits agree
    let first = output[[0, 0]];
    assert!(output.iter().all(|&v| (v - first).abs() < 1e-4));
}

#[test]
fn test_shape_inference_matches_forward() {
    let mut model = tiny_classifier();
    let predicted = model.output_shape(&[5, 1, 4, 4]).unwrap();
    let output = model.forward(Array::zeros((5, 1, 4, 4)).into_dyn()).unwrap();
    assert_eq!(predicted, output.shape().to_vec());
}

#[test]
fn test_errors_report_layer_index() {
    let mut model = tiny_classifier();
    let err = model.forward(Array::zeros((1, 1, 5, 5)).into_dyn()).unwrap_err();

    match err {
        SeqnetError::Layer { index, name, .. } => {
            assert_eq!(index, 3);
            assert_eq!(name, "Linear");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_parameter_count() {
    let model = tiny_classifier();
    assert_eq!(model.num_parameters(), (2 * 9 + 2) + (32 * 3 + 3));
}

#[test]
fn test_display_lists_layers() {
    let model = sequential![
        DenseLayer::new(4, 2, WeightInit::Zeros).unwrap(),
        ActivationLayer::new(Activation::Relu),
    ];
    assert_eq!(
        model.to_string(),
        "Sequential(\n  (0): Linear(in_features=4, out_features=2, bias=True)\n  (1): ReLU()\n)"
    );
}

#[test]
fn test_display_indents_nested() {
    let inner = sequential![ActivationLayer::new(Activation::Tanh)];
    let outer = sequential![inner, FlattenLayer::new()];
    assert_eq!(
        outer.to_string(),
        "Sequential(\n  (0): Sequential(\n    (0): Tanh()\n  )\n  (1): Flatten(start_dim=1, end_dim=-1)\n)"
    );
}

#[test]
fn test_train_and_eval_reach_nested_dropout() {
    let inner = sequential![DropoutLayer::with_seed(0.9, 1).unwrap()];
    let mut model = sequential![inner];
    let input: ArrayD<f32> = Array::ones((1, 100)).into_dyn();

    model.eval();
    assert_eq!(model.forward(input.clone()).unwrap(), input);

    model.train();
    assert_ne!(model.forward(input.clone()).unwrap(), input);
}

#[test]
fn test_summary_rows() {
    let model = tiny_classifier();
    let rows = model.summary(&[1, 1, 4, 4]).unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].output_shape, vec![1, 2, 4, 4]);
    assert_eq!(rows[2].output_shape, vec![1, 32]);
    assert_eq!(rows[3].num_parameters, 99);
    assert_eq!(rows[1].description, "ReLU()");
}

#[test]
fn test_container_accessors() {
    let mut model = Sequential::new();
    assert!(model.is_empty());
    model.push(FlattenLayer::new());
    model.push_boxed(Box::new(ActivationLayer::new(Activation::Sigmoid)));

    assert_eq!(model.len(), 2);
    assert_eq!(model.get(1).map(|layer| layer.name()), Some("Sigmoid"));
    assert!(model.get(2).is_none());

    let rebuilt: Sequential = model.clone().into_iter().collect();
    assert_eq!(rebuilt.to_string(), model.to_string());
}

#[test]
fn test_empty_container_is_identity() {
    let mut model = sequential![];
    let input: ArrayD<f32> = Array::from_elem((2, 2), 1.5).into_dyn();
    assert_eq!(model.forward(input.clone()).unwrap(), input);
    assert_eq!(model.output_shape(&[2, 2]).unwrap(), vec![2, 2]);
}
