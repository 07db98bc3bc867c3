use ndarray::{array, Array};
use crate::activations::Activation;

#[test]
fn test_relu_activation() {
    let relu = Activation::Relu;
    let mut input = array![-1.0, 0.0, 1.0, 2.0];
    relu.apply(&mut input);
    assert_eq!(input, array![0.0, 0.0, 1.0, 2.0]);
}

#[test]
fn test_sigmoid_activation() {
    let sigmoid = Activation::Sigmoid;
    let mut input = array![0.0];
    sigmoid.apply(&mut input);
    assert!((input[0] - 0.5).abs() < 1e-6);
}

#[test]
fn test_tanh_activation() {
    let tanh = Activation::Tanh;
    let mut input = array![0.0];
    tanh.apply(&mut input);
    assert_eq!(input[0], 0.0);
}

#[test]
fn test_leaky_relu() {
    let leaky = Activation::LeakyRelu { alpha: 0.01 };
    let mut input = array![-1.0, 0.0, 1.0];
    leaky.apply(&mut input);
    assert_eq!(input, array![-0.01, 0.0, 1.0]);
}

#[test]
fn test_elu() {
    let elu = Activation::Elu { alpha: 1.0 };
    let mut input = array![-1.0, 0.0, 1.0];
    elu.apply(&mut input);
    assert!((input[0] - (-0.632)).abs() < 0.001);
    assert_eq!(input[1], 0.0);
    assert_eq!(input[2], 1.0);
}

#[test]
fn test_gelu() {
    let gelu = Activation::Gelu;
    let mut input = array![0.0, 1.0, -1.0];
    gelu.apply(&mut input);

    // GELU(0) ≈ 0
    assert!(input[0].abs() < 1e-6);
    // GELU(1) ≈ 0.841
    assert!((input[1] - 0.841).abs() < 0.01);
    // GELU(-1) ≈ -0.159
    assert!((input[2] - (-0.159)).abs() < 0.01);
}

#[test]
fn test_apply_on_image_batch() {
    let mut images = Array::from_elem((2, 3, 4, 4), -2.0_f32).into_dyn();
    images[[1, 2, 3, 3]] = 5.0;
    Activation::Relu.apply(&mut images);

    assert_eq!(images.iter().filter(|&&v| v != 0.0).count(), 1);
    assert_eq!(images[[1, 2, 3, 3]], 5.0);
}

#[test]
fn test_linear_is_identity() {
    let mut input = array![[-3.0, 0.5], [2.0, -0.25]];
    let expected = input.clone();
    Activation::Linear.apply(&mut input);
    assert_eq!(input, expected);
}

#[test]
fn test_display_names() {
    assert_eq!(Activation::Relu.to_string(), "ReLU()");
    assert_eq!(Activation::Linear.to_string(), "Identity()");
    assert_eq!(Activation::Elu { alpha: 1.0 }.to_string(), "ELU(alpha=1)");
}

#[test]
fn test_serde_names() {
    let parsed: Activation = serde_json::from_str("\"gelu\"").unwrap();
    assert_eq!(parsed, Activation::Gelu);
    let parsed: Activation = serde_json::from_str(r#"{"elu": {"alpha": 0.5}}"#).unwrap();
    assert_eq!(parsed, Activation::Elu { alpha: 0.5 });
}
