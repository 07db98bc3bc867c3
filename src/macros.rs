/// A macro to create a new `Sequential` from a list of layers.
///
/// # Examples
///
/// ```
/// use seqnet::activations::Activation;
/// use seqnet::layers::{ActivationLayer, DenseLayer, FlattenLayer, WeightInit};
/// use seqnet::sequential;
///
/// let model = sequential![
///     FlattenLayer::new(),
///     DenseLayer::new(4, 32, WeightInit::HeNormal).unwrap(),
///     ActivationLayer::new(Activation::Relu),
///     DenseLayer::new(32, 2, WeightInit::XavierNormal).unwrap(),
/// ];
/// assert_eq!(model.len(), 4);
/// ```
///
/// Each argument is boxed and appended in the order written.
#[macro_export]
macro_rules! sequential {
    () => {
        $crate::sequential::Sequential::new()
    };
    ($( $layer:expr ),+ $(,)?) => {
        {
            let mut model = $crate::sequential::Sequential::new();
            $( model.push($layer); )+
            model
        }
    };
}
