use crate::weight_gen::WeightGen;

/// Everything needed to build a [`Network`](super::Network).
pub struct NetworkConfig {
    pub input_size: usize,
    pub output_size: usize,
    pub hidden_sizes: Vec<usize>,
    pub weight_gen: Box<dyn WeightGen>,
    pub learning_rate_for_weights: f32,
    pub learning_rate_for_biases: f32,
}

impl NetworkConfig {
    /// Creates a new `NetworkConfig`.
    ///
    /// # Arguments
    /// * `input_size` - The amount of input units.
    /// * `output_size` - The amount of classes, it must divide the last hidden layer's size.
    /// * `hidden_sizes` - The sizes of the hidden layers, in order.
    /// * `weight_gen` - The initializer for every hidden layer's weights.
    /// * `learning_rate_for_weights` - Base magnitude of the weight corrections.
    /// * `learning_rate_for_biases` - Base magnitude of the bias corrections.
    pub fn new<W>(
        input_size: usize,
        output_size: usize,
        hidden_sizes: Vec<usize>,
        weight_gen: W,
        learning_rate_for_weights: f32,
        learning_rate_for_biases: f32,
    ) -> Self
    where
        W: WeightGen + 'static,
    {
        Self {
            input_size,
            output_size,
            hidden_sizes,
            weight_gen: Box::new(weight_gen),
            learning_rate_for_weights,
            learning_rate_for_biases,
        }
    }
}
