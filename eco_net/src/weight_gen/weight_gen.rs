/// A source of initial weights for the learnable layers.
pub trait WeightGen {
    /// Should sample a single weight.
    fn sample(&mut self) -> f32;

    /// Samples `n` weights in order.
    ///
    /// # Arguments
    /// * `n` - The amount of weights to generate.
    ///
    /// # Returns
    /// A vec with the generated weights.
    fn sample_n(&mut self, n: usize) -> Vec<f32> {
        (0..n).map(|_| self.sample()).collect()
    }
}

impl<F> WeightGen for F
where
    F: FnMut() -> f32,
{
    fn sample(&mut self) -> f32 {
        self()
    }
}
