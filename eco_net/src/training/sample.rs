use ndarray::{Array1, ArrayView1};

use crate::{Result, arch::Network, one_hot::one_hot_decode};

/// A single sample handed out by a training sequence, along with where it was taken from.
#[derive(Clone, Debug)]
pub struct TrainSample<'d> {
    pub epoch: usize,
    pub batch: usize,
    pub sample: usize,
    /// Amount of samples emitted by the sequence before this one.
    pub current: usize,
    pub input: ArrayView1<'d, f32>,
    pub target: ArrayView1<'d, f32>,
}

impl TrainSample<'_> {
    /// Trains `network` on this sample.
    ///
    /// # Arguments
    /// * `network` - The network to correct.
    /// * `rate` - Factor applied to the network's learning rates.
    ///
    /// # Returns
    /// The targets handed backward through the network.
    pub fn train(&self, network: &mut Network, rate: f32) -> Vec<Array1<f32>> {
        network.train(self.input, self.target, rate, false)
    }

    /// Makes `network` unlearn this sample, flipping the sign of its learning rates.
    pub fn unlearn(&self, network: &mut Network, rate: f32) -> Vec<Array1<f32>> {
        network.train(self.input, self.target, rate, true)
    }

    pub fn process(&self, network: &Network) -> Array1<f32> {
        network.process(self.input)
    }

    /// Decodes the class of this sample.
    ///
    /// # Returns
    /// An `InvalidOneHot` error if the target isn't a one-hot vector.
    pub fn label(&self) -> Result<usize> {
        one_hot_decode(&self.target)
    }
}
