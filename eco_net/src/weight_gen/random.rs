use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal, Uniform};

use super::WeightGen;
use crate::{EcoErr, Result};

/// Builds the random number generator used by the generators of this crate.
///
/// # Arguments
/// * `seed` - An optional seed, entropy from the OS is used when absent.
pub fn generate_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// A weight generator that follows a certain probabilistic distribution.
pub struct RandWeightGen<D: Distribution<f32>> {
    distribution: D,
    rng: StdRng,
}

impl<D: Distribution<f32>> RandWeightGen<D> {
    /// Creates a new `RandWeightGen` weight generator.
    ///
    /// # Arguments
    /// * `distribution` - The distribution to sample the random numbers from.
    /// * `seed` - An optional seed for reproducible initialization.
    pub fn new(distribution: D, seed: Option<u64>) -> Self {
        Self {
            distribution,
            rng: generate_rng(seed),
        }
    }
}

impl RandWeightGen<Uniform<f32>> {
    /// Creates a new `RandWeightGen` weight generator with a uniform distribution.
    ///
    /// # Arguments
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    /// * `seed` - An optional seed.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high).
    pub fn uniform(low: f32, high: f32, seed: Option<u64>) -> Result<Self> {
        let distribution =
            Uniform::new(low, high).map_err(|e| EcoErr::InvalidDistribution(e.to_string()))?;

        Ok(Self::new(distribution, seed))
    }

    /// Creates a new `RandWeightGen` weight generator using LeCun uniform initialization.
    ///
    /// # Arguments
    /// * `fan_in` - The number of input units in the weight matrix.
    /// * `seed` - An optional seed.
    ///
    /// # Returns
    /// An error if the calculated range is invalid.
    pub fn lecun_uniform(fan_in: usize, seed: Option<u64>) -> Result<Self> {
        let range = (3. / fan_in as f32).sqrt();
        Self::uniform(-range, range, seed)
    }
}

impl RandWeightGen<Normal<f32>> {
    /// Creates a new `RandWeightGen` weight generator with a normal distribution.
    ///
    /// # Arguments
    /// * `mean` - The mean of the distribution.
    /// * `std_dev` - The standard deviation of the distribution.
    /// * `seed` - An optional seed.
    ///
    /// # Returns
    /// An error if `std_dev` is not finite (Nan or infinite).
    pub fn normal(mean: f32, std_dev: f32, seed: Option<u64>) -> Result<Self> {
        let distribution =
            Normal::new(mean, std_dev).map_err(|e| EcoErr::InvalidDistribution(e.to_string()))?;

        Ok(Self::new(distribution, seed))
    }
}

impl<D: Distribution<f32>> WeightGen for RandWeightGen<D> {
    fn sample(&mut self) -> f32 {
        self.distribution.sample(&mut self.rng)
    }
}
