use ndarray::{Array1, Array2};
use rand::{Rng, rngs::StdRng};
use rand_distr::{Distribution, Normal, Uniform};

use super::{Batch, Split};
use crate::{EcoErr, Result, weight_gen::generate_rng};

/// The distribution random noise values are drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RandomFn {
    Uniform { min: f32, max: f32 },
    Gaussian { mean: f32, sigma: f32 },
}

/// How the values of every noise sample are produced.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueGen {
    /// Every sample gets the same vector.
    Fixed(Vec<f32>),
    /// Every sample gets `count` fresh random values.
    Random { count: usize, distribution: RandomFn },
}

impl ValueGen {
    /// The all-ones vector, the usual target for unlearning noise.
    pub fn ones(count: usize) -> Self {
        Self::Fixed(vec![1.; count])
    }

    /// Checks the generator would produce vectors of `expected` values.
    pub fn check_width(&self, what: &'static str, expected: usize) -> Result<()> {
        if self.width() != expected {
            return Err(EcoErr::SizeMismatch {
                what,
                got: self.width(),
                expected,
            });
        }

        Ok(())
    }

    fn width(&self) -> usize {
        match self {
            Self::Fixed(value) => value.len(),
            Self::Random { count, .. } => *count,
        }
    }

    fn sampler(&self) -> Result<Sampler> {
        let invalid = |e: &dyn std::error::Error| EcoErr::InvalidDistribution(e.to_string());

        let sampler = match self {
            Self::Fixed(value) => Sampler::Fixed(Array1::from_vec(value.clone())),
            Self::Random {
                count,
                distribution: RandomFn::Uniform { min, max },
            } => Sampler::Uniform(
                *count,
                Uniform::new_inclusive(*min, *max).map_err(|e| invalid(&e))?,
            ),
            Self::Random {
                count,
                distribution: RandomFn::Gaussian { mean, sigma },
            } => Sampler::Normal(*count, Normal::new(*mean, *sigma).map_err(|e| invalid(&e))?),
        };

        Ok(sampler)
    }
}

enum Sampler {
    Fixed(Array1<f32>),
    Uniform(usize, Uniform<f32>),
    Normal(usize, Normal<f32>),
}

impl Sampler {
    fn fill<R: Rng>(&self, rows: usize, rng: &mut R) -> Array2<f32> {
        match self {
            Self::Fixed(value) => Array2::from_shape_fn((rows, value.len()), |(_, c)| value[c]),
            Self::Uniform(count, d) => Array2::from_shape_fn((rows, *count), |_| d.sample(&mut *rng)),
            Self::Normal(count, d) => Array2::from_shape_fn((rows, *count), |_| d.sample(&mut *rng)),
        }
    }
}

/// Synthetic batches of noise paired with a constant target, used to make the network unlearn
/// answers it gives to meaningless inputs.
#[derive(Clone, Debug)]
pub struct NoiseDataset {
    split: Split,
}

impl NoiseDataset {
    /// Generates a new `NoiseDataset`.
    ///
    /// # Arguments
    /// * `input` - Generator for the input vectors.
    /// * `output` - Generator for the target vectors.
    /// * `count` - Total amount of samples.
    /// * `batch_size` - Samples per batch, it must divide `count`.
    /// * `seed` - An optional seed for the random values.
    ///
    /// # Returns
    /// An error if `batch_size` doesn't divide `count` or a distribution is invalid.
    pub fn new(
        input: ValueGen,
        output: ValueGen,
        count: usize,
        batch_size: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        if batch_size == 0 || count == 0 {
            return Err(EcoErr::EmptyBatch);
        }

        if count % batch_size != 0 {
            return Err(EcoErr::SizeMismatch {
                what: "noise samples",
                got: count,
                expected: count - count % batch_size,
            });
        }

        let mut rng: StdRng = generate_rng(seed);
        let (input, output) = (input.sampler()?, output.sampler()?);

        let batches = (0..count / batch_size)
            .map(|_| {
                let inputs = input.fill(batch_size, &mut rng);
                let labels = output.fill(batch_size, &mut rng);
                Batch::new(inputs, labels)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            split: Split::new(batches)?,
        })
    }

    /// Uniform noise over `[0, 1]` paired with an all-ones target.
    pub fn uniform_to_ones(
        input_size: usize,
        classes: usize,
        count: usize,
        batch_size: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        let input = ValueGen::Random {
            count: input_size,
            distribution: RandomFn::Uniform { min: 0., max: 1. },
        };

        Self::new(input, ValueGen::ones(classes), count, batch_size, seed)
    }

    pub fn split(&self) -> &Split {
        &self.split
    }

    pub fn batch_count(&self) -> usize {
        self.split.batch_count()
    }

    /// # Panics
    /// If `index` is out of bounds.
    pub fn batch(&self, index: usize) -> &Batch {
        self.split.batch(index)
    }

    pub fn input_size(&self) -> usize {
        self.split.input_size().unwrap_or_default()
    }
}
