//! The JSON configuration of an experiment and its resolution into runtime objects.

use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result};
use eco_net::{
    arch::{Network, NetworkConfig},
    dataset::{NoiseDataset, RandomFn, ValueGen},
    weight_gen::{ConstWeightGen, RandWeightGen, WeightGen},
};
use serde::{Deserialize, Serialize};

/// The environment variable holding the configuration path when none is given as an argument.
pub const CONFIG_ENV: &str = "ECO_CONFIG";

/// The specification for a whole experiment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub network: NetworkSpec,
    pub dataset: DatasetSpec,
    pub noise: Option<NoiseSpec>,
    pub training: TrainingSpec,
    pub evaluation: EvaluationSpec,
    pub seed: Option<u64>,
}

/// The specification for the `Network`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSpec {
    pub input_size: usize,
    pub output_size: usize,
    pub hidden_sizes: Vec<usize>,
    pub init: InitSpec,
    pub learning_rate_for_weights: f32,
    pub learning_rate_for_biases: f32,
}

/// The specification for the `WeightGen` of the hidden layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSpec {
    Const { value: f32 },
    Uniform { low: f32, high: f32 },
    LecunUniform,
    Normal { mean: f32, std_dev: f32 },
}

/// The specification for the MNIST dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSpec {
    pub dir: PathBuf,
    pub batch_size: usize,
    pub stratified: bool,
}

/// The specification for the values of a `NoiseDataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSpec {
    Fixed { values: Vec<f32> },
    Uniform { min: f32, max: f32 },
    Gaussian { mean: f32, sigma: f32 },
    Ones,
}

/// The specification for the noise the network unlearns after every trained sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSpec {
    pub input: ValueSpec,
    pub output: ValueSpec,
    /// Total amount of noise samples, one batch per training batch when absent.
    pub count: Option<usize>,
    pub batch_size: usize,
    /// Factor applied to the training rate for the unlearning passes.
    pub coefficient: f32,
}

/// The specification for the order samples are fed to the network in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodSpec {
    /// A window of the training sequence.
    Plain { skip: usize, take: usize },
    /// One pass per label, each over the first `per_label` samples of that label.
    Sequence { labels: Vec<usize>, per_label: usize },
    /// Trains the first class performing below the target until every class reaches it.
    Indexed {
        target_performance: f32,
        attempts: usize,
        /// Stops after this many rounds even if some class is still below the target.
        max_rounds: Option<usize>,
    },
}

/// The specification for unlearning the wrong answers of a sample before learning it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnlearningSpec {
    /// The sample is only learnt while its target output is at most this value.
    pub learn_cutoff: f32,
    /// Wrong outputs above this value are unlearnt.
    pub unlearn_cutoff: f32,
    /// Factor applied to the training rate for the unlearning pass.
    pub unlearn_rate: f32,
}

/// The specification for the training loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSpec {
    pub method: MethodSpec,
    pub rate: f32,
    pub rate_decay: f32,
    pub repeats: usize,
    pub unlearning: Option<UnlearningSpec>,
}

/// The specification for the evaluations run while training and at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSpec {
    /// Test batches evaluated every `skip + 1` samples.
    pub full_batches: usize,
    /// Test batches evaluated after every other sample.
    pub short_batches: usize,
    pub skip: usize,
    /// Test batches of the final report.
    pub final_batches: usize,
    /// Training samples of the final report.
    pub train_samples: usize,
}

impl Default for NetworkSpec {
    fn default() -> Self {
        Self {
            input_size: 784,
            output_size: 10,
            hidden_sizes: vec![1000],
            init: InitSpec::Uniform {
                low: -0.5,
                high: 0.5,
            },
            learning_rate_for_weights: 0.001,
            learning_rate_for_biases: 0.01,
        }
    }
}

impl Default for DatasetSpec {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/mnist"),
            batch_size: 100,
            stratified: false,
        }
    }
}

impl Default for NoiseSpec {
    fn default() -> Self {
        Self {
            input: ValueSpec::Uniform { min: 0., max: 1. },
            output: ValueSpec::Ones,
            count: None,
            batch_size: 100,
            coefficient: 0.1,
        }
    }
}

impl Default for UnlearningSpec {
    fn default() -> Self {
        Self {
            learn_cutoff: 1.,
            unlearn_cutoff: 0.5,
            unlearn_rate: 0.25,
        }
    }
}

impl Default for TrainingSpec {
    fn default() -> Self {
        Self {
            method: MethodSpec::Plain {
                skip: 250,
                take: 250,
            },
            rate: 0.8,
            rate_decay: 1.,
            repeats: 5,
            unlearning: None,
        }
    }
}

impl Default for EvaluationSpec {
    fn default() -> Self {
        Self {
            full_batches: 3,
            short_batches: 1,
            skip: 10,
            final_batches: 10,
            train_samples: 250,
        }
    }
}

impl ExperimentConfig {
    /// Parses a configuration, missing fields take their default values.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("invalid experiment configuration")
    }

    /// Loads the configuration from the path given as the first argument, or from the one in
    /// `ECO_CONFIG`. Falls back to the defaults when neither is set.
    pub fn load() -> Result<Self> {
        let path = env::args().nth(1).or_else(|| env::var(CONFIG_ENV).ok());

        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(&path).with_context(|| format!("cannot read '{path}'"))?;
        Self::from_json(&content)
    }
}

/// Builds the runtime objects of an experiment following its specification.
pub struct ExperimentBuilder {
    seed: Option<u64>,
}

impl ExperimentBuilder {
    /// Creates a new `ExperimentBuilder`.
    ///
    /// # Arguments
    /// * `seed` - An optional seed for every random generator built.
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    /// Builds a new `Network` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the network.
    pub fn network(&self, spec: &NetworkSpec) -> Result<Network> {
        let fan_in = spec.input_size;

        let config = NetworkConfig {
            input_size: spec.input_size,
            output_size: spec.output_size,
            hidden_sizes: spec.hidden_sizes.clone(),
            weight_gen: self.resolve_init(spec.init, fan_in)?,
            learning_rate_for_weights: spec.learning_rate_for_weights,
            learning_rate_for_biases: spec.learning_rate_for_biases,
        };

        Ok(Network::new(config)?)
    }

    /// Builds a new `NoiseDataset` following a spec.
    ///
    /// # Arguments
    /// * `spec` - The specification for the noise.
    /// * `network` - The sizes of the network the noise is fed to.
    /// * `train_batch_count` - The amount of training batches, used when `spec.count` is absent.
    pub fn noise(
        &self,
        spec: &NoiseSpec,
        network: &NetworkSpec,
        train_batch_count: usize,
    ) -> Result<NoiseDataset> {
        let input = self.resolve_values(&spec.input, network.input_size);
        let output = self.resolve_values(&spec.output, network.output_size);

        input.check_width("noise inputs", network.input_size)?;
        output.check_width("noise targets", network.output_size)?;

        let count = spec.count.unwrap_or(spec.batch_size * train_batch_count);
        Ok(NoiseDataset::new(
            input,
            output,
            count,
            spec.batch_size,
            self.seed,
        )?)
    }

    fn resolve_init(&self, spec: InitSpec, fan_in: usize) -> Result<Box<dyn WeightGen>> {
        let weight_gen: Box<dyn WeightGen> = match spec {
            InitSpec::Const { value } => Box::new(ConstWeightGen::new(value)),
            InitSpec::Uniform { low, high } => {
                Box::new(RandWeightGen::uniform(low, high, self.seed)?)
            }
            InitSpec::LecunUniform => Box::new(RandWeightGen::lecun_uniform(fan_in, self.seed)?),
            InitSpec::Normal { mean, std_dev } => {
                Box::new(RandWeightGen::normal(mean, std_dev, self.seed)?)
            }
        };

        Ok(weight_gen)
    }

    fn resolve_values(&self, spec: &ValueSpec, count: usize) -> ValueGen {
        match spec {
            ValueSpec::Fixed { values } => ValueGen::Fixed(values.clone()),
            ValueSpec::Uniform { min, max } => ValueGen::Random {
                count,
                distribution: RandomFn::Uniform {
                    min: *min,
                    max: *max,
                },
            },
            ValueSpec::Gaussian { mean, sigma } => ValueGen::Random {
                count,
                distribution: RandomFn::Gaussian {
                    mean: *mean,
                    sigma: *sigma,
                },
            },
            ValueSpec::Ones => ValueGen::ones(count),
        }
    }
}
