use std::fmt::{self, Display};

use log::trace;
use ndarray::{Array1, ArrayView1};

use super::{NetworkConfig, layers::Layer};
use crate::{EcoErr, Result};

/// A feed-forward binary step network: an input layer, a stack of hidden layers and a fixed
/// reduction layer.
///
/// Information flows forward when processing an input and targets flow backward when training,
/// no gradient is ever computed.
#[derive(Clone, Debug)]
pub struct Network {
    layers: Vec<Layer>,
    learning_rate_for_weights: f32,
    learning_rate_for_biases: f32,
}

impl Network {
    /// Creates a new `Network` following a configuration.
    ///
    /// # Arguments
    /// * `config` - The sizes, initializer and learning rates of the network.
    ///
    /// # Returns
    /// An `InvalidTopology` error if any layer would be empty or the classes don't divide the
    /// last hidden layer.
    pub fn new(config: NetworkConfig) -> Result<Self> {
        let NetworkConfig {
            input_size,
            output_size,
            hidden_sizes,
            mut weight_gen,
            learning_rate_for_weights,
            learning_rate_for_biases,
        } = config;

        if input_size == 0 {
            return Err(EcoErr::InvalidTopology {
                what: "input layer",
                input_size,
                output_size: input_size,
            });
        }

        let mut layers = Vec::with_capacity(hidden_sizes.len() + 2);
        layers.push(Layer::input(input_size));

        let mut last_size = input_size;
        for size in hidden_sizes {
            if size == 0 {
                return Err(EcoErr::InvalidTopology {
                    what: "hidden layer",
                    input_size: last_size,
                    output_size: size,
                });
            }

            layers.push(Layer::hidden((last_size, size), weight_gen.as_mut()));
            last_size = size;
        }

        layers.push(Layer::output((last_size, output_size))?);

        Ok(Self {
            layers,
            learning_rate_for_weights,
            learning_rate_for_biases,
        })
    }

    /// Creates a new `Network` from already built layers.
    ///
    /// # Arguments
    /// * `layers` - An input layer, any amount of hidden layers and an output layer, in order.
    /// * `learning_rate_for_weights` - Base magnitude of the weight corrections.
    /// * `learning_rate_for_biases` - Base magnitude of the bias corrections.
    ///
    /// # Returns
    /// An error if the layers are out of place or adjacent sizes differ.
    pub fn with_layers<I>(
        layers: I,
        learning_rate_for_weights: f32,
        learning_rate_for_biases: f32,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Layer>,
    {
        let layers: Vec<Layer> = layers.into_iter().collect();
        let nlayers = layers.len();

        if nlayers < 2 {
            return Err(EcoErr::SizeMismatch {
                what: "layers",
                got: nlayers,
                expected: 2,
            });
        }

        for (i, layer) in layers.iter().enumerate() {
            let in_place = match layer {
                Layer::Input(_) => i == 0,
                Layer::Hidden(_) => i != 0 && i != nlayers - 1,
                Layer::Output(_) => i == nlayers - 1,
            };

            if !in_place {
                return Err(EcoErr::InvalidTopology {
                    what: "layer stack",
                    input_size: layer.input_size(),
                    output_size: layer.output_size(),
                });
            }
        }

        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(EcoErr::SizeMismatch {
                    what: "adjacent layers",
                    got: pair[1].input_size(),
                    expected: pair[0].output_size(),
                });
            }
        }

        Ok(Self {
            layers,
            learning_rate_for_weights,
            learning_rate_for_biases,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    /// Makes a forward pass through the network.
    ///
    /// # Arguments
    /// * `input` - A vector of `input_size` values.
    ///
    /// # Returns
    /// The binary output of the network.
    pub fn process(&self, input: ArrayView1<f32>) -> Array1<f32> {
        let mut layers = self.layers.iter();
        let Some(first) = layers.next() else {
            return input.to_owned();
        };

        layers.fold(first.process(input), |x, layer| layer.process(x.view()))
    }

    /// Trains the network on a single sample.
    ///
    /// Makes a forward pass remembering what every layer saw and produced, then walks the layers
    /// backward letting each one correct itself and hand a target to the previous one.
    ///
    /// # Arguments
    /// * `input` - A vector of `input_size` values.
    /// * `target` - The desired output, usually a one-hot vector.
    /// * `rate_reduction` - Factor applied to both learning rates.
    /// * `inverse` - Flips the sign of both rates, making the network unlearn the sample.
    ///
    /// # Returns
    /// The targets handed backward, starting with the output layer's projection.
    pub fn train(
        &mut self,
        input: ArrayView1<f32>,
        target: ArrayView1<f32>,
        rate_reduction: f32,
        inverse: bool,
    ) -> Vec<Array1<f32>> {
        let sign = if inverse { -1. } else { 1. };
        let weight_rate = sign * self.learning_rate_for_weights * rate_reduction;
        let bias_rate = sign * self.learning_rate_for_biases * rate_reduction;

        trace!(weight_rate = weight_rate, bias_rate = bias_rate; "training sample");

        let mut x = input.to_owned();
        let mut seen = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let y = layer.process(x.view());
            seen.push((x, y.clone()));
            x = y;
        }

        let mut targets = Vec::with_capacity(self.layers.len());
        let mut target = target.to_owned();
        for (layer, (x, y)) in self.layers.iter_mut().zip(seen).rev() {
            target = layer.learn(x.view(), y.view(), target.view(), weight_rate, bias_rate);
            if layer.is_learning() {
                targets.push(target.clone());
            }
        }

        targets
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            match layer {
                Layer::Input(l) => write!(f, "Input: {{input_size: {}}}", l.size())?,
                Layer::Hidden(l) => {
                    let (min_weight, max_weight) = min_max(l.weights().iter());
                    let (min_bias, max_bias) = min_max(l.biases().iter());
                    write!(
                        f,
                        "Hidden: {{input_size: {}, output_size: {}, min_weight: {min_weight}, max_weight: {max_weight}, min_bias: {min_bias}, max_bias: {max_bias}}}",
                        l.input_size(),
                        l.output_size(),
                    )?
                }
                Layer::Output(l) => write!(
                    f,
                    "Output: {{input_size: {}, output_size: {}}}",
                    l.input_size(),
                    l.output_size()
                )?,
            }
        }

        Ok(())
    }
}

fn min_max<'a, I>(values: I) -> (f32, f32)
where
    I: Iterator<Item = &'a f32>,
{
    values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}
