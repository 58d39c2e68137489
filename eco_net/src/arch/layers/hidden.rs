use ndarray::{Array1, Array2, ArrayView1};

use crate::{EcoErr, Result, arch::activations::Step, weight_gen::WeightGen};

/// A fully connected binary step layer that learns through error-curvature corrections.
///
/// A high bias learning rate is needed in practice: the biases are what moves the activation
/// threshold, without them the outputs saturate.
#[derive(Clone, Debug)]
pub struct Hidden {
    weights: Array2<f32>,
    biases: Array1<f32>,
    step: Step,
}

/// The corrections computed by a single [`Hidden::learn`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct Corrections {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub target: Array1<f32>,
}

impl Hidden {
    /// Creates a new `Hidden` layer with zeroed biases.
    ///
    /// # Arguments
    /// * `dim` - The input and output sizes of the layer.
    /// * `weight_gen` - Generator for the initial weights, sampled in row-major order.
    pub fn new(dim: (usize, usize), weight_gen: &mut dyn WeightGen) -> Self {
        let (input_size, output_size) = dim;
        let weights = Array2::from_shape_fn((output_size, input_size), |_| weight_gen.sample());

        Self {
            weights,
            biases: Array1::zeros(output_size),
            step: Step::new(),
        }
    }

    /// Creates a new `Hidden` layer from explicit parameters.
    ///
    /// # Arguments
    /// * `weights` - An `output_size x input_size` matrix.
    /// * `biases` - One bias per output unit.
    ///
    /// # Returns
    /// A `SizeMismatch` error if there isn't a bias per row of weights.
    pub fn from_parts(weights: Array2<f32>, biases: Array1<f32>) -> Result<Self> {
        if weights.nrows() != biases.len() {
            return Err(EcoErr::SizeMismatch {
                what: "hidden layer biases",
                got: biases.len(),
                expected: weights.nrows(),
            });
        }

        Ok(Self {
            weights,
            biases,
            step: Step::new(),
        })
    }

    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    pub fn process(&self, x: ArrayView1<f32>) -> Array1<f32> {
        self.step.apply_into(self.weights.dot(&x) + &self.biases)
    }

    /// Computes the corrections for one sample without applying them.
    ///
    /// For every pair of output unit `j` and input unit `i`, with `y = output[j]`,
    /// `m = |target[j] - output[j]|` and `x = input[i]`:
    ///
    /// | y | m | x | bias | weight | target for x |
    /// |---|---|---|------|--------|--------------|
    /// | 0 | 0 | 0 | 0    | +w     | 0            |
    /// | 0 | 0 | 1 | 0    | 0      | 0            |
    /// | 0 | 1 | 0 | +b   | 0      | 1            |
    /// | 0 | 1 | 1 | +b   | +w     | 1            |
    /// | 1 | 0 | 0 | 0    | 0      | 0            |
    /// | 1 | 0 | 1 | 0    | -w     | 0            |
    /// | 1 | 1 | 0 | -b   | -w     | 1            |
    /// | 1 | 1 | 1 | -b   | 0      | 1            |
    ///
    /// The target handed to the previous layer is `step(Wᵀ·m)`: the mismatches sent backward
    /// through the current weights, so an input unit is only asked to fire when the units it
    /// feeds through positive weights outweigh the rest. The last column of the table assumes a
    /// positive weight.
    ///
    /// # Arguments
    /// * `input` - The binary input seen on the forward pass.
    /// * `output` - The binary output of this layer for that input.
    /// * `target` - The desired output.
    /// * `weight_rate` - Magnitude of the weight corrections.
    /// * `bias_rate` - Magnitude of the bias corrections.
    pub fn corrections(
        &self,
        input: ArrayView1<f32>,
        output: ArrayView1<f32>,
        target: ArrayView1<f32>,
        weight_rate: f32,
        bias_rate: f32,
    ) -> Corrections {
        let mismatch = (&target - &output).mapv_into(f32::abs);
        // +1 while the unit is off, -1 once it fires
        let sign = output.mapv(|y| 1. - 2. * y);

        let weights = Array2::from_shape_fn(self.weights.dim(), |(j, i)| {
            let (y, m, x) = (output[j], mismatch[j], input[i]);
            let agrees = m * x + (1. - m) * (1. - x);
            let active = y * (1. - agrees) + (1. - y) * agrees;

            weight_rate * sign[j] * active
        });

        let biases = &sign * &mismatch * bias_rate;

        let target = self.step.apply_into(self.weights.t().dot(&mismatch));

        Corrections {
            weights,
            biases,
            target,
        }
    }

    /// Applies the corrections for one sample and returns the target for the previous layer.
    ///
    /// See [`Hidden::corrections`] for the rule.
    pub fn learn(
        &mut self,
        input: ArrayView1<f32>,
        output: ArrayView1<f32>,
        target: ArrayView1<f32>,
        weight_rate: f32,
        bias_rate: f32,
    ) -> Array1<f32> {
        let Corrections {
            weights,
            biases,
            target,
        } = self.corrections(input, output, target, weight_rate, bias_rate);

        self.weights += &weights;
        self.biases += &biases;

        target
    }
}
