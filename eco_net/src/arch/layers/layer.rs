use ndarray::{Array1, ArrayView1};

use super::{Hidden, Input, Output};
use crate::{Result, weight_gen::WeightGen};

#[derive(Clone, Debug)]
pub enum Layer {
    Input(Input),
    Hidden(Hidden),
    Output(Output),
}

impl Layer {
    pub fn input(size: usize) -> Self {
        Self::Input(Input::new(size))
    }

    pub fn hidden(dim: (usize, usize), weight_gen: &mut dyn WeightGen) -> Self {
        Self::Hidden(Hidden::new(dim, weight_gen))
    }

    pub fn output(dim: (usize, usize)) -> Result<Self> {
        Ok(Self::Output(Output::new(dim.0, dim.1)?))
    }

    pub fn input_size(&self) -> usize {
        match self {
            Self::Input(l) => l.size(),
            Self::Hidden(l) => l.input_size(),
            Self::Output(l) => l.input_size(),
        }
    }

    pub fn output_size(&self) -> usize {
        match self {
            Self::Input(l) => l.size(),
            Self::Hidden(l) => l.output_size(),
            Self::Output(l) => l.output_size(),
        }
    }

    /// Whether this layer takes part in the backward pass.
    pub fn is_learning(&self) -> bool {
        !matches!(self, Self::Input(_))
    }

    pub fn process(&self, x: ArrayView1<f32>) -> Array1<f32> {
        match self {
            Self::Input(l) => l.process(x),
            Self::Hidden(l) => l.process(x),
            Self::Output(l) => l.process(x),
        }
    }

    /// Runs this layer's part of the backward pass.
    ///
    /// Hidden layers correct their parameters, the output layer only projects the target and the
    /// input layer hands the target back untouched.
    ///
    /// # Arguments
    /// * `input` - The input this layer saw on the forward pass.
    /// * `output` - The output this layer produced on the forward pass.
    /// * `target` - The desired output.
    /// * `weight_rate` - Magnitude of the weight corrections.
    /// * `bias_rate` - Magnitude of the bias corrections.
    ///
    /// # Returns
    /// The target for the previous layer.
    pub fn learn(
        &mut self,
        input: ArrayView1<f32>,
        output: ArrayView1<f32>,
        target: ArrayView1<f32>,
        weight_rate: f32,
        bias_rate: f32,
    ) -> Array1<f32> {
        match self {
            Self::Input(_) => target.to_owned(),
            Self::Hidden(l) => l.learn(input, output, target, weight_rate, bias_rate),
            Self::Output(l) => l.project(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn input_hands_the_target_back() {
        let mut layer = Layer::input(3);
        let target = array![1., 0., 1.];

        assert!(!layer.is_learning());
        let x = array![0.2, 0., 0.7];
        let y = layer.process(x.view());
        assert_eq!(layer.learn(x.view(), y.view(), target.view(), 0.1, 0.1), target);
    }

    #[test]
    fn output_projects_the_target() {
        let mut layer = Layer::output((4, 2)).unwrap();

        assert!(layer.is_learning());
        let x = array![1., 1., 0., 0.];
        let y = layer.process(x.view());
        assert_eq!(y, array![1., 0.]);
        assert_eq!(
            layer.learn(x.view(), y.view(), array![0., 1.].view(), 0.1, 0.1),
            array![0., 0., 1., 1.]
        );
    }
}
