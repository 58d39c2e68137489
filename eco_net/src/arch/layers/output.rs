use ndarray::{Array1, Array2, ArrayView1};

use crate::{EcoErr, Result, arch::activations::Step};

/// The fixed reduction layer at the end of the network.
///
/// Each output unit averages a contiguous block of `input_size / output_size` input units. Its
/// matrix is never learned, during training it only projects the target back through its
/// transpose so the last hidden layer gets a target of its own width.
#[derive(Clone, Debug)]
pub struct Output {
    reduction: Array2<f32>,
    step: Step,
}

impl Output {
    /// Creates a new `Output` layer.
    ///
    /// # Arguments
    /// * `input_size` - Width of the last hidden layer.
    /// * `output_size` - Amount of classes.
    ///
    /// # Returns
    /// An `InvalidTopology` error if `input_size` is not a non-zero multiple of `output_size`.
    pub fn new(input_size: usize, output_size: usize) -> Result<Self> {
        if input_size == 0 || output_size == 0 || input_size % output_size != 0 {
            return Err(EcoErr::InvalidTopology {
                what: "output layer",
                input_size,
                output_size,
            });
        }

        let block = input_size / output_size;
        let rate = 1. / block as f32;
        let reduction = Array2::from_shape_fn((output_size, input_size), |(j, i)| {
            if i / block == j { rate } else { 0. }
        });

        Ok(Self {
            reduction,
            step: Step::new(),
        })
    }

    pub fn input_size(&self) -> usize {
        self.reduction.ncols()
    }

    pub fn output_size(&self) -> usize {
        self.reduction.nrows()
    }

    pub fn reduction(&self) -> &Array2<f32> {
        &self.reduction
    }

    pub fn process(&self, x: ArrayView1<f32>) -> Array1<f32> {
        self.step.apply_into(self.reduction.dot(&x))
    }

    /// Maps a target over the classes into a target over the input units.
    ///
    /// # Arguments
    /// * `target` - The desired output of this layer.
    ///
    /// # Returns
    /// The binary target for the layer feeding this one.
    pub fn project(&self, target: ArrayView1<f32>) -> Array1<f32> {
        self.step.apply_into(self.reduction.t().dot(&target))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn rejects_non_multiple_widths() {
        assert_eq!(
            Output::new(10, 3).unwrap_err(),
            EcoErr::InvalidTopology {
                what: "output layer",
                input_size: 10,
                output_size: 3,
            }
        );
        assert!(Output::new(0, 3).is_err());
        assert!(Output::new(4, 0).is_err());
    }

    #[test]
    fn rows_sum_to_one() {
        let output = Output::new(8, 2).unwrap();

        for row in output.reduction().rows() {
            assert_eq!(row.sum(), 1.0);
        }
        assert_eq!(
            output.reduction(),
            &array![
                [0.25, 0.25, 0.25, 0.25, 0., 0., 0., 0.],
                [0., 0., 0., 0., 0.25, 0.25, 0.25, 0.25]
            ]
        );
    }

    #[test]
    fn rows_sum_to_one_for_wide_layers() {
        let output = Output::new(1000, 10).unwrap();

        for row in output.reduction().rows() {
            assert!((row.sum() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn block_expanded_one_hot_is_reduced_back() {
        let output = Output::new(6, 3).unwrap();
        let expanded = array![0., 0., 1., 1., 0., 0.];

        assert_eq!(output.process(expanded.view()), array![0., 1., 0.]);
    }

    #[test]
    fn process_is_binary() {
        let output = Output::new(6, 3).unwrap();
        let partial = array![1., 0., 0., 1., 0., 0.];

        assert_eq!(output.process(partial.view()), array![1., 1., 0.]);
    }

    #[test]
    fn project_expands_target_over_blocks() {
        let output = Output::new(6, 3).unwrap();
        let target = array![0., 0., 1.];

        assert_eq!(
            output.project(target.view()),
            array![0., 0., 0., 0., 1., 1.]
        );
    }
}
