use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::{EcoErr, Result};

/// A batch of samples, one per row of `inputs` and `labels`.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    inputs: Array2<f32>,
    labels: Array2<f32>,
}

impl Batch {
    /// Creates a new `Batch`.
    ///
    /// # Arguments
    /// * `inputs` - One input vector per row.
    /// * `labels` - One label vector per row.
    ///
    /// # Returns
    /// An error if the batch is empty or the amount of rows differ.
    pub fn new(inputs: Array2<f32>, labels: Array2<f32>) -> Result<Self> {
        if inputs.nrows() != labels.nrows() {
            return Err(EcoErr::SizeMismatch {
                what: "batch labels",
                got: labels.nrows(),
                expected: inputs.nrows(),
            });
        }

        if inputs.nrows() == 0 {
            return Err(EcoErr::EmptyBatch);
        }

        Ok(Self { inputs, labels })
    }

    /// Creates a new `Batch` from row vectors.
    ///
    /// # Returns
    /// An error if the rows are ragged, the batch is empty or the amount of rows differ.
    pub fn from_rows(inputs: Vec<Vec<f32>>, labels: Vec<Vec<f32>>) -> Result<Self> {
        Self::new(stack_rows(inputs, "batch inputs")?, stack_rows(labels, "batch labels")?)
    }

    pub fn len(&self) -> usize {
        self.inputs.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.nrows() == 0
    }

    pub fn input_size(&self) -> usize {
        self.inputs.ncols()
    }

    pub fn label_size(&self) -> usize {
        self.labels.ncols()
    }

    pub fn inputs(&self) -> ArrayView2<'_, f32> {
        self.inputs.view()
    }

    pub fn labels(&self) -> ArrayView2<'_, f32> {
        self.labels.view()
    }

    /// # Panics
    /// If `index` is out of bounds.
    pub fn input(&self, index: usize) -> ArrayView1<'_, f32> {
        self.inputs.row(index)
    }

    /// # Panics
    /// If `index` is out of bounds.
    pub fn label(&self, index: usize) -> ArrayView1<'_, f32> {
        self.labels.row(index)
    }

    /// Iterates over the `(input, label)` pairs of this batch.
    pub fn samples(&self) -> impl Iterator<Item = (ArrayView1<'_, f32>, ArrayView1<'_, f32>)> {
        self.inputs
            .axis_iter(Axis(0))
            .zip(self.labels.axis_iter(Axis(0)))
    }
}

fn stack_rows(rows: Vec<Vec<f32>>, what: &'static str) -> Result<Array2<f32>> {
    let ncols = rows.first().map(Vec::len).unwrap_or_default();

    if let Some(row) = rows.iter().find(|row| row.len() != ncols) {
        return Err(EcoErr::SizeMismatch {
            what,
            got: row.len(),
            expected: ncols,
        });
    }

    Ok(Array2::from_shape_fn((rows.len(), ncols), |(r, c)| rows[r][c]))
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn rows_must_be_parallel() {
        let res = Batch::new(Array2::zeros((3, 2)), Array2::zeros((2, 4)));

        assert_eq!(
            res.unwrap_err(),
            EcoErr::SizeMismatch {
                what: "batch labels",
                got: 2,
                expected: 3,
            }
        );
    }

    #[test]
    fn empty_batches_are_rejected() {
        let res = Batch::new(Array2::zeros((0, 2)), Array2::zeros((0, 4)));
        assert_eq!(res.unwrap_err(), EcoErr::EmptyBatch);
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let res = Batch::from_rows(vec![vec![1., 0.], vec![1.]], vec![vec![1.], vec![0.]]);
        assert!(matches!(res, Err(EcoErr::SizeMismatch { what: "batch inputs", .. })));
    }

    #[test]
    fn samples_pair_rows() {
        let batch = Batch::from_rows(
            vec![vec![0., 1.], vec![1., 1.]],
            vec![vec![1., 0.], vec![0., 1.]],
        )
        .unwrap();

        let samples: Vec<_> = batch.samples().collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].0, array![1., 1.]);
        assert_eq!(samples[1].1, array![0., 1.]);
        assert_eq!(batch.input_size(), 2);
        assert_eq!(batch.label_size(), 2);
    }
}
