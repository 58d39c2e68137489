use log::{debug, warn};
use ndarray::{Array2, ArrayView1};

use super::{Batch, Dataset, Split};
use crate::{EcoErr, Result, one_hot::one_hot_decode};

/// A dataset whose training batches hold the same amount of samples of every class.
///
/// Each batch lists the samples of class `0` first, then class `1` and so on. Samples of the
/// larger classes that don't fit evenly are dropped, the test split is kept as is.
#[derive(Clone, Debug)]
pub struct StratifiedDataset {
    train: Split,
    test: Split,
}

impl StratifiedDataset {
    /// Rearranges the training split of `inner` into stratified batches.
    ///
    /// The amount of batches is kept, their size becomes the amount of classes times the largest
    /// per class count every batch can afford.
    ///
    /// # Arguments
    /// * `inner` - The dataset to rearrange.
    ///
    /// # Returns
    /// An `EmptyBatch` error if some class has fewer samples than there are batches.
    pub fn new<D: Dataset>(inner: &D) -> Result<Self> {
        let train = inner.train();
        let classes = train.label_size().unwrap_or_default();
        let batch_count = train.batch_count();

        let mut strata: Vec<Vec<ArrayView1<f32>>> = vec![Vec::new(); classes];
        for (input, label) in train.iter().flat_map(|batch| batch.samples()) {
            match one_hot_decode(&label) {
                Ok(class) => strata[class].push(input),
                Err(e) => warn!("skipping sample: {e}"),
            }
        }

        let smallest = strata.iter().map(Vec::len).min().unwrap_or_default();
        let per_class = smallest.checked_div(batch_count).unwrap_or_default();
        if per_class == 0 {
            return Err(EcoErr::EmptyBatch);
        }

        debug!(classes = classes, per_class = per_class; "stratifying training split");

        let input_size = train.input_size().unwrap_or_default();
        let rows = classes * per_class;

        let batches = (0..batch_count)
            .map(|b| {
                let offset = b * per_class;
                let inputs = Array2::from_shape_fn((rows, input_size), |(r, i)| {
                    strata[r / per_class][offset + r % per_class][i]
                });
                let labels = Array2::from_shape_fn((rows, classes), |(r, c)| {
                    if r / per_class == c { 1. } else { 0. }
                });

                Batch::new(inputs, labels)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            train: Split::new(batches)?,
            test: inner.test().clone(),
        })
    }
}

impl Dataset for StratifiedDataset {
    fn train(&self) -> &Split {
        &self.train
    }

    fn test(&self) -> &Split {
        &self.test
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::dataset::InMemoryDataset;

    fn dataset() -> InMemoryDataset {
        // class 0 appears 4 times, class 1 three times
        let train = Split::new(vec![
            Batch::from_rows(
                vec![vec![0.], vec![1.], vec![2.], vec![3.]],
                vec![vec![1., 0.], vec![1., 0.], vec![0., 1.], vec![1., 0.]],
            )
            .unwrap(),
            Batch::from_rows(
                vec![vec![4.], vec![5.], vec![6.]],
                vec![vec![0., 1.], vec![1., 0.], vec![0., 1.]],
            )
            .unwrap(),
        ])
        .unwrap();

        let test = Split::new(vec![
            Batch::from_rows(vec![vec![9.]], vec![vec![0., 1.]]).unwrap(),
        ])
        .unwrap();

        InMemoryDataset::new(train, test)
    }

    #[test]
    fn batches_are_balanced_and_ordered_by_class() {
        let stratified = StratifiedDataset::new(&dataset()).unwrap();

        assert_eq!(stratified.train_batch_count(), 2);

        let first = stratified.train_batch(0);
        assert_eq!(first.inputs(), array![[0.], [2.]]);
        assert_eq!(first.labels(), array![[1., 0.], [0., 1.]]);

        let second = stratified.train_batch(1);
        assert_eq!(second.inputs(), array![[1.], [4.]]);
    }

    #[test]
    fn test_split_is_untouched() {
        let inner = dataset();
        let stratified = StratifiedDataset::new(&inner).unwrap();

        assert_eq!(stratified.test(), inner.test());
    }

    #[test]
    fn too_few_samples_per_class() {
        let train = Split::new(vec![
            Batch::from_rows(vec![vec![0.]], vec![vec![1., 0.]]).unwrap(),
            Batch::from_rows(vec![vec![1.]], vec![vec![1., 0.]]).unwrap(),
        ])
        .unwrap();

        let inner = InMemoryDataset::new(train, Split::default());
        assert_eq!(StratifiedDataset::new(&inner).unwrap_err(), EcoErr::EmptyBatch);
    }
}
