use std::slice;

use super::Batch;
use crate::{EcoErr, Result};

/// An ordered, immutable list of batches sharing the same input and label widths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Split {
    batches: Vec<Batch>,
}

impl Split {
    /// Creates a new `Split`.
    ///
    /// # Returns
    /// A `SizeMismatch` error if the batches disagree on their widths.
    pub fn new(batches: Vec<Batch>) -> Result<Self> {
        if let Some(first) = batches.first() {
            for batch in &batches[1..] {
                if batch.input_size() != first.input_size() {
                    return Err(EcoErr::SizeMismatch {
                        what: "split inputs",
                        got: batch.input_size(),
                        expected: first.input_size(),
                    });
                }

                if batch.label_size() != first.label_size() {
                    return Err(EcoErr::SizeMismatch {
                        what: "split labels",
                        got: batch.label_size(),
                        expected: first.label_size(),
                    });
                }
            }
        }

        Ok(Self { batches })
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// # Panics
    /// If `index` is out of bounds.
    pub fn batch(&self, index: usize) -> &Batch {
        &self.batches[index]
    }

    pub fn get(&self, index: usize) -> Option<&Batch> {
        self.batches.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Batch> {
        self.batches.iter()
    }

    /// Total amount of samples over every batch.
    pub fn len(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }

    pub fn input_size(&self) -> Option<usize> {
        self.batches.first().map(Batch::input_size)
    }

    pub fn label_size(&self) -> Option<usize> {
        self.batches.first().map(Batch::label_size)
    }
}

impl<'a> IntoIterator for &'a Split {
    type Item = &'a Batch;
    type IntoIter = slice::Iter<'a, Batch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    fn batch(rows: usize, x: usize, y: usize) -> Batch {
        Batch::new(Array2::zeros((rows, x)), Array2::zeros((rows, y))).unwrap()
    }

    #[test]
    fn counts_batches_and_samples() {
        let split = Split::new(vec![batch(3, 2, 1), batch(2, 2, 1)]).unwrap();

        assert_eq!(split.batch_count(), 2);
        assert_eq!(split.len(), 5);
        assert_eq!(split.input_size(), Some(2));
        assert!(split.get(2).is_none());
    }

    #[test]
    fn widths_must_agree() {
        let res = Split::new(vec![batch(3, 2, 1), batch(2, 3, 1)]);
        assert!(matches!(res, Err(EcoErr::SizeMismatch { what: "split inputs", .. })));
    }

    #[test]
    fn empty_split_is_valid() {
        let split = Split::new(vec![]).unwrap();

        assert!(split.is_empty());
        assert_eq!(split.input_size(), None);
    }
}
