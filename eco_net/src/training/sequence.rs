use log::info;

use super::{SampleSequence, TrainSample};
use crate::dataset::Split;

/// Where a training cursor stands inside a split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub epoch: usize,
    pub batch: usize,
    pub sample: usize,
}

/// An endless walk over the samples of a split, wrapping around at the end of every epoch.
///
/// Batches are looked up by index into the split on demand, so cloning a sequence forks an
/// independent cursor over the same data.
pub struct TrainSequence<'d> {
    split: &'d Split,
    position: Position,
    current: usize,
    on_epoch: Option<Box<dyn FnMut(usize) + 'd>>,
}

impl<'d> TrainSequence<'d> {
    /// Creates a new `TrainSequence` starting at the first sample of `split`.
    pub fn new(split: &'d Split) -> Self {
        Self {
            split,
            position: Position::default(),
            current: 0,
            on_epoch: None,
        }
    }

    /// Registers a callback run with the new epoch index every time an epoch ends.
    pub fn with_epoch_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(usize) + 'd,
    {
        self.on_epoch = Some(Box::new(observer));
        self
    }

    pub fn batch_count(&self) -> usize {
        self.split.batch_count()
    }

    /// Amount of samples in the batch the cursor is currently on.
    pub fn samples_in_batch(&self) -> usize {
        self.split
            .get(self.position.batch)
            .map(|batch| batch.len())
            .unwrap_or_default()
    }

    /// Amount of samples emitted so far.
    pub fn current(&self) -> usize {
        self.current
    }

    fn advance(&mut self, samples_in_batch: usize) {
        self.current += 1;
        self.position.sample += 1;

        if self.position.sample < samples_in_batch {
            return;
        }

        self.position.sample = 0;
        self.position.batch += 1;

        if self.position.batch < self.split.batch_count() {
            return;
        }

        self.position.batch = 0;
        self.position.epoch += 1;

        info!(epoch = self.position.epoch, samples = self.current; "epoch finished");
        if let Some(on_epoch) = &mut self.on_epoch {
            on_epoch(self.position.epoch);
        }
    }
}

/// Forks the cursor, the epoch observer stays with the original sequence.
impl Clone for TrainSequence<'_> {
    fn clone(&self) -> Self {
        Self {
            split: self.split,
            position: self.position,
            current: self.current,
            on_epoch: None,
        }
    }
}

impl<'d> Iterator for TrainSequence<'d> {
    type Item = TrainSample<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        let split: &'d Split = self.split;
        let batch = split.get(self.position.batch)?;

        let Position {
            epoch,
            batch: batch_index,
            sample,
        } = self.position;

        let item = TrainSample {
            epoch,
            batch: batch_index,
            sample,
            current: self.current,
            input: batch.input(sample),
            target: batch.label(sample),
        };

        self.advance(batch.len());
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.split.is_empty() {
            (0, Some(0))
        } else {
            (usize::MAX, None)
        }
    }
}

impl<'d> SampleSequence<'d> for TrainSequence<'d> {
    fn position(&self) -> Position {
        self.position
    }
}
