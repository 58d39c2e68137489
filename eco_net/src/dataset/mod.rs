mod batch;
mod in_memory;
pub mod mnist;
mod noise;
mod split;
mod stratified;

pub use batch::Batch;
pub use in_memory::InMemoryDataset;
pub use noise::{NoiseDataset, RandomFn, ValueGen};
pub use split::Split;
pub use stratified::StratifiedDataset;

/// A provider of train and test batches.
///
/// Rows within a batch are parallel: the `i`-th label row is the one-hot class of the `i`-th
/// input row.
pub trait Dataset {
    /// Returns the training split.
    fn train(&self) -> &Split;

    /// Returns the test split.
    fn test(&self) -> &Split;

    fn train_batch_count(&self) -> usize {
        self.train().batch_count()
    }

    fn test_batch_count(&self) -> usize {
        self.test().batch_count()
    }

    /// # Panics
    /// If `index` is out of bounds.
    fn train_batch(&self, index: usize) -> &Batch {
        self.train().batch(index)
    }

    /// # Panics
    /// If `index` is out of bounds.
    fn test_batch(&self, index: usize) -> &Batch {
        self.test().batch(index)
    }
}
