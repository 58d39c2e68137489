use super::{Dataset, Split};

/// A dataset whose splits are fully held in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDataset {
    train: Split,
    test: Split,
}

impl InMemoryDataset {
    pub fn new(train: Split, test: Split) -> Self {
        Self { train, test }
    }
}

impl Dataset for InMemoryDataset {
    fn train(&self) -> &Split {
        &self.train
    }

    fn test(&self) -> &Split {
        &self.test
    }
}
