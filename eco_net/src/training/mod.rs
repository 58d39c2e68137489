mod filter;
mod limit;
mod sample;
mod sequence;

pub use filter::Filter;
pub use limit::Limit;
pub use sample::TrainSample;
pub use sequence::{Position, TrainSequence};

/// A stream of training samples that knows where its cursor stands in the dataset.
pub trait SampleSequence<'d>: Iterator<Item = TrainSample<'d>> + Sized {
    /// The position of the next sample this sequence will emit.
    fn position(&self) -> Position;

    /// Truncates this sequence after `count` samples.
    fn limit(self, count: usize) -> Limit<Self> {
        Limit::new(self, count)
    }

    /// Skips the samples `predicate` rejects, the underlying cursor still walks over them.
    fn filter_samples<P>(self, predicate: P) -> Filter<Self, P>
    where
        P: FnMut(&TrainSample<'d>) -> bool,
    {
        Filter::new(self, predicate)
    }
}
