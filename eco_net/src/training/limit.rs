use super::{Position, SampleSequence};

/// A sequence truncated after a fixed amount of samples.
#[derive(Clone)]
pub struct Limit<I> {
    inner: I,
    taken: usize,
    count: usize,
}

impl<I> Limit<I> {
    pub fn new(inner: I, count: usize) -> Self {
        Self {
            inner,
            taken: 0,
            count,
        }
    }

    /// The fraction of the allowed samples already emitted, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.count == 0 {
            return 1.;
        }

        self.taken as f32 / self.count as f32
    }
}

impl<I: Iterator> Iterator for Limit<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.taken >= self.count {
            return None;
        }

        let item = self.inner.next()?;
        self.taken += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.taken;
        let (lower, upper) = self.inner.size_hint();

        (lower.min(left), Some(upper.map_or(left, |u| u.min(left))))
    }
}

impl<'d, I: SampleSequence<'d>> SampleSequence<'d> for Limit<I> {
    fn position(&self) -> Position {
        self.inner.position()
    }
}
