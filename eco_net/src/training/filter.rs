use super::{Position, SampleSequence, TrainSample};

/// A sequence that only emits the samples a predicate accepts.
///
/// The inner cursor keeps walking over the rejected samples, so positions and epochs stay those
/// of the underlying split. Filtering an endless sequence with a predicate that never matches
/// never returns.
#[derive(Clone)]
pub struct Filter<I, P> {
    inner: I,
    predicate: P,
}

impl<I, P> Filter<I, P> {
    pub fn new(inner: I, predicate: P) -> Self {
        Self { inner, predicate }
    }
}

impl<I, P> Iterator for Filter<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.inner.next()?;
            if (self.predicate)(&item) {
                return Some(item);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<'d, I, P> SampleSequence<'d> for Filter<I, P>
where
    I: SampleSequence<'d>,
    P: FnMut(&TrainSample<'d>) -> bool,
{
    fn position(&self) -> Position {
        self.inner.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::{Batch, Split},
        training::TrainSequence,
    };

    fn split() -> Split {
        let batches = (0..2)
            .map(|b| {
                Batch::from_rows(
                    vec![vec![b as f32 * 2.], vec![b as f32 * 2. + 1.]],
                    vec![vec![1., 0.], vec![0., 1.]],
                )
                .unwrap()
            })
            .collect();

        Split::new(batches).unwrap()
    }

    #[test]
    fn keeps_matching_labels_only() {
        let split = split();
        let inputs: Vec<f32> = TrainSequence::new(&split)
            .filter_samples(|s| s.label() == Ok(1))
            .take(3)
            .map(|s| s.input[0])
            .collect();

        assert_eq!(inputs, vec![1., 3., 1.]);
    }

    #[test]
    fn keeps_underlying_bookkeeping() {
        let split = split();
        let mut seq = TrainSequence::new(&split).filter_samples(|s| s.label() == Ok(0));

        let first = seq.next().unwrap();
        let second = seq.next().unwrap();

        assert_eq!((first.batch, first.sample, first.current), (0, 0, 0));
        assert_eq!((second.batch, second.sample, second.current), (1, 0, 2));
        assert_eq!(seq.position().sample, 1);
    }

    #[test]
    fn composes_with_limit() {
        let split = split();
        let mut seq = TrainSequence::new(&split)
            .filter_samples(|s| s.label() == Ok(1))
            .limit(2);

        assert_eq!(seq.by_ref().count(), 2);
        assert_eq!(seq.position().epoch, 1);
    }
}
