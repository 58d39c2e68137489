//! Accuracy of a network over the test split of a dataset.

use std::ops::Range;

use log::debug;

use crate::{arch::Network, dataset::Split, one_hot::argmax};

/// Accuracy of a network over a range of batches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TestResult {
    /// Fraction of samples classified right.
    pub total_performance: f32,
    /// Fraction of samples classified right among those of each class.
    pub indexed_performance: Vec<f32>,
}

/// Accuracy of a sequence of predictions against the expected classes.
///
/// # Arguments
/// * `predicted` - The class picked for every sample.
/// * `expected` - The true class of every sample.
/// * `classes` - The amount of classes.
///
/// # Returns
/// The overall accuracy and the accuracy restricted to the samples of every class, `None` for
/// the classes without samples.
pub fn performance(
    predicted: &[usize],
    expected: &[usize],
    classes: usize,
) -> (f32, Vec<Option<f32>>) {
    let mut hits = vec![0usize; classes];
    let mut totals = vec![0usize; classes];

    for (&p, &e) in predicted.iter().zip(expected) {
        if e < classes {
            totals[e] += 1;
            if p == e {
                hits[e] += 1;
            }
        }
    }

    let count = predicted.len().min(expected.len());
    let matches = predicted.iter().zip(expected).filter(|(p, e)| p == e).count();
    let total = if count == 0 { 0. } else { matches as f32 / count as f32 };

    let indexed = hits
        .into_iter()
        .zip(totals)
        .map(|(h, t)| (t > 0).then(|| h as f32 / t as f32))
        .collect();

    (total, indexed)
}

/// Runs `network` over the batches of `split` within `batches` and averages its accuracy.
///
/// Every batch weighs the same. The accuracy of a class is averaged over the batches holding at
/// least one sample of it, and is `0.0` if none does.
///
/// # Arguments
/// * `network` - The network to evaluate.
/// * `split` - Where the batches come from, usually the test split.
/// * `batches` - The indices of the batches to evaluate, clamped to the split.
pub fn evaluate(network: &Network, split: &Split, batches: Range<usize>) -> TestResult {
    let classes = network.output_size();
    let batches = batches.start.min(split.batch_count())..batches.end.min(split.batch_count());

    if batches.is_empty() {
        return TestResult {
            total_performance: 0.,
            indexed_performance: vec![0.; classes],
        };
    }

    let mut total = 0.;
    let mut class_sums = vec![0.; classes];
    let mut class_batches = vec![0usize; classes];

    for index in batches.clone() {
        let batch = split.batch(index);

        let (predicted, expected): (Vec<usize>, Vec<usize>) = batch
            .samples()
            .map(|(input, label)| {
                let output = network.process(input);
                (
                    argmax(&output).unwrap_or_default(),
                    argmax(&label).unwrap_or_default(),
                )
            })
            .unzip();

        let (batch_total, batch_indexed) = performance(&predicted, &expected, classes);
        total += batch_total;

        for (c, perf) in batch_indexed.into_iter().enumerate() {
            if let Some(perf) = perf {
                class_sums[c] += perf;
                class_batches[c] += 1;
            }
        }
    }

    let batch_count = batches.len() as f32;
    let result = TestResult {
        total_performance: total / batch_count,
        indexed_performance: class_sums
            .into_iter()
            .zip(class_batches)
            .map(|(sum, n)| if n == 0 { 0. } else { sum / n as f32 })
            .collect(),
    };

    debug!(
        batches = batch_count,
        total = result.total_performance;
        "evaluated network"
    );

    result
}

/// Fraction of the first `count` samples of `split` that `network` classifies right.
pub fn sample_performance(network: &Network, split: &Split, count: usize) -> f32 {
    let samples = split
        .iter()
        .flat_map(|batch| batch.samples())
        .take(count);

    let (mut hits, mut seen) = (0usize, 0usize);
    for (input, label) in samples {
        seen += 1;
        if argmax(&network.process(input)) == argmax(&label) {
            hits += 1;
        }
    }

    if seen == 0 { 0. } else { hits as f32 / seen as f32 }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2};

    use super::*;
    use crate::{
        arch::{
            NetworkConfig,
            layers::{Hidden, Layer, Output},
        },
        dataset::Batch,
        one_hot::one_hot_encode,
        weight_gen::ConstWeightGen,
    };

    fn network(weights: Vec<f32>) -> Network {
        let weights = Array2::from_shape_vec((2, 2), weights).unwrap();
        let hidden = Hidden::from_parts(weights, Array1::zeros(2)).unwrap();

        Network::with_layers(
            [
                Layer::input(2),
                Layer::Hidden(hidden),
                Layer::Output(Output::new(2, 2).unwrap()),
            ],
            0.1,
            0.1,
        )
        .unwrap()
    }

    /// Answers class `1` for class `0` inputs and the other way around.
    fn swapping_network() -> Network {
        network(vec![0., 1., 1., 0.])
    }

    fn batch(classes: &[usize]) -> Batch {
        let rows: Vec<Vec<f32>> = classes.iter().map(|&c| one_hot_encode(c, 2).to_vec()).collect();
        Batch::from_rows(rows.clone(), rows).unwrap()
    }

    #[test]
    fn perfect_predictions() {
        let (total, indexed) = performance(&[0, 1, 2], &[0, 1, 2], 3);

        assert_eq!(total, 1.);
        assert_eq!(indexed, vec![Some(1.), Some(1.), Some(1.)]);
    }

    #[test]
    fn per_class_follows_the_true_label() {
        let (total, indexed) = performance(&[1, 1, 2], &[0, 1, 2], 3);

        assert_eq!(total, 2. / 3.);
        assert_eq!(indexed[0], Some(0.));
        assert_eq!(indexed[1], Some(1.));
        assert_eq!(indexed[2], Some(1.));
    }

    #[test]
    fn absent_classes_have_no_performance() {
        let (_, indexed) = performance(&[0, 0], &[0, 0], 2);
        assert_eq!(indexed, vec![Some(1.), None]);
    }

    #[test]
    fn evaluates_a_range_of_batches() {
        let net = swapping_network();
        let split = Split::new(vec![batch(&[0, 1]), batch(&[0, 0])]).unwrap();

        // every answer is swapped
        let result = evaluate(&net, &split, 0..2);
        assert_eq!(result.total_performance, 0.);
        assert_eq!(result.indexed_performance, vec![0., 0.]);
    }

    #[test]
    fn averages_classes_over_the_batches_holding_them() {
        // class 0 is always right, class 1 always falls back to 0
        let net = network(vec![1., 0., 0., 0.]);
        let split = Split::new(vec![batch(&[0, 1]), batch(&[0, 0])]).unwrap();

        let result = evaluate(&net, &split, 0..2);
        assert_eq!(result.total_performance, 0.75);
        assert_eq!(result.indexed_performance, vec![1., 0.]);
    }

    #[test]
    fn empty_range_does_not_divide_by_zero() {
        let config = NetworkConfig::new(2, 2, vec![2], ConstWeightGen::new(0.5), 0.1, 0.1);
        let net = Network::new(config).unwrap();
        let split = Split::new(vec![batch(&[0])]).unwrap();

        let result = evaluate(&net, &split, 0..0);
        assert_eq!(result.total_performance, 0.);
        assert_eq!(result.indexed_performance, vec![0., 0.]);

        let result = evaluate(&net, &split, 3..7);
        assert_eq!(result.total_performance, 0.);
    }

    #[test]
    fn sample_performance_counts_hits() {
        let net = swapping_network();
        let split = Split::new(vec![batch(&[0, 1])]).unwrap();

        assert_eq!(sample_performance(&net, &split, 10), 0.);
        assert_eq!(sample_performance(&net, &Split::default(), 10), 0.);
    }
}
