//! The training loop of an experiment: feeding samples, unlearning noise and evaluating.

use std::ops::Range;

use eco_net::{
    arch::Network,
    dataset::{Dataset, NoiseDataset, Split},
    evaluation::{evaluate, sample_performance, TestResult},
    one_hot::{argmax, one_hot_decode},
    training::{SampleSequence, TrainSample, TrainSequence},
};
use log::{debug, info, warn};
use ndarray::Array1;

use crate::config::{EvaluationSpec, MethodSpec, TrainingSpec, UnlearningSpec};

/// The performance of the network once the experiment is over.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub trained_samples: usize,
    pub train_performance: f32,
    pub test: TestResult,
}

/// Trains `network` on `sample` `repeats` times.
///
/// # Returns
/// An error if the sample's target isn't a one-hot vector.
pub fn learn_sample(
    network: &mut Network,
    sample: &TrainSample,
    rate: f32,
    repeats: usize,
) -> eco_net::Result<()> {
    let target = sample.label()?;

    for _ in 0..repeats {
        let before = argmax(&sample.process(network));
        sample.train(network, rate);
        let after = argmax(&sample.process(network));

        debug!(label = target, before = before, after = after; "learnt sample {}", sample.current);
    }

    Ok(())
}

/// Trains `network` on `sample` `repeats` times, first unlearning every wrong class the network
/// is confident about.
///
/// # Arguments
/// * `network` - The network to train.
/// * `sample` - The sample to learn.
/// * `rate` - Factor applied to the network's learning rates.
/// * `repeats` - Amount of passes over the sample.
/// * `spec` - The cutoffs and rate of the unlearning pass.
///
/// # Returns
/// An error if the sample's target isn't a one-hot vector.
pub fn learn_sample_with_unlearning(
    network: &mut Network,
    sample: &TrainSample,
    rate: f32,
    repeats: usize,
    spec: &UnlearningSpec,
) -> eco_net::Result<()> {
    let target = sample.label()?;

    for _ in 0..repeats {
        let output = sample.process(network);
        let before = argmax(&output);

        if before != Some(target) {
            let wrong = Array1::from_shape_fn(output.len(), |i| {
                if i != target && output[i] > spec.unlearn_cutoff { 1. } else { 0. }
            });

            if wrong.sum() > 0. {
                network.train(sample.input, wrong.view(), rate * spec.unlearn_rate, true);
            }
        }

        if output[target] <= spec.learn_cutoff {
            sample.train(network, rate);
        }

        let after = argmax(&sample.process(network));
        debug!(label = target, before = before, after = after; "learnt sample {}", sample.current);
    }

    Ok(())
}

/// Whether some sample of `split` belongs to `label`.
fn contains_label(split: &Split, label: usize) -> bool {
    split
        .iter()
        .flat_map(|batch| batch.samples())
        .any(|(_, target)| one_hot_decode(&target) == Ok(label))
}

/// A network being trained on a dataset.
pub struct Experiment<'d> {
    network: Network,
    train: &'d Split,
    test: &'d Split,
    noise: Option<(TrainSequence<'d>, f32)>,
    training: TrainingSpec,
    evaluation: EvaluationSpec,
    skipper: usize,
    trained: usize,
}

impl<'d> Experiment<'d> {
    /// Creates a new `Experiment`.
    ///
    /// # Arguments
    /// * `network` - The network to train.
    /// * `dataset` - Where the training and test samples come from.
    /// * `training` - How samples are fed to the network.
    /// * `evaluation` - How often and how much the network is evaluated.
    pub fn new<D: Dataset>(
        network: Network,
        dataset: &'d D,
        training: TrainingSpec,
        evaluation: EvaluationSpec,
    ) -> Self {
        Self {
            network,
            train: dataset.train(),
            test: dataset.test(),
            noise: None,
            training,
            evaluation,
            skipper: 0,
            trained: 0,
        }
    }

    /// Unlearns a noise sample after every trained sample.
    ///
    /// # Arguments
    /// * `noise` - The noise to unlearn, walked over endlessly.
    /// * `coefficient` - Factor applied to the training rate for the unlearning passes.
    pub fn with_noise(mut self, noise: &'d NoiseDataset, coefficient: f32) -> Self {
        self.noise = Some((TrainSequence::new(noise.split()), coefficient));
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Trains the network following the configured method.
    ///
    /// # Returns
    /// The final performance of the network.
    pub fn run(&mut self) -> Report {
        match self.training.method.clone() {
            MethodSpec::Plain { skip, take } => self.run_plain(skip, take),
            MethodSpec::Sequence { labels, per_label } => self.run_sequence(&labels, per_label),
            MethodSpec::Indexed {
                target_performance,
                attempts,
                max_rounds,
            } => self.run_indexed(target_performance, attempts, max_rounds),
        }

        self.report()
    }

    /// The performance of the network on the configured final ranges.
    pub fn report(&self) -> Report {
        let test = evaluate(&self.network, self.test, 0..self.evaluation.final_batches);
        let train_performance =
            sample_performance(&self.network, self.train, self.evaluation.train_samples);

        Report {
            trained_samples: self.trained,
            train_performance,
            test,
        }
    }

    fn run_plain(&mut self, skip: usize, take: usize) {
        info!(skip = skip, take = take; "using plain method");

        let mut rate = self.training.rate;
        for sample in TrainSequence::new(self.train).limit(skip + take).skip(skip) {
            self.step(&sample, rate);
            rate *= self.training.rate_decay;
        }
    }

    fn run_sequence(&mut self, labels: &[usize], per_label: usize) {
        info!("using sequence method with sequence={labels:?}");

        for &label in labels {
            if !contains_label(self.train, label) {
                warn!(label = label; "no training samples for label, skipping");
                continue;
            }

            let mut rate = self.training.rate;
            let samples = TrainSequence::new(self.train)
                .filter_samples(move |s| s.label() == Ok(label))
                .limit(per_label);

            let mut count = 0;
            for sample in samples {
                self.step(&sample, rate);
                rate *= self.training.rate_decay;
                count += 1;
            }

            info!(label = label, count = count; "label done");
        }
    }

    fn run_indexed(&mut self, target: f32, attempts: usize, max_rounds: Option<usize>) {
        info!(target_performance = target, attempts = attempts; "using indexed method");

        let classes = self.network.output_size();
        let present: Vec<bool> = (0..classes).map(|c| contains_label(self.train, c)).collect();

        let mut sequences: Vec<_> = (0..classes)
            .map(|label| {
                TrainSequence::new(self.train).filter_samples(move |s| s.label() == Ok(label))
            })
            .collect();

        let mut counts = vec![0usize; classes];
        let mut rate = self.training.rate;
        let mut rounds = 0;

        while max_rounds.is_none_or(|max| rounds < max) {
            let performance = self.evaluate(0..self.evaluation.short_batches);
            let lagging = performance
                .indexed_performance
                .iter()
                .enumerate()
                .position(|(c, &p)| present[c] && p < target);

            let Some(label) = lagging else {
                break;
            };

            debug!(label = label; "training lagging label");
            for _ in 0..attempts {
                let Some(sample) = sequences[label].next() else {
                    break;
                };

                self.step(&sample, rate);
                rate *= self.training.rate_decay;
            }

            counts[label] += attempts;
            rounds += 1;
        }

        info!("samples per label: {counts:?}");
    }

    /// Learns a sample, unlearns the next noise sample and evaluates the network.
    fn step(&mut self, sample: &TrainSample, rate: f32) {
        let repeats = self.training.repeats;

        let learnt = match &self.training.unlearning {
            Some(spec) => {
                learn_sample_with_unlearning(&mut self.network, sample, rate, repeats, spec)
            }
            None => learn_sample(&mut self.network, sample, rate, repeats),
        };

        if let Err(e) = learnt {
            warn!("skipping sample {}: {e}", sample.current);
            return;
        }

        self.trained += 1;

        if let Some((noise, coefficient)) = &mut self.noise {
            if let Some(noise_sample) = noise.next() {
                noise_sample.unlearn(&mut self.network, rate * *coefficient);
            }
        }

        self.evaluate_periodically();
    }

    /// Evaluates the full range every `skip + 1` calls and the short range otherwise.
    fn evaluate_periodically(&mut self) -> TestResult {
        let batches = if self.skipper == 0 {
            self.skipper = self.evaluation.skip;
            0..self.evaluation.full_batches
        } else {
            self.skipper -= 1;
            0..self.evaluation.short_batches
        };

        let result = self.evaluate(batches);
        info!(
            trained = self.trained,
            total = result.total_performance;
            "indexed performance {:?}", result.indexed_performance
        );

        result
    }

    fn evaluate(&self, batches: Range<usize>) -> TestResult {
        evaluate(&self.network, self.test, batches)
    }
}

#[cfg(test)]
mod tests {
    use eco_net::{
        arch::{layers::Layer, NetworkConfig},
        dataset::{Batch, InMemoryDataset},
        one_hot::one_hot_encode,
        weight_gen::{ConstWeightGen, RandWeightGen},
    };
    use ndarray::Array2;

    use super::*;

    /// Two samples per class, each lighting one pixel of its class's block.
    fn dataset(classes: usize) -> InMemoryDataset {
        let batch = || {
            let inputs = (0..2 * classes)
                .map(|i| one_hot_encode(i, 2 * classes).to_vec())
                .collect();
            let labels = (0..2 * classes)
                .map(|i| one_hot_encode(i / 2, classes).to_vec())
                .collect();
            Batch::from_rows(inputs, labels).unwrap()
        };

        InMemoryDataset::new(
            Split::new(vec![batch(), batch()]).unwrap(),
            Split::new(vec![batch()]).unwrap(),
        )
    }

    fn network(inputs: usize, classes: usize) -> Network {
        let weight_gen = RandWeightGen::uniform(-0.5, 0.5, Some(17)).unwrap();
        let config = NetworkConfig::new(inputs, classes, vec![4 * classes], weight_gen, 0.01, 0.1);
        Network::new(config).unwrap()
    }

    fn hidden_weights(net: &Network) -> Vec<Array2<f32>> {
        net.layers()
            .iter()
            .filter_map(|layer| match layer {
                Layer::Hidden(l) => Some(l.weights().clone()),
                _ => None,
            })
            .collect()
    }

    fn evaluation() -> EvaluationSpec {
        EvaluationSpec {
            full_batches: 1,
            short_batches: 1,
            skip: 2,
            final_batches: 1,
            train_samples: 8,
        }
    }

    fn training(method: MethodSpec) -> TrainingSpec {
        TrainingSpec {
            method,
            rate: 1.,
            rate_decay: 0.99,
            repeats: 2,
            unlearning: None,
        }
    }

    #[test]
    fn plain_method_trains_the_window() {
        let dataset = dataset(2);
        let method = MethodSpec::Plain { skip: 3, take: 5 };
        let mut experiment =
            Experiment::new(network(4, 2), &dataset, training(method), evaluation());

        let report = experiment.run();

        assert_eq!(report.trained_samples, 5);
        assert_eq!(report.test.indexed_performance.len(), 2);
        assert!((0. ..=1.).contains(&report.train_performance));
    }

    #[test]
    fn sequence_method_skips_missing_labels() {
        let dataset = dataset(2);
        let method = MethodSpec::Sequence {
            labels: vec![1, 7, 0],
            per_label: 3,
        };
        let mut experiment =
            Experiment::new(network(4, 2), &dataset, training(method), evaluation());

        assert_eq!(experiment.run().trained_samples, 6);
    }

    #[test]
    fn indexed_method_stops_once_every_class_is_good_enough() {
        let dataset = dataset(2);
        let method = MethodSpec::Indexed {
            target_performance: 0.,
            attempts: 3,
            max_rounds: None,
        };
        let mut experiment =
            Experiment::new(network(4, 2), &dataset, training(method), evaluation());

        assert_eq!(experiment.run().trained_samples, 0);
    }

    #[test]
    fn indexed_method_respects_max_rounds() {
        let dataset = dataset(2);
        let method = MethodSpec::Indexed {
            target_performance: 2.,
            attempts: 3,
            max_rounds: Some(2),
        };
        let mut experiment =
            Experiment::new(network(4, 2), &dataset, training(method), evaluation());

        assert_eq!(experiment.run().trained_samples, 6);
    }

    #[test]
    fn noise_is_unlearnt_after_every_sample() {
        let dataset = dataset(2);
        let noise = NoiseDataset::uniform_to_ones(4, 2, 4, 2, Some(3)).unwrap();
        let method = MethodSpec::Plain { skip: 0, take: 2 };

        let mut with_noise =
            Experiment::new(network(4, 2), &dataset, training(method.clone()), evaluation())
                .with_noise(&noise, 0.1);
        let mut without_noise =
            Experiment::new(network(4, 2), &dataset, training(method), evaluation());

        with_noise.run();
        without_noise.run();

        assert_ne!(
            hidden_weights(with_noise.network()),
            hidden_weights(without_noise.network())
        );
    }

    #[test]
    fn unlearning_leaves_a_right_answer_alone() {
        // both classes fire and the first one wins, so the network already answers 0
        let config = NetworkConfig::new(2, 2, vec![2], ConstWeightGen::new(1.), 0.1, 0.1);
        let mut net = Network::new(config).unwrap();
        let split = Split::new(vec![
            Batch::from_rows(vec![vec![0., 1.]], vec![vec![1., 0.]]).unwrap(),
        ])
        .unwrap();

        let sample = TrainSequence::new(&split).next().unwrap();
        let spec = UnlearningSpec {
            learn_cutoff: 0.5,
            ..Default::default()
        };

        let before = hidden_weights(&net);
        learn_sample_with_unlearning(&mut net, &sample, 1., 3, &spec).unwrap();

        assert_eq!(hidden_weights(&net), before);
    }

    #[test]
    fn invalid_labels_are_reported() {
        let split = Split::new(vec![
            Batch::from_rows(vec![vec![1., 0.]], vec![vec![1., 1.]]).unwrap(),
        ])
        .unwrap();
        let sample = TrainSequence::new(&split).next().unwrap();
        let mut net = network(2, 2);

        assert!(learn_sample(&mut net, &sample, 1., 1).is_err());
    }
}
