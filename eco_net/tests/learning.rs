use eco_net::{
    arch::{Network, NetworkConfig, layers::Layer},
    dataset::{Batch, Dataset, InMemoryDataset, NoiseDataset, Split, StratifiedDataset},
    evaluation::{TestResult, evaluate},
    one_hot::one_hot_encode,
    training::{SampleSequence, TrainSequence},
    weight_gen::{ConstWeightGen, RandWeightGen},
};
use ndarray::{Array1, Array2};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Four 4-pixel "images", one per class, lighting up a different pixel.
fn dataset() -> InMemoryDataset {
    let batch = || {
        let inputs = (0..4).map(|c| one_hot_encode(c, 4).to_vec()).collect();
        let labels = (0..4).map(|c| one_hot_encode(c, 4).to_vec()).collect();
        Batch::from_rows(inputs, labels).unwrap()
    };

    InMemoryDataset::new(
        Split::new(vec![batch(), batch()]).unwrap(),
        Split::new(vec![batch()]).unwrap(),
    )
}

fn hidden_params(net: &Network) -> Vec<(Array2<f32>, Array1<f32>)> {
    net.layers()
        .iter()
        .filter_map(|layer| match layer {
            Layer::Hidden(l) => Some((l.weights().clone(), l.biases().clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn training_changes_the_network_and_evaluation_stays_pure() {
    init_logs();

    let dataset = dataset();
    let weight_gen = RandWeightGen::uniform(-0.5, 0.5, Some(42)).unwrap();
    let config = NetworkConfig::new(4, 4, vec![16], weight_gen, 0.01, 0.1);
    let mut net = Network::new(config).unwrap();
    let initial = hidden_params(&net);

    let mut samples = TrainSequence::new(dataset.train()).limit(16);
    samples.next().unwrap().train(&mut net, 1.);
    assert_ne!(hidden_params(&net), initial);

    for sample in samples.by_ref() {
        sample.train(&mut net, 1.);
    }
    assert_eq!(samples.progress(), 1.);

    let trained = hidden_params(&net);

    let TestResult {
        total_performance,
        indexed_performance,
    } = evaluate(&net, dataset.test(), 0..dataset.test_batch_count());

    assert!((0. ..=1.).contains(&total_performance));
    assert_eq!(indexed_performance.len(), 4);
    assert_eq!(hidden_params(&net), trained);
}

#[test]
fn unlearning_mirrors_learning() {
    init_logs();

    let config = NetworkConfig::new(4, 2, vec![4], ConstWeightGen::new(0.25), 0.125, 0.25);
    let mut net = Network::new(config).unwrap();
    let before = hidden_params(&net);

    let input = Array1::from_vec(vec![1., 0., 1., 0.]);
    let target = one_hot_encode(1, 2);

    let mut inverse = net.clone();
    net.train(input.view(), target.view(), 1., false);
    inverse.train(input.view(), target.view(), 1., true);

    let learned = hidden_params(&net);
    let unlearned = hidden_params(&inverse);

    for i in 0..before.len() {
        let (bw, bb) = &before[i];
        assert_eq!(&learned[i].0 - bw, bw - &unlearned[i].0);
        assert_eq!(&learned[i].1 - bb, bb - &unlearned[i].1);
    }
}

#[test]
fn noise_passes_run_through_the_network() {
    init_logs();

    let noise = NoiseDataset::uniform_to_ones(4, 2, 8, 4, Some(5)).unwrap();
    let weight_gen = RandWeightGen::uniform(-0.5, 0.5, Some(5)).unwrap();
    let config = NetworkConfig::new(4, 2, vec![8], weight_gen, 0.01, 0.1);
    let mut net = Network::new(config).unwrap();

    let mut noise_samples = TrainSequence::new(noise.split());
    for _ in 0..noise.split().len() {
        let sample = noise_samples.next().unwrap();
        let targets = sample.unlearn(&mut net, 0.5);

        assert_eq!(targets.last().map(|t| t.len()), Some(4));
    }

    assert_eq!(noise_samples.position().epoch, 1);
}

#[test]
fn stratified_training_visits_every_class() {
    init_logs();

    let stratified = StratifiedDataset::new(&dataset()).unwrap();

    let labels: Vec<usize> = TrainSequence::new(stratified.train())
        .limit(stratified.train().len())
        .map(|s| s.label().unwrap())
        .collect();

    assert_eq!(labels, vec![0, 1, 2, 3, 0, 1, 2, 3]);
}
