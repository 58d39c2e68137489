use anyhow::{Context, Result};
use eco_net::dataset::{mnist, Dataset, StratifiedDataset};
use log::info;

use eco_mnist::{
    config::{ExperimentBuilder, ExperimentConfig},
    experiment::Experiment,
};

fn main() -> Result<()> {
    env_logger::init();

    let config = ExperimentConfig::load()?;
    let builder = ExperimentBuilder::new(config.seed);

    let dataset = mnist::load(&config.dataset.dir, config.dataset.batch_size)
        .context("cannot start without the MNIST dataset")?;

    if config.dataset.stratified {
        let dataset = StratifiedDataset::new(&dataset)?;
        run(&config, &builder, &dataset)
    } else {
        run(&config, &builder, &dataset)
    }
}

fn run<D: Dataset>(
    config: &ExperimentConfig,
    builder: &ExperimentBuilder,
    dataset: &D,
) -> Result<()> {
    let network = builder.network(&config.network)?;

    info!(
        rate = config.training.rate,
        rate_decay = config.training.rate_decay;
        "starting experiment"
    );

    let noise = config
        .noise
        .as_ref()
        .map(|spec| {
            builder
                .noise(spec, &config.network, dataset.train_batch_count())
                .map(|noise| (noise, spec.coefficient))
        })
        .transpose()?;

    let mut experiment = Experiment::new(
        network,
        dataset,
        config.training.clone(),
        config.evaluation.clone(),
    );

    if let Some((noise, coefficient)) = &noise {
        experiment = experiment.with_noise(noise, *coefficient);
    }

    let report = experiment.run();

    println!("{}", experiment.network());
    println!("Trained samples: {}", report.trained_samples);
    println!("Train performance: {}", report.train_performance);
    println!("Test performance: {}", report.test.total_performance);
    println!("Test performance (indexed): {:?}", report.test.indexed_performance);

    Ok(())
}
