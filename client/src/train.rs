use std::fs::File;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};

use nndl::linear_algebra::{Matrix, Value};
use nndl::{
    accuracy, GradientCheck, ModelError, NetTrainConfig, Parameter, SoftmaxClassifier,
    SoftmaxTrainConfig, TwoLayerNet,
};

use crate::args::{DataConfig, NetConfig, RunConfig, SoftmaxConfig};
use crate::dataset::{Blobs, Dataset};

/// Finite difference step for gradient checks.
const GRAD_CHECK_STEP: Value = 1e-5;

#[derive(Serialize)]
struct SoftmaxHistory<'a> {
    loss_history: &'a [Value],
}

pub fn run_softmax(config: SoftmaxConfig) -> Result<(), ()> {
    let train_config: SoftmaxTrainConfig = load_config(&config.run)?;
    let mut rng = seeded_rng(&config.data);

    let blobs = build_blobs(&config.data, &mut rng)?;
    let data = blobs.sample(config.data.samples, &mut rng);

    let mut classifier = SoftmaxClassifier::new(
        config.data.classes as usize,
        config.data.features as usize,
        &mut rng,
    );

    if config.run.grad_check > 0 {
        let result = classifier
            .fast_loss_and_grad(&data.inputs, &data.labels)
            .and_then(|(loss, gradient)| {
                info!(loss, expected = (config.data.classes as nndl::linear_algebra::Value).ln(), "Initial loss:");
                classifier.grad_check_sparse(
                    &data.inputs,
                    &data.labels,
                    &gradient,
                    config.run.grad_check,
                    GRAD_CHECK_STEP,
                    &mut rng,
                )
            });

        match result {
            Ok(checks) => report_checks("weights", &checks),
            Err(err) => {
                error!(error = %err, "Gradient check failed.");
                return Err(());
            }
        }
    }

    let loss_history = classifier
        .train(&data.inputs, &data.labels, &train_config, &mut rng)
        .map_err(|err| error!(error = %err, "Training failed."))?;

    if let Some(loss) = loss_history.last() {
        info!(loss, "Final loss:");
    }
    report_accuracy("Training", &data, |inputs| classifier.predict(inputs))?;

    if let Some(filename) = &config.run.history {
        save_history(
            filename,
            &SoftmaxHistory {
                loss_history: &loss_history,
            },
        )?;
    }

    Ok(())
}

pub fn run_net(config: NetConfig) -> Result<(), ()> {
    let train_config: NetTrainConfig = load_config(&config.run)?;
    let mut rng = seeded_rng(&config.data);

    let blobs = build_blobs(&config.data, &mut rng)?;
    let data = blobs.sample(config.data.samples, &mut rng);
    let val_data = blobs.sample(config.val_samples, &mut rng);

    let mut net = TwoLayerNet::new(
        config.data.features as usize,
        config.hidden,
        config.data.classes as usize,
        config.std,
        &mut rng,
    );

    if config.run.grad_check > 0 {
        let (loss, gradients) = net
            .loss(&data.inputs, &data.labels, train_config.reg)
            .map_err(|err| error!(error = %err, "Gradient check failed."))?;
        info!(loss, "Initial loss:");

        for parameter in Parameter::ALL {
            let checks = net
                .grad_check_sparse(
                    parameter,
                    &data.inputs,
                    &data.labels,
                    train_config.reg,
                    &gradients,
                    config.run.grad_check,
                    GRAD_CHECK_STEP,
                    &mut rng,
                )
                .map_err(|err| error!(error = %err, "Gradient check failed."))?;

            report_checks(&format!("{parameter:?}"), &checks);
        }
    }

    let history = net
        .train(
            &data.inputs,
            &data.labels,
            &val_data.inputs,
            &val_data.labels,
            &train_config,
            &mut rng,
        )
        .map_err(|err| error!(error = %err, "Training failed."))?;

    if let Some(loss) = history.loss_history.last() {
        info!(loss, "Final loss:");
    }
    report_accuracy("Training", &data, |inputs| net.predict(inputs))?;
    report_accuracy("Validation", &val_data, |inputs| net.predict(inputs))?;

    if let Some(filename) = &config.run.history {
        save_history(filename, &history)?;
    }

    Ok(())
}

fn seeded_rng(config: &DataConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn build_blobs(config: &DataConfig, rng: &mut StdRng) -> Result<Blobs, ()> {
    Blobs::new(
        config.features as usize,
        config.classes as usize,
        config.spread,
        rng,
    )
    .map_err(|err| error!(error = %err, "Could not build the dataset."))
}

fn load_config<T: DeserializeOwned + Default>(config: &RunConfig) -> Result<T, ()> {
    let Some(filename) = &config.config else {
        return Ok(T::default());
    };

    let file = File::open(filename)
        .map_err(|err| error!(error = %err, %filename, "Could not open config file."))?;

    serde_json::from_reader(file)
        .map_err(|err| error!(error = %err, %filename, "Could not parse config file."))
}

fn save_history(filename: &str, history: &impl Serialize) -> Result<(), ()> {
    let file = File::create(filename)
        .map_err(|err| error!(error = %err, filename, "Could not create history file."))?;

    serde_json::to_writer_pretty(file, history)
        .map_err(|err| error!(error = %err, filename, "Could not write history file."))?;

    info!(filename, "Saved training history.");
    Ok(())
}

fn report_checks(parameter: &str, checks: &[GradientCheck]) {
    let worst = checks
        .iter()
        .map(|check| check.relative_error)
        .fold(0.0, Value::max);

    info!(
        parameter,
        checks = checks.len(),
        worst_relative_error = %format!("{worst:.3e}"),
        "Gradient check:"
    );
}

fn report_accuracy(
    name: &str,
    data: &Dataset,
    predict: impl Fn(&Matrix) -> Result<Vec<usize>, ModelError>,
) -> Result<(), ()> {
    let fraction = predict(&data.inputs)
        .and_then(|predictions| accuracy(&predictions, &data.labels))
        .map_err(|err| error!(error = %err, "Prediction failed."))?;

    info!("{name} accuracy: {fraction:.4}");
    Ok(())
}
