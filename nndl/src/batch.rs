use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::linear_algebra::{Matrix, Value};

/// How minibatch indices are drawn from the training set.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Independent uniform indices; any positive batch size works.
    #[default]
    WithReplacement,
    /// Distinct indices; the batch can't be larger than the training set.
    WithoutReplacement,
}

/// Draws `batch_size` row indices out of `num_train`.
pub fn sample_indices(
    rng: &mut impl Rng,
    num_train: usize,
    batch_size: usize,
    sampling: Sampling,
) -> Result<Vec<usize>, ModelError> {
    check_batch_size(num_train, batch_size, sampling)?;

    Ok(match sampling {
        Sampling::WithReplacement => (0..batch_size)
            .map(|_| rng.gen_range(0..num_train))
            .collect(),
        Sampling::WithoutReplacement => index::sample(rng, num_train, batch_size).into_vec(),
    })
}

/// Checks that batches of `batch_size` can be drawn from `num_train` examples.
pub fn check_batch_size(
    num_train: usize,
    batch_size: usize,
    sampling: Sampling,
) -> Result<(), ModelError> {
    if num_train == 0 {
        return Err(ModelError::EmptyBatch);
    }
    if batch_size == 0 {
        return Err(ModelError::InvalidConfig("batch size must be positive"));
    }
    if sampling == Sampling::WithoutReplacement && batch_size > num_train {
        return Err(ModelError::InvalidConfig(
            "batch size exceeds the training set when sampling without replacement",
        ));
    }
    Ok(())
}

/// Draws a minibatch of examples and their labels.
pub fn sample_batch(
    rng: &mut impl Rng,
    inputs: &Matrix,
    labels: &[usize],
    batch_size: usize,
    sampling: Sampling,
) -> Result<(Matrix, Vec<usize>), ModelError> {
    if labels.len() != inputs.rows() {
        return Err(ModelError::ShapeMismatch(
            "expected exactly one label per example",
        ));
    }

    let indices = sample_indices(rng, inputs.rows(), batch_size, sampling)?;
    let batch_labels = indices.iter().map(|&i| labels[i]).collect();

    Ok((inputs.select_rows(&indices), batch_labels))
}

/// The fraction of predictions that match their labels, or zero when there are none.
pub fn accuracy(predictions: &[usize], labels: &[usize]) -> Result<Value, ModelError> {
    if predictions.len() != labels.len() {
        return Err(ModelError::ShapeMismatch(
            "expected exactly one label per prediction",
        ));
    }
    if labels.is_empty() {
        return Ok(0.0);
    }

    let correct = predictions
        .iter()
        .zip(labels)
        .filter(|(prediction, label)| prediction == label)
        .count();

    Ok(correct as Value / labels.len() as Value)
}
