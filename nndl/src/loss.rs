use crate::error::ModelError;
use crate::linear_algebra::{Matrix, Value};

/// Checks that there is one label per example and that every label names a class.
pub fn check_labels(labels: &[usize], rows: usize, classes: usize) -> Result<(), ModelError> {
    if labels.len() != rows {
        return Err(ModelError::ShapeMismatch(
            "expected exactly one label per example",
        ));
    }

    match labels
        .iter()
        .enumerate()
        .find(|&(_, &label)| label >= classes)
    {
        Some((index, &label)) => Err(ModelError::InvalidLabel {
            index,
            label,
            classes,
        }),
        None => Ok(()),
    }
}

fn row_max(row: &[Value]) -> Value {
    row.iter().copied().fold(Value::NEG_INFINITY, Value::max)
}

/// Row-wise softmax probabilities. Each row is shifted by its maximum first.
pub fn softmax(scores: &Matrix) -> Matrix {
    let mut probabilities = scores.clone();
    for row in probabilities.iter_mut() {
        let max = row_max(row);
        row.iter_mut().for_each(|x| *x = (*x - max).exp());
        let sum = row.iter().sum::<Value>();
        row.iter_mut().for_each(|x| *x /= sum);
    }
    probabilities
}

/// Calculates the mean cross-entropy of raw scores against integer labels:
/// `-s[y] + log(Σ exp(s))` per example.
pub fn cross_entropy(scores: &Matrix, labels: &[usize]) -> Result<Value, ModelError> {
    if scores.rows() == 0 {
        return Err(ModelError::EmptyBatch);
    }
    check_labels(labels, scores.rows(), scores.columns())?;

    let total = scores
        .iter()
        .zip(labels)
        .map(|(row, &label)| {
            let max = row_max(row);
            let log_sum_exp = max + row.iter().map(|x| (x - max).exp()).sum::<Value>().ln();
            log_sum_exp - row[label]
        })
        .sum::<Value>();

    Ok(total / scores.rows() as Value)
}

/// Calculates the derivative of the mean cross-entropy with respect to the scores,
/// `(P - Y) / N` where `Y` one-hot encodes the labels.
pub fn cross_entropy_prime(scores: &Matrix, labels: &[usize]) -> Result<Matrix, ModelError> {
    softmax_cross_entropy(scores, labels).map(|(_, gradients)| gradients)
}

/// The loss and its score gradients together, sharing the softmax.
pub fn softmax_cross_entropy(
    scores: &Matrix,
    labels: &[usize],
) -> Result<(Value, Matrix), ModelError> {
    if scores.rows() == 0 {
        return Err(ModelError::EmptyBatch);
    }
    check_labels(labels, scores.rows(), scores.columns())?;

    let count = scores.rows() as Value;
    let mut gradients = softmax(scores);

    let mut total = 0.0;
    for (row, &label) in gradients.iter_mut().zip(labels) {
        total -= row[label].ln();
        row[label] -= 1.0;
    }
    gradients /= count;

    // A vanishing probability would make the log above infinite, so take the loss
    // from the shifted log-sum-exp instead.
    let loss = if total.is_finite() {
        total / count
    } else {
        cross_entropy(scores, labels)?
    };

    Ok((loss, gradients))
}
