use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, trace};

use crate::batch::{check_batch_size, sample_batch, Sampling};
use crate::error::ModelError;
use crate::grad_check::{self, GradientCheck};
use crate::gradient_descent::{GradientDescent, SimpleGradientDescent};
use crate::linear_algebra::{Matrix, Value};
use crate::loss::{check_labels, cross_entropy, softmax_cross_entropy};

/// Scale applied to standard normal samples when initializing the weights.
pub const WEIGHT_SCALE: Value = 1e-4;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SoftmaxTrainConfig {
    pub learning_rate: Value,
    pub num_iters: usize,
    pub batch_size: usize,
    pub sampling: Sampling,
    /// Log the loss every 100 iterations.
    pub verbose: bool,
}

impl Default for SoftmaxTrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            num_iters: 100,
            batch_size: 200,
            sampling: Sampling::WithReplacement,
            verbose: false,
        }
    }
}

impl SoftmaxTrainConfig {
    fn validate(&self, num_train: usize) -> Result<(), ModelError> {
        if !self.learning_rate.is_finite() {
            return Err(ModelError::InvalidConfig("learning rate must be finite"));
        }
        check_batch_size(num_train, self.batch_size, self.sampling)
    }
}

/// A linear classifier scoring each class as `W · x` and trained on the cross-entropy of
/// the softmax of those scores.
#[derive(Clone, Debug)]
pub struct SoftmaxClassifier {
    /// (classes × features)
    weights: Matrix,
}

impl SoftmaxClassifier {
    pub fn new(num_classes: usize, num_features: usize, rng: &mut impl Rng) -> Self {
        let mut classifier = Self::with_weights(Matrix::zeros(0, 0));
        classifier.init_weights(num_classes, num_features, rng);
        classifier
    }

    pub fn with_weights(weights: Matrix) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn num_classes(&self) -> usize {
        self.weights.rows()
    }

    pub fn num_features(&self) -> usize {
        self.weights.columns()
    }

    /// Replaces the weights with fresh standard normal values scaled by [`WEIGHT_SCALE`].
    pub fn init_weights(&mut self, num_classes: usize, num_features: usize, rng: &mut impl Rng) {
        let mut weights = Matrix::zeros(num_classes, num_features);
        weights
            .values_mut()
            .for_each(|x| *x = rng.sample::<Value, _>(StandardNormal) * WEIGHT_SCALE);
        self.weights = weights;
    }

    fn check_inputs(&self, inputs: &Matrix) -> Result<(), ModelError> {
        if inputs.columns() != self.num_features() {
            return Err(ModelError::ShapeMismatch(
                "inputs must have one column per weight feature",
            ));
        }
        Ok(())
    }

    fn check_batch(&self, inputs: &Matrix, labels: &[usize]) -> Result<(), ModelError> {
        self.check_inputs(inputs)?;
        if inputs.rows() == 0 {
            return Err(ModelError::EmptyBatch);
        }
        check_labels(labels, inputs.rows(), self.num_classes())
    }

    /// Class scores `X · Wᵗ`, one row per example.
    pub fn scores(&self, inputs: &Matrix) -> Result<Matrix, ModelError> {
        self.check_inputs(inputs)?;
        Ok(inputs.matmul_transposed(&self.weights))
    }

    /// The mean softmax cross-entropy of the batch.
    pub fn loss(&self, inputs: &Matrix, labels: &[usize]) -> Result<Value, ModelError> {
        self.check_batch(inputs, labels)?;
        cross_entropy(&inputs.matmul_transposed(&self.weights), labels)
    }

    /// The loss and its gradient with respect to the weights, one example at a time.
    pub fn loss_and_grad(
        &self,
        inputs: &Matrix,
        labels: &[usize],
    ) -> Result<(Value, Matrix), ModelError> {
        self.check_batch(inputs, labels)?;

        let mut loss = 0.0;
        let mut gradient = Matrix::zeros(self.num_classes(), self.num_features());
        let mut scores = vec![0.0; self.num_classes()];

        for (x, &label) in inputs.iter().zip(labels) {
            for (class, score) in scores.iter_mut().enumerate() {
                *score = self
                    .weights
                    .row(class)
                    .iter()
                    .zip(x)
                    .map(|(w, x)| w * x)
                    .sum();
            }

            let max = scores.iter().copied().fold(Value::NEG_INFINITY, Value::max);
            let sum_exp = scores.iter().map(|s| (s - max).exp()).sum::<Value>();
            loss += max + sum_exp.ln() - scores[label];

            for (class, score) in scores.iter().enumerate() {
                let mut coefficient = (score - max).exp() / sum_exp;
                if class == label {
                    coefficient -= 1.0;
                }
                gradient
                    .row_mut(class)
                    .iter_mut()
                    .zip(x)
                    .for_each(|(g, x)| *g += coefficient * x);
            }
        }

        let count = inputs.rows() as Value;
        gradient /= count;

        Ok((loss / count, gradient))
    }

    /// Same as [`loss_and_grad`](Self::loss_and_grad), using whole-batch matrix operations.
    pub fn fast_loss_and_grad(
        &self,
        inputs: &Matrix,
        labels: &[usize],
    ) -> Result<(Value, Matrix), ModelError> {
        self.check_batch(inputs, labels)?;

        let scores = inputs.matmul_transposed(&self.weights);
        let (loss, score_gradients) = softmax_cross_entropy(&scores, labels)?;

        Ok((loss, score_gradients.transposed_matmul(inputs)))
    }

    /// Compares `analytic` against central differences of [`loss`](Self::loss) at
    /// `num_checks` randomly chosen weights. The weights are left unchanged.
    pub fn grad_check_sparse(
        &mut self,
        inputs: &Matrix,
        labels: &[usize],
        analytic: &Matrix,
        num_checks: usize,
        h: Value,
        rng: &mut impl Rng,
    ) -> Result<Vec<GradientCheck>, ModelError> {
        if analytic.shape() != self.weights.shape() {
            return Err(ModelError::ShapeMismatch(
                "the analytic gradient must match the weights",
            ));
        }

        grad_check::grad_check_sparse(
            self,
            |classifier| classifier.weights.as_mut_slice(),
            |classifier| classifier.loss(inputs, labels),
            analytic.as_slice(),
            num_checks,
            h,
            rng,
        )
    }

    /// Trains with minibatch gradient descent and returns the loss of every iteration.
    ///
    /// The weights are re-initialized to fit the number of features in `inputs` and the
    /// number of classes implied by the largest label.
    pub fn train(
        &mut self,
        inputs: &Matrix,
        labels: &[usize],
        config: &SoftmaxTrainConfig,
        rng: &mut impl Rng,
    ) -> Result<Vec<Value>, ModelError> {
        self.train_with(inputs, labels, config, &mut SimpleGradientDescent, rng)
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(num_iters = config.num_iters, batch_size = config.batch_size)
    )]
    pub fn train_with(
        &mut self,
        inputs: &Matrix,
        labels: &[usize],
        config: &SoftmaxTrainConfig,
        gradient_descent: &mut impl GradientDescent,
        rng: &mut impl Rng,
    ) -> Result<Vec<Value>, ModelError> {
        if labels.len() != inputs.rows() {
            return Err(ModelError::ShapeMismatch(
                "expected exactly one label per example",
            ));
        }
        let num_classes = labels
            .iter()
            .max()
            .map(|&label| label + 1)
            .ok_or(ModelError::EmptyBatch)?;
        config.validate(inputs.rows())?;

        self.init_weights(num_classes, inputs.columns(), rng);

        let mut loss_history = Vec::with_capacity(config.num_iters);

        for iteration in 0..config.num_iters {
            let (batch_inputs, batch_labels) =
                sample_batch(rng, inputs, labels, config.batch_size, config.sampling)?;

            let (loss, gradient) = self.fast_loss_and_grad(&batch_inputs, &batch_labels)?;
            loss_history.push(loss);

            gradient_descent.descend(
                iteration + 1,
                gradient.as_slice(),
                self.weights.as_mut_slice(),
                config.learning_rate,
            );

            trace!(iteration, loss);
            if config.verbose && iteration % 100 == 0 {
                info!("Iteration {iteration} / {}: loss {loss}", config.num_iters);
            }
        }

        Ok(loss_history)
    }

    /// The highest scoring class of each example.
    pub fn predict(&self, inputs: &Matrix) -> Result<Vec<usize>, ModelError> {
        Ok(self.scores(inputs)?.argmax_rows())
    }
}
