use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use crate::activation::{relu, relu_prime};
use crate::batch::{accuracy, check_batch_size, sample_batch, Sampling};
use crate::error::ModelError;
use crate::grad_check::{self, GradientCheck};
use crate::gradient_descent::{GradientDescent, SimpleGradientDescent};
use crate::layer::{
    activation_backward, activation_forward, fully_connected_backward, fully_connected_forward,
};
use crate::linear_algebra::{Matrix, Value, Vector};
use crate::loss::{check_labels, cross_entropy, softmax_cross_entropy};

/// Default standard deviation of the initial weights.
pub const DEFAULT_STD: Value = 1e-4;

/// The weights and biases of both layers. Weights are laid out as (outputs × inputs).
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    /// (hidden × input)
    pub hidden_weights: Matrix,
    pub hidden_biases: Vector,
    /// (output × hidden)
    pub output_weights: Matrix,
    pub output_biases: Vector,
}

/// Gradients of the loss, shaped exactly like the [`Parameters`] they belong to.
pub type Gradients = Parameters;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Parameter {
    HiddenWeights,
    HiddenBiases,
    OutputWeights,
    OutputBiases,
}

impl Parameter {
    pub const ALL: [Parameter; 4] = [
        Parameter::HiddenWeights,
        Parameter::HiddenBiases,
        Parameter::OutputWeights,
        Parameter::OutputBiases,
    ];
}

impl Parameters {
    pub fn zeros(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        Self {
            hidden_weights: Matrix::zeros(hidden_size, input_size),
            hidden_biases: Vector::zeros(hidden_size),
            output_weights: Matrix::zeros(output_size, hidden_size),
            output_biases: Vector::zeros(output_size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.hidden_weights.columns()
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_weights.rows()
    }

    pub fn output_size(&self) -> usize {
        self.output_weights.rows()
    }

    /// The values of one parameter, flattened in row-major order.
    pub fn get(&self, parameter: Parameter) -> &[Value] {
        match parameter {
            Parameter::HiddenWeights => self.hidden_weights.as_slice(),
            Parameter::HiddenBiases => &self.hidden_biases[..],
            Parameter::OutputWeights => self.output_weights.as_slice(),
            Parameter::OutputBiases => &self.output_biases[..],
        }
    }

    pub fn get_mut(&mut self, parameter: Parameter) -> &mut [Value] {
        match parameter {
            Parameter::HiddenWeights => self.hidden_weights.as_mut_slice(),
            Parameter::HiddenBiases => &mut self.hidden_biases[..],
            Parameter::OutputWeights => self.output_weights.as_mut_slice(),
            Parameter::OutputBiases => &mut self.output_biases[..],
        }
    }

    fn check_shapes(&self) -> Result<(), ModelError> {
        if self.hidden_biases.len() != self.hidden_size() {
            return Err(ModelError::ShapeMismatch(
                "hidden biases must have one value per hidden unit",
            ));
        }
        if self.output_weights.columns() != self.hidden_size() {
            return Err(ModelError::ShapeMismatch(
                "output weights must have one column per hidden unit",
            ));
        }
        if self.output_biases.len() != self.output_size() {
            return Err(ModelError::ShapeMismatch(
                "output biases must have one value per class",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NetTrainConfig {
    pub learning_rate: Value,
    /// Factor applied to the learning rate after every epoch.
    pub learning_rate_decay: Value,
    /// L2 regularization strength.
    pub reg: Value,
    pub num_iters: usize,
    pub batch_size: usize,
    pub sampling: Sampling,
    /// Log the loss every 100 iterations and the accuracies every epoch.
    pub verbose: bool,
}

impl Default for NetTrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            learning_rate_decay: 0.95,
            reg: 1e-5,
            num_iters: 100,
            batch_size: 200,
            sampling: Sampling::WithReplacement,
            verbose: false,
        }
    }
}

impl NetTrainConfig {
    fn validate(&self, num_train: usize) -> Result<(), ModelError> {
        if !self.learning_rate.is_finite() {
            return Err(ModelError::InvalidConfig("learning rate must be finite"));
        }
        if !self.learning_rate_decay.is_finite() {
            return Err(ModelError::InvalidConfig(
                "learning rate decay must be finite",
            ));
        }
        if !(self.reg.is_finite() && self.reg >= 0.0) {
            return Err(ModelError::InvalidConfig(
                "regularization strength must be non-negative",
            ));
        }
        check_batch_size(num_train, self.batch_size, self.sampling)
    }
}

/// What [`TwoLayerNet::train`] observed along the way.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TrainingHistory {
    /// One entry per iteration.
    pub loss_history: Vec<Value>,
    /// Accuracy on the current minibatch, one entry per epoch.
    pub train_acc_history: Vec<Value>,
    /// Accuracy on the validation set, one entry per epoch.
    pub val_acc_history: Vec<Value>,
}

/// input → fully connected → ReLU → fully connected → softmax
#[derive(Clone, Debug)]
pub struct TwoLayerNet {
    params: Parameters,
}

struct ForwardPass {
    hidden_fully_connected: Matrix,
    hidden_activation: Matrix,
    scores: Matrix,
}

impl TwoLayerNet {
    /// Weights are drawn from a normal distribution with standard deviation `std`;
    /// biases start at zero.
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        std: Value,
        rng: &mut impl Rng,
    ) -> Self {
        let mut params = Parameters::zeros(input_size, hidden_size, output_size);

        params
            .hidden_weights
            .values_mut()
            .chain(params.output_weights.values_mut())
            .for_each(|x| *x = rng.sample::<Value, _>(StandardNormal) * std);

        Self { params }
    }

    pub fn with_parameters(params: Parameters) -> Result<Self, ModelError> {
        params.check_shapes()?;
        Ok(Self { params })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    fn check_inputs(&self, inputs: &Matrix) -> Result<(), ModelError> {
        if inputs.columns() != self.params.input_size() {
            return Err(ModelError::ShapeMismatch(
                "inputs must have one column per input unit",
            ));
        }
        Ok(())
    }

    fn propagate_forward(&self, inputs: &Matrix) -> ForwardPass {
        let hidden_fully_connected = fully_connected_forward(
            inputs,
            &self.params.hidden_weights,
            &self.params.hidden_biases,
        );

        let hidden_activation = activation_forward(&hidden_fully_connected, relu);

        let scores = fully_connected_forward(
            &hidden_activation,
            &self.params.output_weights,
            &self.params.output_biases,
        );

        ForwardPass {
            hidden_fully_connected,
            hidden_activation,
            scores,
        }
    }

    fn regularization(&self, reg: Value) -> Value {
        0.5 * reg
            * (self.params.hidden_weights.squared_norm()
                + self.params.output_weights.squared_norm())
    }

    /// Class scores for every example, without computing a loss.
    pub fn scores(&self, inputs: &Matrix) -> Result<Matrix, ModelError> {
        self.check_inputs(inputs)?;
        Ok(self.propagate_forward(inputs).scores)
    }

    /// The regularized loss alone.
    fn loss_value(&self, inputs: &Matrix, labels: &[usize], reg: Value) -> Result<Value, ModelError> {
        self.check_inputs(inputs)?;
        let scores = self.propagate_forward(inputs).scores;
        Ok(cross_entropy(&scores, labels)? + self.regularization(reg))
    }

    /// The softmax cross-entropy of the batch plus `0.5 · reg · (‖W1‖² + ‖W2‖²)`, and the
    /// gradient of that loss for every parameter.
    pub fn loss(
        &self,
        inputs: &Matrix,
        labels: &[usize],
        reg: Value,
    ) -> Result<(Value, Gradients), ModelError> {
        self.check_inputs(inputs)?;

        // Propagate forward ====================

        let ForwardPass {
            hidden_fully_connected,
            hidden_activation,
            scores,
        } = self.propagate_forward(inputs);

        let (data_loss, score_gradients) = softmax_cross_entropy(&scores, labels)?;
        let loss = data_loss + self.regularization(reg);

        // Propagate backward ===================

        let (output_weight_gradients, output_bias_gradients, hidden_activation_gradients) =
            fully_connected_backward(
                &hidden_activation,
                &score_gradients,
                &self.params.output_weights,
            );

        let hidden_fully_connected_gradients = activation_backward(
            &hidden_fully_connected,
            &hidden_activation_gradients,
            relu_prime,
        );

        let (hidden_weight_gradients, hidden_bias_gradients, _input_gradients) =
            fully_connected_backward(
                inputs,
                &hidden_fully_connected_gradients,
                &self.params.hidden_weights,
            );

        let gradients = Gradients {
            hidden_weights: hidden_weight_gradients + &self.params.hidden_weights * reg,
            hidden_biases: hidden_bias_gradients,
            output_weights: output_weight_gradients + &self.params.output_weights * reg,
            output_biases: output_bias_gradients,
        };

        Ok((loss, gradients))
    }

    /// Compares the analytic gradient of one parameter against central differences of
    /// the loss at `num_checks` random entries. The parameters are left unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn grad_check_sparse(
        &mut self,
        parameter: Parameter,
        inputs: &Matrix,
        labels: &[usize],
        reg: Value,
        analytic: &Gradients,
        num_checks: usize,
        h: Value,
        rng: &mut impl Rng,
    ) -> Result<Vec<GradientCheck>, ModelError> {
        grad_check::grad_check_sparse(
            self,
            |net| net.params.get_mut(parameter),
            |net| net.loss_value(inputs, labels, reg),
            analytic.get(parameter),
            num_checks,
            h,
            rng,
        )
    }

    /// Trains with minibatch gradient descent.
    ///
    /// Once per epoch, taken as `max(num_train / batch_size, 1)` iterations starting with
    /// the first, the accuracy on the current minibatch and on the validation set is
    /// recorded and the learning rate is decayed.
    pub fn train(
        &mut self,
        inputs: &Matrix,
        labels: &[usize],
        val_inputs: &Matrix,
        val_labels: &[usize],
        config: &NetTrainConfig,
        rng: &mut impl Rng,
    ) -> Result<TrainingHistory, ModelError> {
        self.train_with(
            inputs,
            labels,
            val_inputs,
            val_labels,
            config,
            &mut SimpleGradientDescent,
            rng,
        )
    }

    #[allow(clippy::too_many_arguments)]
    #[instrument(
        level = "debug",
        skip_all,
        fields(num_iters = config.num_iters, batch_size = config.batch_size)
    )]
    pub fn train_with(
        &mut self,
        inputs: &Matrix,
        labels: &[usize],
        val_inputs: &Matrix,
        val_labels: &[usize],
        config: &NetTrainConfig,
        gradient_descent: &mut impl GradientDescent,
        rng: &mut impl Rng,
    ) -> Result<TrainingHistory, ModelError> {
        self.check_inputs(inputs)?;
        self.check_inputs(val_inputs)?;
        check_labels(labels, inputs.rows(), self.params.output_size())?;
        check_labels(val_labels, val_inputs.rows(), self.params.output_size())?;

        let num_train = inputs.rows();
        config.validate(num_train)?;

        let iterations_per_epoch = (num_train / config.batch_size).max(1);
        let mut learning_rate = config.learning_rate;

        let mut history = TrainingHistory {
            loss_history: Vec::with_capacity(config.num_iters),
            ..Default::default()
        };

        for iteration in 0..config.num_iters {
            let (batch_inputs, batch_labels) =
                sample_batch(rng, inputs, labels, config.batch_size, config.sampling)?;

            let (loss, gradients) = self.loss(&batch_inputs, &batch_labels, config.reg)?;
            history.loss_history.push(loss);

            for parameter in Parameter::ALL {
                gradient_descent.descend(
                    iteration + 1,
                    gradients.get(parameter),
                    self.params.get_mut(parameter),
                    learning_rate,
                );
            }

            trace!(iteration, loss);
            if config.verbose && iteration % 100 == 0 {
                info!("Iteration {iteration} / {}: loss {loss}", config.num_iters);
            }

            if iteration % iterations_per_epoch == 0 {
                let train_acc = accuracy(&self.predict(&batch_inputs)?, &batch_labels)?;
                let val_acc = accuracy(&self.predict(val_inputs)?, val_labels)?;
                history.train_acc_history.push(train_acc);
                history.val_acc_history.push(val_acc);

                let epoch = iteration / iterations_per_epoch;
                if config.verbose {
                    info!(epoch, train_acc, val_acc, learning_rate, "Epoch:");
                } else {
                    debug!(epoch, train_acc, val_acc, learning_rate, "Epoch:");
                }

                learning_rate *= config.learning_rate_decay;
            }
        }

        Ok(history)
    }

    /// The highest scoring class of each example.
    pub fn predict(&self, inputs: &Matrix) -> Result<Vec<usize>, ModelError> {
        Ok(self.scores(inputs)?.argmax_rows())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    use super::*;

    fn toy_inputs() -> Matrix {
        [
            [16.24, -6.12, -5.28, -10.73],
            [8.65, -23.02, 17.45, -7.61],
            [3.19, -2.49, 14.62, -20.60],
            [-3.22, -3.84, 11.34, -10.99],
            [-1.72, -8.78, 0.42, 5.83],
        ]
        .into()
    }

    const TOY_LABELS: [usize; 5] = [0, 1, 2, 2, 1];

    fn random_matrix(rows: usize, columns: usize, scale: Value, rng: &mut impl Rng) -> Matrix {
        let mut matrix = Matrix::zeros(rows, columns);
        matrix
            .values_mut()
            .for_each(|x| *x = rng.sample::<Value, _>(StandardNormal) * scale);
        matrix
    }

    fn clusters(per_class: usize, rng: &mut impl Rng) -> (Matrix, Vec<usize>) {
        let centers = [[5.0, 0.0], [-2.5, 4.33], [-2.5, -4.33]];
        let noise = Normal::new(0.0, 0.5).unwrap();

        let mut values = Vec::new();
        let mut labels = Vec::new();
        for _ in 0..per_class {
            for (class, center) in centers.iter().enumerate() {
                values.push(center[0] + noise.sample(rng));
                values.push(center[1] + noise.sample(rng));
                labels.push(class);
            }
        }

        (Matrix::from_vec(values, labels.len(), 2), labels)
    }

    #[test]
    fn zero_weights_give_uniform_loss() {
        let net = TwoLayerNet::with_parameters(Parameters::zeros(4, 10, 3)).unwrap();

        let (loss, gradients) = net.loss(&toy_inputs(), &TOY_LABELS, 0.0).unwrap();
        assert!((loss - 3.0f64.ln()).abs() < 1e-12);

        // Only the output biases see a gradient when every weight is zero.
        assert!(gradients.hidden_weights.values().all(|&g| g == 0.0));
        assert!(gradients.output_weights.values().all(|&g| g == 0.0));
        assert!(gradients.output_biases.iter().any(|&g| g != 0.0));
    }

    #[test]
    fn gradient_shapes_match_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        let net = TwoLayerNet::new(4, 10, 3, 1e-1, &mut rng);

        let (_, gradients) = net.loss(&toy_inputs(), &TOY_LABELS, 0.05).unwrap();
        for parameter in Parameter::ALL {
            assert_eq!(
                gradients.get(parameter).len(),
                net.parameters().get(parameter).len()
            );
        }
        assert_eq!(gradients.hidden_weights.shape(), [10, 4]);
        assert_eq!(gradients.output_weights.shape(), [3, 10]);
    }

    #[test]
    fn gradient_check() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut net = TwoLayerNet::new(4, 10, 3, 0.5, &mut rng);
        let inputs = random_matrix(6, 4, 1.0, &mut rng);
        let labels = [0, 1, 2, 2, 1, 0];
        let reg = 0.05;

        let (_, gradients) = net.loss(&inputs, &labels, reg).unwrap();
        let params = net.parameters().clone();

        for parameter in Parameter::ALL {
            let checks = net
                .grad_check_sparse(parameter, &inputs, &labels, reg, &gradients, 8, 1e-5, &mut rng)
                .unwrap();

            assert_eq!(checks.len(), 8);
            for check in checks {
                assert!(check.relative_error < 1e-2, "{parameter:?}: {check:?}");
            }
        }

        assert_eq!(net.parameters(), &params);
    }

    #[test]
    fn gradient_step_decreases_loss() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut net = TwoLayerNet::new(4, 10, 3, 0.1, &mut rng);
        let inputs = toy_inputs();

        let (before, gradients) = net.loss(&inputs, &TOY_LABELS, 0.1).unwrap();
        for parameter in Parameter::ALL {
            SimpleGradientDescent.descend(
                1,
                gradients.get(parameter),
                net.params.get_mut(parameter),
                1e-4,
            );
        }
        let (after, _) = net.loss(&inputs, &TOY_LABELS, 0.1).unwrap();

        assert!(after < before, "{after} >= {before}");
    }

    #[test]
    fn one_iteration_on_toy_data() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut net = TwoLayerNet::with_parameters(Parameters::zeros(4, 10, 3)).unwrap();
        let inputs = toy_inputs();

        let config = NetTrainConfig {
            learning_rate: 0.1,
            reg: 0.0,
            num_iters: 1,
            batch_size: 5,
            sampling: Sampling::WithoutReplacement,
            ..Default::default()
        };

        let history = net
            .train(&inputs, &TOY_LABELS, &inputs, &TOY_LABELS, &config, &mut rng)
            .unwrap();

        assert_eq!(history.loss_history.len(), 1);
        assert!((history.loss_history[0] - 3.0f64.ln()).abs() < 1e-12);

        let (loss, _) = net.loss(&inputs, &TOY_LABELS, 0.0).unwrap();
        assert!(loss < 3.0f64.ln());
    }

    #[test]
    fn history_lengths() {
        let mut rng = StdRng::seed_from_u64(5);
        let (inputs, labels) = clusters(7, &mut rng);
        let (val_inputs, val_labels) = clusters(3, &mut rng);
        let mut net = TwoLayerNet::new(2, 5, 3, DEFAULT_STD, &mut rng);

        // 21 examples in batches of 5 makes 4 iterations per epoch.
        let config = NetTrainConfig {
            num_iters: 10,
            batch_size: 5,
            ..Default::default()
        };

        let history = net
            .train(&inputs, &labels, &val_inputs, &val_labels, &config, &mut rng)
            .unwrap();

        assert_eq!(history.loss_history.len(), 10);
        assert_eq!(history.train_acc_history.len(), 3);
        assert_eq!(history.val_acc_history.len(), 3);
        assert!(history
            .train_acc_history
            .iter()
            .chain(&history.val_acc_history)
            .all(|&a| (0.0..=1.0).contains(&a)));

        // Batches larger than the training set make every iteration an epoch.
        let config = NetTrainConfig {
            num_iters: 4,
            batch_size: 100,
            ..Default::default()
        };

        let history = net
            .train(&inputs, &labels, &val_inputs, &val_labels, &config, &mut rng)
            .unwrap();

        assert_eq!(history.train_acc_history.len(), 4);
    }

    #[test]
    fn train_learns_clusters() {
        let mut rng = StdRng::seed_from_u64(6);
        let (inputs, labels) = clusters(50, &mut rng);
        let (val_inputs, val_labels) = clusters(20, &mut rng);
        let mut net = TwoLayerNet::new(2, 10, 3, 0.1, &mut rng);

        let config = NetTrainConfig {
            learning_rate: 0.05,
            learning_rate_decay: 0.99,
            reg: 1e-3,
            num_iters: 1000,
            batch_size: 32,
            ..Default::default()
        };

        let history = net
            .train(&inputs, &labels, &val_inputs, &val_labels, &config, &mut rng)
            .unwrap();

        assert!(history.loss_history[999] < history.loss_history[0]);
        assert!(*history.val_acc_history.last().unwrap() > 0.9);

        let predictions = net.predict(&val_inputs).unwrap();
        assert_eq!(predictions.len(), val_inputs.rows());
        assert!(predictions.iter().all(|&p| p < 3));
        assert!(accuracy(&predictions, &val_labels).unwrap() > 0.9);
    }

    #[test]
    fn config_and_history_json() {
        let config: NetTrainConfig =
            serde_json::from_str(r#"{ "learning_rate": 0.1, "sampling": "without_replacement" }"#)
                .unwrap();
        assert_eq!(
            config,
            NetTrainConfig {
                learning_rate: 0.1,
                sampling: Sampling::WithoutReplacement,
                ..Default::default()
            }
        );

        let history = TrainingHistory {
            loss_history: vec![1.5, 1.0],
            train_acc_history: vec![0.5],
            val_acc_history: vec![0.25],
        };
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "loss_history": [1.5, 1.0],
                "train_acc_history": [0.5],
                "val_acc_history": [0.25],
            })
        );
    }

    #[test]
    fn scores_without_labels() {
        let mut params = Parameters::zeros(4, 10, 3);
        params.output_biases = [1.0, 2.0, 3.0].into();
        let net = TwoLayerNet::with_parameters(params).unwrap();

        let scores = net.scores(&toy_inputs()).unwrap();
        assert_eq!(scores.shape(), [5, 3]);
        for row in scores.iter() {
            assert_eq!(row, &[1.0, 2.0, 3.0]);
        }
        assert_eq!(net.predict(&toy_inputs()).unwrap(), vec![2; 5]);
    }

    #[test]
    fn rejects_bad_shapes_and_labels() {
        let mut params = Parameters::zeros(4, 10, 3);
        params.hidden_biases = Vector::zeros(9);
        assert!(matches!(
            TwoLayerNet::with_parameters(params),
            Err(ModelError::ShapeMismatch(_))
        ));

        let mut rng = StdRng::seed_from_u64(7);
        let mut net = TwoLayerNet::new(4, 10, 3, DEFAULT_STD, &mut rng);

        assert!(matches!(
            net.loss(&Matrix::zeros(5, 3), &TOY_LABELS, 0.0),
            Err(ModelError::ShapeMismatch(_))
        ));
        assert_eq!(
            net.loss(&toy_inputs(), &[0, 1, 2, 5, 1], 0.0).map(|(loss, _)| loss),
            Err(ModelError::InvalidLabel {
                index: 3,
                label: 5,
                classes: 3
            })
        );

        let config = NetTrainConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            net.train(&toy_inputs(), &TOY_LABELS, &toy_inputs(), &TOY_LABELS, &config, &mut rng),
            Err(ModelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn train_rejects_out_of_range_labels_up_front() {
        let mut rng = StdRng::seed_from_u64(8);
        let (inputs, mut labels) = clusters(7, &mut rng);
        let (val_inputs, val_labels) = clusters(3, &mut rng);
        labels[20] = 7;

        let mut net = TwoLayerNet::new(2, 5, 3, 0.1, &mut rng);
        let params = net.parameters().clone();

        // Single-example batches rarely draw the bad row, so it must be caught before
        // the first update.
        let config = NetTrainConfig {
            num_iters: 5,
            batch_size: 1,
            ..Default::default()
        };

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(
                net.train(&inputs, &labels, &val_inputs, &val_labels, &config, &mut rng),
                Err(ModelError::InvalidLabel {
                    index: 20,
                    label: 7,
                    classes: 3
                })
            );
            assert_eq!(net.parameters(), &params);
        }

        let (inputs, labels) = clusters(7, &mut rng);
        let bad_val_labels = vec![9; val_inputs.rows()];
        assert_eq!(
            net.train(&inputs, &labels, &val_inputs, &bad_val_labels, &config, &mut rng),
            Err(ModelError::InvalidLabel {
                index: 0,
                label: 9,
                classes: 3
            })
        );
        assert_eq!(net.parameters(), &params);

        assert!(matches!(
            net.train(&inputs, &labels, &val_inputs, &val_labels[1..], &config, &mut rng),
            Err(ModelError::ShapeMismatch(_))
        ));
    }
}
