use crate::linear_algebra::{Matrix, Value, Vector};

/// `inputs · weightsᵗ + biases`, with `weights` laid out as (outputs × inputs).
pub fn fully_connected_forward(inputs: &Matrix, weights: &Matrix, biases: &Vector) -> Matrix {
    inputs.matmul_transposed(weights) + biases
}

/// Returns the weight, bias and input gradients of a fully connected layer.
pub fn fully_connected_backward(
    inputs: &Matrix,
    output_gradients: &Matrix,
    weights: &Matrix,
) -> (Matrix, Vector, Matrix) {
    let weight_gradients = output_gradients.transposed_matmul(inputs);

    let bias_gradients = output_gradients.sum_rows();

    let input_gradients = output_gradients.matmul(weights);

    (weight_gradients, bias_gradients, input_gradients)
}

pub fn activation_forward(inputs: &Matrix, activation: impl Fn(Value) -> Value) -> Matrix {
    let mut outputs = inputs.clone();
    outputs.values_mut().for_each(|x| *x = activation(*x));
    outputs
}

pub fn activation_backward(
    inputs: &Matrix,
    output_gradients: &Matrix,
    activation_prime: impl Fn(Value) -> Value,
) -> Matrix {
    let mut input_gradients = output_gradients.clone();
    input_gradients
        .values_mut()
        .zip(inputs.values())
        .for_each(|(x, &o)| *x *= activation_prime(o));
    input_gradients
}
