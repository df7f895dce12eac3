use serde::{Deserialize, Serialize};

use crate::linear_algebra::Value;

/// Applies one update to a flat slice of parameters given their gradients.
///
/// `t` is the 1-based training step.
pub trait GradientDescent {
    fn descend(&mut self, t: usize, gradients: &[Value], values: &mut [Value], rate: Value);
}

/// Plain gradient descent: `v ← v - rate · g`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct SimpleGradientDescent;

impl GradientDescent for SimpleGradientDescent {
    fn descend(&mut self, _t: usize, gradients: &[Value], values: &mut [Value], rate: Value) {
        assert_eq!(gradients.len(), values.len(), "parameter shape mismatch");
        values
            .iter_mut()
            .zip(gradients)
            .for_each(|(v, g)| *v -= rate * g);
    }
}
