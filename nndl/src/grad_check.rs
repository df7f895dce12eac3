use rand::Rng;
use tracing::debug;

use crate::error::ModelError;
use crate::linear_algebra::Value;

/// The outcome of comparing one analytic gradient entry against a central difference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientCheck {
    /// Flat (row-major) index into the parameter.
    pub index: usize,
    pub numerical: Value,
    pub analytic: Value,
    pub relative_error: Value,
}

/// `|n - a| / (|n| + |a|)`, or zero when both are zero.
pub fn relative_error(numerical: Value, analytic: Value) -> Value {
    let scale = numerical.abs() + analytic.abs();
    if scale == 0.0 {
        0.0
    } else {
        (numerical - analytic).abs() / scale
    }
}

/// Samples `num_checks` random entries of a parameter and compares the analytic gradient
/// at each against `(loss(p + h) - loss(p - h)) / 2h`.
///
/// `parameter` selects the parameter being checked out of the model, and `loss` evaluates
/// the model. Every perturbed entry is restored before any loss error is returned.
pub fn grad_check_sparse<M>(
    model: &mut M,
    parameter: impl Fn(&mut M) -> &mut [Value],
    loss: impl Fn(&M) -> Result<Value, ModelError>,
    analytic: &[Value],
    num_checks: usize,
    h: Value,
    rng: &mut impl Rng,
) -> Result<Vec<GradientCheck>, ModelError> {
    if !(h.is_finite() && h > 0.0) {
        return Err(ModelError::InvalidConfig(
            "the finite difference step must be positive",
        ));
    }

    let len = parameter(model).len();
    if analytic.len() != len {
        return Err(ModelError::ShapeMismatch(
            "the analytic gradient must match the parameter's shape",
        ));
    }
    if len == 0 {
        return Ok(Vec::new());
    }

    let mut checks = Vec::with_capacity(num_checks);

    for _ in 0..num_checks {
        let index = rng.gen_range(0..len);

        let old_value = parameter(model)[index];
        parameter(model)[index] = old_value + h;
        let loss_plus = loss(model);
        parameter(model)[index] = old_value - h;
        let loss_minus = loss(model);
        parameter(model)[index] = old_value;

        let numerical = (loss_plus? - loss_minus?) / (2.0 * h);
        let analytic = analytic[index];
        let relative_error = relative_error(numerical, analytic);

        debug!(
            index,
            numerical = %format!("{numerical:.6}"),
            analytic = %format!("{analytic:.6}"),
            relative_error = %format!("{relative_error:.3e}"),
            "Gradient check:",
        );

        checks.push(GradientCheck {
            index,
            numerical,
            analytic,
            relative_error,
        });
    }

    Ok(checks)
}
