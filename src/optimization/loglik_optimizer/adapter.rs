//! Bridge from a [`LogLikelihood`] to argmin's `CostFunction` / `Gradient`.
//!
//! The solver minimizes `c(θ) = -ℓ(θ)`, so both the value and the analytic
//! gradient of `ℓ` are negated here.
use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Borrowed objective plus its data, as seen by argmin.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// `-ℓ(θ)`; a non-finite `ℓ` is an error rather than a cost.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let value = self.f.value(theta, self.data)?;
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value }.into());
        }
        Ok(-value)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// `-∇ℓ(θ)` from the analytic gradient.
    ///
    /// # Errors
    /// - Whatever `grad` reports.
    /// - `GradientDimMismatch` / `InvalidGradient` when the gradient has the
    ///   wrong length or a non-finite entry.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let g = self.f.grad(theta, self.data)?;
        validate_grad(&g, theta.len())?;
        Ok(-g)
    }
}
