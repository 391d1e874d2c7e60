//! Validation helpers shared by the optimizer and the finite-difference code.
//!
//! Each helper reports the first offending element through a dedicated
//! [`OptError`] variant so fitting failures can be traced back to a specific
//! coefficient.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::{Grad, Hessian, Theta},
};

/// Check an optional gradient-norm tolerance (finite and `> 0` when present).
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// Check an optional cost-change tolerance (finite and `> 0` when present).
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) if !tol.is_finite() => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." })
        }
        Some(tol) if tol <= 0.0 => {
            Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." })
        }
        _ => Ok(()),
    }
}

/// Require `grad.len() == dim` and finite entries.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] on a length mismatch.
/// - [`OptError::InvalidGradient`] for the first NaN/±∞ entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match grad.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OptError::InvalidGradient {
            index,
            value: grad[index],
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameter vector, rejecting missing or
/// non-finite estimates.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some(index) = theta.iter().position(|v| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value: theta[index],
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

/// Require a finite objective value.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Require a finite `dim × dim` matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] when the shape is wrong.
/// - [`OptError::InvalidHessian`] for the first non-finite entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((row, col), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row, col, value });
        }
    }
    Ok(())
}
