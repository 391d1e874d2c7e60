//! inference::covariance — observed information and its pseudo-inverse.
//!
//! Purpose
//! -------
//! Turn a fitted coefficient vector into the uncertainty needed for
//! prediction intervals: the observed information `J(θ̂)` from a
//! finite-difference Hessian, its Moore–Penrose pseudo-inverse `J⁺`, and the
//! quadratic forms `xᵀ J⁺ x` that scale predictive variance.
//!
//! Key behaviors
//! -------------
//! - [`information_pseudo_inverse`] differentiates the negative score with
//!   [`compute_hessian`] and inverts the result.
//! - [`pseudo_inverse`] copies the matrix into `nalgebra`, runs a symmetric
//!   eigendecomposition, and drops eigenvalues at or below [`EIGEN_EPS`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are square and symmetric up to rounding; `compute_hessian`
//!   already symmetrizes.
//! - Weakly identified directions (tiny eigenvalues) contribute nothing to
//!   `J⁺`; no explicit inverse is ever formed.
//!
//! Conventions
//! -----------
//! - The information is on the scale of the penalized objective the caller
//!   differentiates; multiply by the residual variance to obtain a
//!   coefficient covariance.
use crate::optimization::{errors::OptResult, loglik_optimizer::finite_diff::compute_hessian};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Eigenvalues at or below this are treated as zero in [`pseudo_inverse`].
pub const EIGEN_EPS: f64 = 1e-10;

/// Pseudo-inverse of the observed information at `theta_hat`.
///
/// Parameters
/// ----------
/// - `neg_score`: `θ ↦ -∇ℓ(θ)`; its Jacobian is the observed information.
/// - `theta_hat`: fitted coefficients.
///
/// Errors
/// ------
/// - Whatever [`compute_hessian`] reports (shape mismatch, non-finite
///   entries on both finite-difference paths).
pub fn information_pseudo_inverse<F: Fn(&Array1<f64>) -> Array1<f64>>(
    neg_score: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array2<f64>> {
    let obs_info = compute_hessian(neg_score, theta_hat)?;
    Ok(pseudo_inverse(&obs_info))
}

/// Moore–Penrose pseudo-inverse of a symmetric matrix.
///
/// `A⁺ = Σ_{k: λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k` with `A = Q Λ Qᵀ`.
///
/// Panics
/// ------
/// - If `matrix` is not square (programmer error).
pub fn pseudo_inverse(matrix: &Array2<f64>) -> Array2<f64> {
    let n = matrix.nrows();
    let eigen = to_dmatrix(matrix).symmetric_eigen();
    let q = &eigen.eigenvectors;
    let mut inverse = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        for i in 0..n {
            let coeff = q[(i, k)] / lambda;
            for j in 0..n {
                inverse[[i, j]] += coeff * q[(j, k)];
            }
        }
    }
    inverse
}

/// `xᵀ M x`.
pub fn quadratic_form(matrix: &Array2<f64>, x: &Array1<f64>) -> f64 {
    x.dot(&matrix.dot(x))
}

/// `scale · sqrt(diag(M))`, i.e. coefficient standard errors when `M` is
/// `J⁺` and `scale` the residual standard deviation.
pub fn diagonal_std_errors(matrix: &Array2<f64>, scale: f64) -> Array1<f64> {
    matrix.diag().mapv(|v| scale * v.max(0.0).sqrt())
}

fn to_dmatrix(matrix: &Array2<f64>) -> DMatrix<f64> {
    let (rows, cols) = matrix.dim();
    DMatrix::from_fn(rows, cols, |i, j| matrix[[i, j]])
}
