//! loglik_optimizer::finite_diff — finite-difference Hessians.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` crate with validation so the rest of the crate can
//! ask for derivatives and get either a finite, correctly shaped result or
//! an [`OptError`](crate::optimization::errors::OptError).
//!
//! Key behaviors
//! -------------
//! - [`compute_hessian`]: Jacobian of a gradient map, central first and
//!   forward on validation failure, symmetrized before return.
//!
//! Downstream usage
//! ----------------
//! - `inference::covariance` differentiates the negative penalized score of
//!   the additive forecaster with [`compute_hessian`] to obtain the observed
//!   information used for prediction intervals.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{Grad, Hessian, Theta},
        validation::validate_hessian,
    },
};
use finitediff::FiniteDiff;

/// Finite-difference Hessian of the gradient map `f` at `theta`.
///
/// Central differences are tried first; if that matrix fails
/// [`validate_hessian`], forward differences are used and their validation
/// error (if any) is returned. The accepted matrix is symmetrized by
/// averaging off-diagonal pairs.
///
/// Notes
/// -----
/// For an objective that is quadratic in `θ` (the penalized least-squares
/// forecaster) the gradient is affine and both schemes are exact up to
/// rounding.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Hessian accuracy on an affine gradient map and failure on NaN.
    // - Symmetrization of off-diagonal pairs.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The Hessian of an affine gradient map recovers its matrix.
    //
    // Given
    // -----
    // - `g(θ) = A θ` with symmetric `A = [[4, 1], [1, 2]]`.
    //
    // Expect
    // ------
    // - `compute_hessian` ≈ `A`, exactly symmetric.
    fn compute_hessian_recovers_affine_map() {
        // Arrange
        let a = array![[4.0, 1.0], [1.0, 2.0]];
        let g = |theta: &Theta| a.dot(theta);
        let theta: Theta = array![0.3, -0.7];

        // Act
        let hess = compute_hessian(&g, &theta).expect("Hessian of an affine map should be valid");

        // Assert
        for ((i, j), v) in hess.indexed_iter() {
            assert!((v - a[[i, j]]).abs() < 1e-5, "entry ({i}, {j}) = {v}");
        }
        assert_eq!(hess[[0, 1]], hess[[1, 0]]);
    }

    #[test]
    // Purpose
    // -------
    // A gradient map that only returns NaN fails validation on both paths.
    //
    // Given
    // -----
    // - `g(θ) = [NaN]`.
    //
    // Expect
    // ------
    // - `InvalidHessian`.
    fn compute_hessian_rejects_non_finite_map() {
        // Arrange
        let g = |_: &Theta| Array1::from(vec![f64::NAN]);

        // Act
        let err = compute_hessian(&g, &array![0.0]).expect_err("a NaN map should be rejected");

        // Assert
        assert!(matches!(err, OptError::InvalidHessian { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Symmetrization averages off-diagonal pairs and keeps the diagonal.
    //
    // Given
    // -----
    // - `[[1, 2], [0, 3]]`.
    //
    // Expect
    // ------
    // - Off-diagonals become 1, diagonal unchanged.
    fn symmetrize_hess_averages_pairs() {
        // Arrange
        let mut h: Hessian = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 0.0, 3.0])
            .expect("shape should match");

        // Act
        symmetrize_hess(&mut h);

        // Assert
        assert_eq!(h, array![[1.0, 1.0], [1.0, 3.0]]);
    }
}
