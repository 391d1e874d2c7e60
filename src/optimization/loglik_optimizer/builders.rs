//! loglik_optimizer::builders — L-BFGS construction.
//!
//! Builders pick the line search, apply the history size, and wire the
//! gradient/cost tolerances from [`MLEOptions`]. The initial parameter and
//! the iteration cap are runtime concerns left to
//! [`run_lbfgs`](super::run::run_lbfgs).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with a Hager–Zhang line search.
///
/// # Errors
/// Argmin rejects a tolerance (surfaced as `OptError`).
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with a More–Thuente line search.
///
/// # Errors
/// Argmin rejects a tolerance (surfaced as `OptError`).
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply whichever of `tol_grad` / `tol_cost` is set; argmin defaults stay
/// in effect for the others.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Both builders with default and explicit memory.
    // - Tolerance wiring with present and absent tolerances.
    //
    // They intentionally DO NOT cover:
    // - Solver execution, exercised by the forecaster fits.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Both line-search builders succeed with the default options.
    //
    // Given
    // -----
    // - `MLEOptions::default()` and a Hager–Zhang variant with memory 11.
    //
    // Expect
    // ------
    // - `Ok(_)` from both builders.
    fn builders_accept_default_and_explicit_memory() {
        // Arrange
        let defaults = MLEOptions::default();
        let tols = Tolerances::new(Some(1e-6), None, Some(25)).expect("Tolerances should be valid");
        let hz = MLEOptions::new(tols, LineSearcher::HagerZhang, Some(11))
            .expect("MLEOptions should be valid");

        // Act / Assert
        assert!(build_optimizer_more_thuente(&defaults).is_ok());
        assert!(build_optimizer_hager_zhang(&hz).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` leaves argmin defaults in place when no tolerance
    // is configured.
    //
    // Given
    // -----
    // - Tolerances with only an iteration cap.
    //
    // Expect
    // ------
    // - `Ok(_)`.
    fn configure_lbfgs_accepts_absent_tolerances() {
        // Arrange
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).expect("Tolerances should be valid");
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, None)
            .expect("MLEOptions should be valid");

        // Act
        let configured = configure_lbfgs(raw, &opts);

        // Assert
        assert!(configured.is_ok());
    }
}
