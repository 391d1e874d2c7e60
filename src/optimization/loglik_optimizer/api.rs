//! High-level entry point: maximize a [`LogLikelihood`] with L-BFGS.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome},
        types::Theta,
    },
};
use argmin_math::ArgminL2Norm;

/// Maximize `ℓ(θ)` starting from `theta0`.
///
/// Behavior
/// --------
/// 1. `f.check(theta0, data)` rejects unusable starting points.
/// 2. If the analytic gradient at `theta0` already satisfies `tol_grad`,
///    the start is returned as-is: line searches reject a zero search
///    direction, and flat or perfectly linear histories hit this case.
/// 3. Otherwise an L-BFGS solver with the configured line search runs
///    through [`run_lbfgs`].
///
/// # Errors
/// - Anything `check`, `grad`, or `value` reports.
/// - Builder and runtime errors from argmin, as `OptError`.
///
/// # Example
/// ```
/// use ndarray::array;
/// use outbreak_projection::optimization::errors::OptResult;
/// use outbreak_projection::optimization::loglik_optimizer::{
///     maximize, Grad, LogLikelihood, MLEOptions, Theta,
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-(theta[0] - 2.0).powi(2))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
///     fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
///         Ok(array![-2.0 * (theta[0] - 2.0)])
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.0], &(), &MLEOptions::default())
///     .expect("a concave bowl should be maximized");
/// assert!((out.theta_hat[0] - 2.0).abs() < 1e-4);
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    if let Some(outcome) = stationary_start(f, &theta0, data, opts)? {
        return Ok(outcome);
    }
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            run_lbfgs(theta0, opts, problem, build_optimizer_more_thuente(opts)?)
        }
        LineSearcher::HagerZhang => {
            run_lbfgs(theta0, opts, problem, build_optimizer_hager_zhang(opts)?)
        }
    }
}

fn stationary_start<F: LogLikelihood>(
    f: &F, theta0: &Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<Option<OptimOutcome>> {
    let tol = opts.tols.tol_grad.unwrap_or(0.0);
    let g = f.grad(theta0, data)?;
    if g.l2_norm() > tol {
        return Ok(None);
    }
    let value = f.value(theta0, data)?;
    OptimOutcome::stationary_start(theta0.clone(), value, g).map(Some)
}
