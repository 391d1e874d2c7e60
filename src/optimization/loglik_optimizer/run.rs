//! Executor wiring: run an L-BFGS solver over an [`ArgMinAdapter`] and
//! normalize the final state into an [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        traits::{LogLikelihood, MLEOptions, OptimOutcome},
        types::{Grad, Theta},
    },
};
use argmin::core::{Executor, State};
use tracing::debug;

/// Run `solver` from `theta0` until a tolerance or the iteration cap fires.
///
/// `theta0` is moved into the executor state. The returned value is the
/// best log-likelihood `ℓ(θ̂)`, i.e. the negated best cost.
///
/// # Errors
/// - Argmin runtime errors (line-search failures, objective errors raised
///   through the adapter), converted into `OptError`.
/// - Validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    let mut optimizer = Executor::new(problem, solver).configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut state = optimizer.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    let outcome = OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )?;
    debug!(
        iterations = outcome.iterations,
        loglik = outcome.value,
        status = %outcome.status,
        "l-bfgs finished"
    );
    Ok(outcome)
}
