//! loglik_optimizer — argmin-backed maximization of penalized log-likelihoods.
//!
//! Purpose
//! -------
//! Give model code one trait to implement ([`LogLikelihood`]) and one call to
//! make ([`maximize`]) in order to fit coefficients by L-BFGS, with
//! configurable line search and stopping rules.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost `-ℓ(θ)`.
//! - [`maximize`] validates the start, short-circuits a stationary start,
//!   builds the solver ([`builders`]) and runs it ([`run::run_lbfgs`]).
//! - [`finite_diff`] supplies validated finite-difference Hessians;
//!   [`validation`] holds the shared shape/finiteness checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer always maximizes `ℓ`; objectives never implement the cost.
//! - Objective errors are recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, never panics.
//!
//! Downstream usage
//! ----------------
//! - The additive forecaster implements [`LogLikelihood`] for its penalized
//!   least-squares objective and calls [`maximize`] once per fit.
//! - Parameter covariance for prediction intervals differentiates the
//!   forecaster's score with [`finite_diff::compute_hessian`].
//!
//! Testing notes
//! -------------
//! - Unit tests sit beside each submodule; the forecasting tests exercise
//!   the full path on synthetic case series.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
