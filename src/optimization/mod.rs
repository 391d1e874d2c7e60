//! optimization — likelihood maximization and its error surface.
//!
//! Purpose
//! -------
//! Host the L-BFGS maximizer used to fit the additive forecaster together
//! with the single error type ([`errors::OptError`]) every optimizer path
//! reports through.
//!
//! Conventions
//! -----------
//! - Solvers minimize `c(θ) = -ℓ(θ)`; user-facing values are always `ℓ`.
//! - Parameters, gradients, and Hessians are `ndarray` containers
//!   (`Theta`, `Grad`, `Hessian`).
//! - This layer logs only the end of each solver run at `debug` level;
//!   orchestration code decides what else to report.

pub mod errors;
pub mod loglik_optimizer;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
}
