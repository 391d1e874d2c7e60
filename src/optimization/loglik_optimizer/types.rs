//! loglik_optimizer::types — numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Keep the `ndarray` containers and the argmin L-BFGS generics in one place
//! so the forecasting layer can talk about `Theta`, `Grad`, and `Hessian`
//! without spelling out backend types.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors whose length equals the number of
//!   free coefficients of the model being fitted (trend, changepoint, and
//!   seasonal terms for the additive forecaster).
//! - `Hessian` is dense and square.
//! - `Cost` is the scalar argmin minimizes, i.e. the negated penalized
//!   log-likelihood.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Coefficient vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient of the log-likelihood (or of the cost), same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `p × p` second-derivative matrix.
pub type Hessian = Array2<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// Function-evaluation counters reported by argmin (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS paired with the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS paired with the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
