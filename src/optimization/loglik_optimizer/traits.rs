//! Public optimizer surface: the objective trait and run configuration.
//!
//! - [`LogLikelihood`]: implemented by anything that wants to be fitted.
//! - [`MLEOptions`] / [`Tolerances`]: stopping rules, line search, memory.
//! - [`LineSearcher`]: line search used inside L-BFGS.
//! - [`OptimOutcome`]: normalized solver result.
//!
//! Convention: callers *maximize* `ℓ(θ)`; the solver minimizes `c(θ) = -ℓ(θ)`.
//! Analytic gradients are gradients of `ℓ`, the adapter flips the sign.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        types::{Cost, FnEvalMap, Grad, Theta},
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::TerminationStatus;
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Objective maximized by [`maximize`](crate::optimization::loglik_optimizer::maximize).
///
/// - `value` evaluates `ℓ(θ)` (penalty terms included).
/// - `check` rejects parameter/data pairs that cannot be evaluated; it runs
///   once before the solver starts.
/// - `grad` returns the analytic `∇ℓ(θ)`; the adapter validates its shape
///   and finiteness before handing `-∇ℓ` to the solver.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad>;
}

/// Line search used by L-BFGS.
///
/// Parses case-insensitively from `"MoreThuente"` / `"HagerZhang"` so the
/// choice can live in the TOML configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Solver configuration for one fit.
///
/// Default: `tol_grad = 1e-8`, `tol_cost = 1e-12`, `max_iter = 300`,
/// More–Thuente line search, L-BFGS memory [`DEFAULT_LBFGS_MEM`](super::types::DEFAULT_LBFGS_MEM).
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Build options, rejecting a zero L-BFGS memory.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if lbfgs_mem == Some(0) {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-8), tol_cost: Some(1e-12), max_iter: Some(300) },
            line_searcher: LineSearcher::MoreThuente,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules. At least one field must be set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if max_iter == Some(0) {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Normalized solver result.
///
/// `value` is the best **log-likelihood**, not the cost. `converged` is
/// `true` for any terminating status other than `NotTerminated`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Validate raw solver state and package it.
    ///
    /// # Errors
    /// Propagates [`validate_theta_hat`] and [`validate_value`] failures.
    pub fn new(
        theta_hat: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            other => (true, format!("{other:?}")),
        };
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }

    /// Outcome for a starting point that already satisfies the gradient
    /// tolerance, so no solver iterations were needed.
    pub fn stationary_start(theta0: Theta, value: f64, grad: Grad) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(Some(theta0))?;
        validate_value(value)?;
        Ok(Self {
            theta_hat,
            value,
            converged: true,
            status: "Stationary start".to_string(),
            iterations: 0,
            fn_evals: FnEvalMap::new(),
            grad_norm: Some(grad.l2_norm()),
        })
    }
}
