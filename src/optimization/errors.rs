//! optimization::errors — error surface for likelihood maximization.
//!
//! Every failure raised while configuring the L-BFGS solver, evaluating a
//! penalized log-likelihood, or post-processing the solver state is reported
//! as an [`OptError`]. Argmin's dynamic `Error` is normalized at the boundary
//! through `From<argmin::core::Error>` so callers never match on backend
//! types.
use argmin::core::{ArgminError, Error};

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Gradient length does not match the parameter length.
    GradientDimMismatch { expected: usize, found: usize },

    /// Gradient element is NaN or infinite.
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- MLEOptions ----
    /// Gradient tolerance must be positive and finite.
    InvalidTolGrad { tol: f64, reason: &'static str },

    /// Cost-change tolerance must be positive and finite.
    InvalidTolCost { tol: f64, reason: &'static str },

    /// Iteration cap must be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    /// At least one stopping rule is required.
    NoTolerancesProvided,

    /// Unknown line-search name.
    InvalidLineSearch { name: String, reason: &'static str },

    /// L-BFGS history size must be at least one.
    InvalidLBFGSMem { mem: usize, reason: &'static str },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteCost { value: f64 },

    /// Parameter vector length does not match the model design.
    ThetaLengthMismatch { expected: usize, actual: usize },

    /// Parameter vector holds a non-finite entry.
    InvalidThetaInput { index: usize, value: f64 },

    /// Design matrix rows and target length disagree.
    DesignShapeMismatch { rows: usize, targets: usize },

    // ---- Optimizer outcome ----
    /// Estimated parameter is NaN or infinite.
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },

    /// Solver finished without a best parameter vector.
    MissingThetaHat,

    // ---- Finite differences ----
    /// Hessian is not `dim × dim`.
    HessianDimMismatch { expected: usize, found: (usize, usize) },

    /// Hessian entry is NaN or infinite.
    InvalidHessian { row: usize, col: usize, value: f64 },

    // ---- Argmin ----
    InvalidParameter { text: String },
    NotImplemented { text: String },
    NotInitialized { text: String },
    ConditionViolated { text: String },
    CheckPointNotFound { text: String },
    PotentialBug { text: String },
    ImpossibleError { text: String },
    /// Any other error raised inside the solver or an objective callback.
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => write!(f, "No tolerances provided"),
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::NonFiniteCost { value } => write!(f, "Non-finite objective value: {value}"),
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Parameter length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid parameter at index {index}: {value}, must be finite")
            }
            OptError::DesignShapeMismatch { rows, targets } => {
                write!(f, "Design matrix has {rows} rows but {targets} targets were supplied")
            }
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Solver returned no parameter estimate"),
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }
            OptError::InvalidParameter { text } => write!(f, "Invalid parameter: {text}"),
            OptError::NotImplemented { text } => write!(f, "Not implemented: {text}"),
            OptError::NotInitialized { text } => write!(f, "Not initialized: {text}"),
            OptError::ConditionViolated { text } => write!(f, "Condition violated: {text}"),
            OptError::CheckPointNotFound { text } => write!(f, "Checkpoint not found: {text}"),
            OptError::PotentialBug { text } => write!(f, "Potential bug: {text}"),
            OptError::ImpossibleError { text } => write!(f, "Impossible error: {text}"),
            OptError::BackendError { text } => write!(f, "Backend error: {text}"),
            OptError::UnknownError => write!(f, "Unknown optimizer error"),
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Objective callbacks raise `OptError` through `?`; recover it first.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}
