//! Errors for the forecast stack (series validation, model fitting, artifact
//! persistence, and cache retrieval).
//!
//! ## Conventions
//! - Series indices are 0-based positions in the caller's input order.
//! - Optimizer and covariance failures are normalized to
//!   [`ForecastError::OptimizationFailed`] with a readable status.
//! - Storage, CSV, and JSON failures keep the artifact key when it is known
//!   so logs point at the offending file.
use crate::{data::DataError, optimization::errors::OptError};

/// Result alias for forecast operations.
pub type ForecastResult<T> = Result<T, ForecastError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastError {
    // ---- Input series ----
    /// The historical series has no rows.
    EmptySeries,

    /// Too few finite observations remain after preprocessing.
    InsufficientHistory { needed: usize, found: usize },

    /// Dates are not strictly increasing.
    UnsortedDates { index: usize },

    /// A model coefficient or prediction became NaN/±inf.
    NonFiniteValue { what: &'static str, value: f64 },

    // ---- Options ----
    /// Forecast horizon must be at least one day.
    InvalidHorizon { horizon: usize },

    /// Interval width must lie strictly between 0 and 1.
    InvalidIntervalWidth { width: f64 },

    /// A changepoint or penalty option is out of range.
    InvalidOption { name: &'static str, reason: String },

    // ---- Fitting ----
    /// The optimizer or covariance step failed.
    OptimizationFailed { status: String },

    // ---- Artifacts ----
    /// No artifact is stored under this key.
    ArtifactNotFound { key: String },

    /// Reading or writing an artifact failed.
    ArtifactIo { key: String, message: String },

    /// An artifact exists but cannot be decoded.
    ArtifactCorrupt { key: String, message: String },

    /// An artifact key could not be built or parsed.
    InvalidArtifactKey { key: String, reason: &'static str },

    // ---- Data and retrieval ----
    /// The provider has no usable history for this entity.
    DataUnavailable { entity: String },

    /// The historical data provider failed.
    ProviderFailed { message: String },

    /// The forecast could not be read even after a forced rebuild.
    PredictionUnavailable { entity: String, cause: String },
}

impl ForecastError {
    /// Attach an artifact key to I/O and decoding errors that lack one.
    pub(crate) fn with_key(self, key: &str) -> Self {
        match self {
            ForecastError::ArtifactIo { key: k, message } if k.is_empty() => {
                ForecastError::ArtifactIo { key: key.to_string(), message }
            }
            ForecastError::ArtifactCorrupt { key: k, message } if k.is_empty() => {
                ForecastError::ArtifactCorrupt { key: key.to_string(), message }
            }
            other => other,
        }
    }
}

impl std::error::Error for ForecastError {}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input series ----
            ForecastError::EmptySeries => write!(f, "Historical series is empty."),
            ForecastError::InsufficientHistory { needed, found } => {
                write!(f, "At least {needed} finite observations are required, found {found}.")
            }
            ForecastError::UnsortedDates { index } => {
                write!(f, "Dates must be strictly increasing; violated at index {index}.")
            }
            ForecastError::NonFiniteValue { what, value } => {
                write!(f, "Non-finite {what}: {value}")
            }

            // ---- Options ----
            ForecastError::InvalidHorizon { horizon } => {
                write!(f, "Forecast horizon must be at least 1 day, got {horizon}.")
            }
            ForecastError::InvalidIntervalWidth { width } => {
                write!(f, "Interval width must lie in (0, 1), got {width}.")
            }
            ForecastError::InvalidOption { name, reason } => {
                write!(f, "Invalid forecast option '{name}': {reason}")
            }

            // ---- Fitting ----
            ForecastError::OptimizationFailed { status } => {
                write!(f, "Model fitting failed: {status}")
            }

            // ---- Artifacts ----
            ForecastError::ArtifactNotFound { key } => write!(f, "Artifact '{key}' not found."),
            ForecastError::ArtifactIo { key, message } => {
                write!(f, "I/O error on artifact '{key}': {message}")
            }
            ForecastError::ArtifactCorrupt { key, message } => {
                write!(f, "Artifact '{key}' is corrupt: {message}")
            }
            ForecastError::InvalidArtifactKey { key, reason } => {
                write!(f, "Invalid artifact key '{key}': {reason}")
            }

            // ---- Data and retrieval ----
            ForecastError::DataUnavailable { entity } => {
                write!(f, "No historical data available for '{entity}'.")
            }
            ForecastError::ProviderFailed { message } => {
                write!(f, "Historical data provider failed: {message}")
            }
            ForecastError::PredictionUnavailable { entity, cause } => {
                write!(f, "Prediction unavailable for '{entity}' after forced rebuild: {cause}")
            }
        }
    }
}

impl From<OptError> for ForecastError {
    fn from(err: OptError) -> Self {
        ForecastError::OptimizationFailed { status: err.to_string() }
    }
}

impl From<DataError> for ForecastError {
    fn from(err: DataError) -> Self {
        ForecastError::ProviderFailed { message: err.to_string() }
    }
}

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::ArtifactIo { key: String::new(), message: err.to_string() }
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::ArtifactCorrupt { key: String::new(), message: err.to_string() }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ArtifactCorrupt { key: String::new(), message: err.to_string() }
    }
}
