//! Errors for the epidemic layer (cohort tables, scenario inputs).
//!
//! The simulator itself is total and never fails; errors only arise when
//! building its inputs from configuration or caller-supplied scenarios.
//!
//! ## Conventions
//! - Cohort indices are 0-based positions in the configured age table.
//! - Rates must be finite and inside `[0, 1]`.

/// Result alias for epidemic-layer operations.
pub type EpidemicResult<T> = Result<T, EpidemicError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EpidemicError {
    // ---- Age distribution ----
    /// The age table has no cohorts.
    EmptyAgeDistribution,

    /// A cohort column is NaN/±inf or outside `[0, 1]`.
    InvalidCohort { index: usize, field: &'static str, value: f64 },

    // ---- Scenario inputs ----
    /// Region name absent from the configured region table.
    UnknownRegion { name: String },

    /// Contact rate outside the configured bounds.
    InvalidContactRate { value: f64, min: f64, max: f64 },

    /// A model rate is NaN/±inf or outside `[0, 1]`.
    InvalidRate { name: &'static str, value: f64 },
}

impl std::error::Error for EpidemicError {}

impl std::fmt::Display for EpidemicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpidemicError::EmptyAgeDistribution => {
                write!(f, "Age distribution must contain at least one cohort.")
            }
            EpidemicError::InvalidCohort { index, field, value } => {
                write!(f, "Cohort {index} has invalid {field} {value}: expected a finite value in [0, 1].")
            }
            EpidemicError::UnknownRegion { name } => {
                write!(f, "Region '{name}' is not in the configured region table.")
            }
            EpidemicError::InvalidContactRate { value, min, max } => {
                write!(f, "Contact rate {value} outside the allowed range [{min}, {max}].")
            }
            EpidemicError::InvalidRate { name, value } => {
                write!(f, "Rate '{name}' = {value} must be finite and lie in [0, 1].")
            }
        }
    }
}
