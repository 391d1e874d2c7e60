//! epidemic — compartmental projection of disease spread and hospital load.
//!
//! Purpose
//! -------
//! Project how an outbreak evolves in one region from its latest reported
//! counts, how much hospital demand it generates against bed capacity, and
//! how the resulting deaths and recoveries split across age cohorts.
//!
//! Key behaviors
//! -------------
//! - [`simulate`] steps an S/I/R/D model whose death rate rises with the
//!   share of critically ill people denied a bed.
//! - [`stratify`] distributes final outcomes over an [`AgeDistribution`].
//! - [`RegionOutlook::build`] ties both to configuration and latest counts.
//!
//! Invariants & assumptions
//! ------------------------
//! - The simulator is total: it never errors and never yields NaN.
//!   [`EpidemicError`] only arises when validating tables and scenario inputs.
//! - Stored counts are rounded from a continuous state; see
//!   [`models::simulator`] for the exact rounding and trimming rules.
//!
//! Downstream usage
//! ----------------
//! - Import from [`prelude`] for the everyday types.
//! - The epidemic and forecast stacks are independent; neither consumes the
//!   other's output.

pub mod core;
pub mod errors;
pub mod models;

pub use self::core::{
    AgeCohort, AgeDistribution, CompartmentState, ModelParameters, SimulationTrajectory,
};
pub use self::errors::{EpidemicError, EpidemicResult};
pub use self::models::{
    CohortOutcome, HealthcareImpact, RegionOutlook, TrueCasesEstimator, TruncationPolicy,
    probability_infected_given_asymptomatic, project_region, simulate, simulate_with_policy,
    stratify,
};

pub mod prelude {
    pub use super::core::{AgeDistribution, CompartmentState, ModelParameters, SimulationTrajectory};
    pub use super::errors::{EpidemicError, EpidemicResult};
    pub use super::models::{
        HealthcareImpact, RegionOutlook, TrueCasesEstimator, TruncationPolicy, simulate, stratify,
    };
}
