//! models — simulator, age stratifier, and regional scenarios.

pub mod scenario;
pub mod simulator;
pub mod stratifier;

pub use self::scenario::{
    HealthcareImpact, RegionOutlook, TrueCasesEstimator, probability_infected_given_asymptomatic,
    project_region,
};
pub use self::simulator::{
    DEFAULT_TIME_SCALE_DAYS, MIN_VIEW_DAYS, TruncationPolicy, simulate, simulate_with_policy,
};
pub use self::stratifier::{CohortOutcome, stratify};
