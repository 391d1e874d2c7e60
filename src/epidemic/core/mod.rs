//! core — value types shared by the simulator, stratifier, and scenarios.
//!
//! - [`ModelParameters`]: per-day rates plus bed capacity.
//! - [`CompartmentState`] / [`SimulationTrajectory`]: rounded daily output.
//! - [`AgeDistribution`]: validated cohort table.
//!
//! No I/O and no logging happen here.

pub mod age;
pub mod params;
pub mod state;

pub use self::age::{AgeCohort, AgeDistribution};
pub use self::params::ModelParameters;
pub use self::state::{CompartmentState, SimulationTrajectory};
