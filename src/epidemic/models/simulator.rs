//! epidemic::models::simulator — discrete-time S/I/R/D model with
//! capacity-constrained mortality.
//!
//! Purpose
//! -------
//! Project susceptible, infected, recovered, and dead stocks day by day,
//! with hospital demand derived from the infected stock. When demand
//! exceeds bed capacity, the overflow share of the infected population dies
//! at the critical rate instead of the normal one.
//!
//! Key behaviors
//! -------------
//! - [`simulate`] runs `num_days` steps from integer initial counts and
//!   returns a [`SimulationTrajectory`] of rounded snapshots, trimmed of
//!   settled trailing days by the default [`TruncationPolicy`].
//! - [`simulate_with_policy`] accepts an explicit trimming policy (built from
//!   [`SimulationConfig`] via [`TruncationPolicy::from_config`]).
//! - A positive initial death count recalibrates the normal death rate to
//!   `dead / infected` of the initial snapshot before stepping.
//!
//! Invariants & assumptions
//! ------------------------
//! - The population `N = S + I + R + D` is fixed at initialization. A zero
//!   population produces no new infections; a zero infected stock produces
//!   no underserved share. No division can yield NaN.
//! - The continuous state is carried forward unrounded. Each compartment is
//!   floored at zero before being carried, so out-of-range rates cannot drive
//!   a stock negative and oscillate.
//! - `total_cases` of every stored row equals its `infected + recovered +
//!   dead` exactly. `S + I + R + D` of stored rows only approximates `N`
//!   because compartments are rounded independently.
//!
//! Conventions
//! -----------
//! - Day 0 is the initial state; before trimming the trajectory has
//!   `num_days + 1` rows.
//! - Hospital demand is a point-in-time quantity, `hospitalization_rate × I`,
//!   never a stock of its own.
//! - Pure function: no logging, no I/O, never fails.
//!
//! Testing notes
//! -------------
//! - Unit tests check early growth on the continuous state, the zero guards,
//!   the death-rate recalibration, and both sides of the trimming cap.
//! - Monotonicity properties over random inputs live in
//!   `tests/property_simulator.rs`.
use crate::{
    config::SimulationConfig,
    epidemic::core::{CompartmentState, ModelParameters, SimulationTrajectory},
};

/// Default long-horizon window, roughly three years of 31-day months.
pub const DEFAULT_TIME_SCALE_DAYS: usize = 12 * 3 * 31;

/// Three months kept off the long-horizon window when trimming.
pub const MIN_VIEW_DAYS: usize = 3 * 31;

/// How many settled trailing days may be removed from a trajectory.
///
/// After a run, the trailing days whose rounded infected count equals the
/// previous day's are counted. All but one of them are removed, capped at
/// `max_trim_days`. A run with at least one step always keeps day 0 and
/// day 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationPolicy {
    pub max_trim_days: usize,
}

impl TruncationPolicy {
    /// Trim cap taken from `[simulation]`.
    pub fn from_config(sim: &SimulationConfig) -> Self {
        Self { max_trim_days: sim.max_trim_days() }
    }

    /// Never trim anything.
    pub fn disabled() -> Self {
        Self { max_trim_days: 0 }
    }

    fn rows_to_keep(&self, infected: &[u64]) -> usize {
        let flat_tail = infected.windows(2).rev().take_while(|w| w[0] == w[1]).count();
        let removed = flat_tail.saturating_sub(1).min(self.max_trim_days);
        infected.len() - removed
    }
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self { max_trim_days: DEFAULT_TIME_SCALE_DAYS - MIN_VIEW_DAYS }
    }
}

/// Run the model for `num_days` steps with the default trimming policy.
///
/// Parameters
/// ----------
/// - `susceptible`, `infected`, `recovered`, `dead`: initial stocks.
/// - `params`: per-day rates and bed capacity.
/// - `num_days`: number of steps.
///
/// Returns
/// -------
/// Rounded daily snapshots; day 0 reproduces the inputs with
/// `hospitalized = round(hospitalization_rate × infected)`.
///
/// Notes
/// -----
/// - Out-of-range rates are not rejected. They are a developer concern;
///   use [`ModelParameters::validate`] at trust boundaries.
pub fn simulate(
    susceptible: u64, infected: u64, recovered: u64, dead: u64, params: &ModelParameters,
    num_days: usize,
) -> SimulationTrajectory {
    simulate_with_policy(
        susceptible,
        infected,
        recovered,
        dead,
        params,
        num_days,
        TruncationPolicy::default(),
    )
}

/// [`simulate`] with an explicit [`TruncationPolicy`].
pub fn simulate_with_policy(
    susceptible: u64, infected: u64, recovered: u64, dead: u64, params: &ModelParameters,
    num_days: usize, policy: TruncationPolicy,
) -> SimulationTrajectory {
    let path = integrate(susceptible, infected, recovered, dead, params, num_days);
    let mut states: Vec<CompartmentState> = path.iter().map(Compartments::rounded).collect();

    let infected_counts: Vec<u64> = states.iter().map(|s| s.infected).collect();
    states.truncate(policy.rows_to_keep(&infected_counts));
    SimulationTrajectory::from_states(states)
}

/// Continuous state of one day.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Compartments {
    s: f64,
    i: f64,
    r: f64,
    d: f64,
    h: f64,
}

impl Compartments {
    fn rounded(&self) -> CompartmentState {
        CompartmentState::new(
            to_count(self.s),
            to_count(self.i),
            to_count(self.r),
            to_count(self.d),
            to_count(self.h),
        )
    }
}

fn to_count(x: f64) -> u64 {
    if x.is_finite() && x > 0.0 { x.round() as u64 } else { 0 }
}

/// Full continuous path, `num_days + 1` entries.
fn integrate(
    susceptible: u64, infected: u64, recovered: u64, dead: u64, params: &ModelParameters,
    num_days: usize,
) -> Vec<Compartments> {
    let initial = Compartments {
        s: susceptible as f64,
        i: infected as f64,
        r: recovered as f64,
        d: dead as f64,
        h: params.hospitalization_rate * infected as f64,
    };
    let population = initial.s + initial.i + initial.r + initial.d;

    let normal_death_rate = if dead > 0 && infected > 0 {
        dead as f64 / infected as f64
    } else {
        params.normal_death_rate
    };

    let mut path = Vec::with_capacity(num_days + 1);
    path.push(initial);
    let mut current = initial;
    for _ in 0..num_days {
        current = step(&current, params, normal_death_rate, population);
        path.push(current);
    }
    path
}

/// One day forward from `prev`.
fn step(
    prev: &Compartments, params: &ModelParameters, normal_death_rate: f64, population: f64,
) -> Compartments {
    let underserved = if prev.i > 0.0 {
        (prev.h - params.hospital_capacity).max(0.0) / prev.i
    } else {
        0.0
    };
    let weighted_death_rate =
        normal_death_rate * (1.0 - underserved) + params.critical_death_rate * underserved;

    let new_infections = if population > 0.0 {
        params.effective_infection_rate() * prev.i * prev.s / population
    } else {
        0.0
    };

    let s = (prev.s - new_infections).max(0.0);
    let i = (prev.i + new_infections - (weighted_death_rate + params.recovery_rate) * prev.i)
        .max(0.0);
    let r = (prev.r + params.recovery_rate * prev.i).max(0.0);
    let d = (prev.d + weighted_death_rate * prev.i).max(0.0);
    let h = params.hospitalization_rate * i;

    Compartments { s, i, r, d, h }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EpidemiologyConfig;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Early exponential growth from a single seed case.
    // - Zero-population and zero-infected guards.
    // - Death-rate recalibration from an observed initial death count.
    // - Trimming of settled tails, including the cap.
    //
    // They intentionally DO NOT cover:
    // - Random-input monotonicity (see tests/property_simulator.rs).
    // -------------------------------------------------------------------------

    fn default_params(capacity: f64) -> ModelParameters {
        ModelParameters::from_config(&EpidemiologyConfig::default(), 15.0, capacity, 0.0108866)
    }

    #[test]
    // Purpose
    // -------
    // A single seed case in a fully susceptible population grows.
    //
    // Given
    // -----
    // - `S = 999, I = 1`, default rates, 30 days.
    //
    // Expect
    // ------
    // - 31 rows; continuous infected strictly increases every day;
    //   stored infected is non-decreasing and ends above 1.
    fn seed_case_grows_in_susceptible_population() {
        // Arrange
        let params = default_params(1_000.0);

        // Act
        let path = integrate(999, 1, 0, 0, &params, 30);
        let trajectory = simulate(999, 1, 0, 0, &params, 30);

        // Assert
        assert_eq!(trajectory.len(), 31);
        assert_eq!(trajectory.initial().map(|s| s.infected), Some(1));
        assert!(path.windows(2).all(|w| w[1].i > w[0].i));
        let infected = trajectory.infected();
        assert!(infected.windows(2).all(|w| w[1] >= w[0]));
        assert!(infected[30] > 1);
        for state in &trajectory {
            assert_eq!(state.total_cases, state.infected + state.recovered + state.dead);
        }
    }

    #[test]
    // Purpose
    // -------
    // Division guards keep every value finite.
    //
    // Given
    // -----
    // - An empty population; a population without infections.
    //
    // Expect
    // ------
    // - All-zero rows for the first; a constant susceptible stock for the
    //   second.
    fn zero_population_and_zero_infected_are_guarded() {
        // Arrange
        let params = default_params(0.0);

        // Act
        let empty = integrate(0, 0, 0, 0, &params, 5);
        let uninfected = simulate_with_policy(500, 0, 0, 0, &params, 5, TruncationPolicy::disabled());

        // Assert
        assert!(empty.iter().all(|c| c.s == 0.0 && c.i == 0.0 && c.d == 0.0 && c.h == 0.0));
        assert_eq!(uninfected.len(), 6);
        assert!(uninfected.states().iter().all(|s| s.susceptible == 500 && s.infected == 0));
    }

    #[test]
    // Purpose
    // -------
    // An observed death count overrides the configured normal death rate.
    //
    // Given
    // -----
    // - `I = 100, D = 10`, no transmission, no recovery, ample capacity.
    //
    // Expect
    // ------
    // - Day-1 deaths `10 + 0.1 × 100 = 20`, infected `100 - 10 = 90`.
    fn initial_deaths_recalibrate_normal_rate() {
        // Arrange
        let params = ModelParameters::new(0.0, 0.0, 0.0, 0.001, 0.5, 0.0, 1e9);

        // Act
        let trajectory = simulate_with_policy(0, 100, 0, 10, &params, 1, TruncationPolicy::disabled());

        // Assert
        let day1 = trajectory.day(1).copied().expect("value should be present");
        assert_eq!(day1.dead, 20);
        assert_eq!(day1.infected, 90);
    }

    #[test]
    // Purpose
    // -------
    // Capacity overflow shifts deaths to the critical rate.
    //
    // Given
    // -----
    // - `I = 1000`, every case hospitalized, no transmission or recovery,
    //   normal rate 0, critical rate 0.5; capacities 0 and 1000.
    //
    // Expect
    // ------
    // - Day-1 deaths 500 without beds, 0 with enough beds.
    fn overflow_applies_critical_death_rate() {
        // Arrange
        let no_beds = ModelParameters::new(0.0, 0.0, 0.0, 0.0, 0.5, 1.0, 0.0);
        let beds = ModelParameters { hospital_capacity: 1000.0, ..no_beds };

        // Act
        let overflow = simulate_with_policy(0, 1000, 0, 0, &no_beds, 1, TruncationPolicy::disabled());
        let served = simulate_with_policy(0, 1000, 0, 0, &beds, 1, TruncationPolicy::disabled());

        // Assert
        assert_eq!(overflow.day(1).map(|s| s.dead), Some(500));
        assert_eq!(served.day(1).map(|s| s.dead), Some(0));
        assert_eq!(overflow.day(0).map(|s| s.hospitalized), Some(1000));
    }

    #[test]
    // Purpose
    // -------
    // A resolved epidemic keeps exactly one settled day.
    //
    // Given
    // -----
    // - `I = 10`, recovery rate 1, no transmission, 50 days.
    //
    // Expect
    // ------
    // - Infected 10, 0, 0; three rows remain.
    fn settled_tail_is_trimmed_to_one_buffer_day() {
        // Arrange
        let params = ModelParameters::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);

        // Act
        let trajectory = simulate(0, 10, 0, 0, &params, 50);

        // Assert
        assert_eq!(trajectory.infected(), vec![10, 0, 0]);
        assert_eq!(trajectory.last().map(|s| s.recovered), Some(10));
    }

    #[test]
    // Purpose
    // -------
    // Trimming never removes more than the policy cap.
    //
    // Given
    // -----
    // - The resolved epidemic above over 2000 days.
    //
    // Expect
    // ------
    // - `2001 - 1023` rows remain.
    fn trimming_is_capped() {
        // Arrange
        let params = ModelParameters::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0);

        // Act
        let trajectory = simulate(0, 10, 0, 0, &params, 2000);

        // Assert
        assert_eq!(TruncationPolicy::default().max_trim_days, 1023);
        assert_eq!(trajectory.len(), 2001 - 1023);
    }

    #[test]
    // Purpose
    // -------
    // Zero steps and an immediately flat run keep the minimum rows.
    //
    // Given
    // -----
    // - `num_days = 0`; a run with nothing infected over 1 day.
    //
    // Expect
    // ------
    // - One row; two rows.
    fn minimum_lengths_are_preserved() {
        // Arrange
        let params = default_params(10.0);

        // Act
        let zero_days = simulate(100, 1, 0, 0, &params, 0);
        let flat = simulate(100, 0, 0, 0, &params, 1);

        // Assert
        assert_eq!(zero_days.len(), 1);
        assert_eq!(flat.len(), 2);
    }
}
