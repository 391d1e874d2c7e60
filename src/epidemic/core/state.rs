//! Stored simulator output: per-day compartment snapshots and the
//! trajectory that owns them.
//!
//! Snapshots hold counts rounded from the continuous simulation. Because
//! each compartment is rounded independently, `S + I + R + D` only tracks the
//! initial population approximately.

use serde::{Deserialize, Serialize};

/// One day of the simulation, rounded to whole people.
///
/// `total_cases` is always `infected + recovered + dead` of the same row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompartmentState {
    pub susceptible: u64,
    pub infected: u64,
    pub recovered: u64,
    pub dead: u64,
    pub hospitalized: u64,
    pub total_cases: u64,
}

impl CompartmentState {
    /// Build a row from its stocks; `total_cases` is derived.
    pub fn new(susceptible: u64, infected: u64, recovered: u64, dead: u64, hospitalized: u64) -> Self {
        Self {
            susceptible,
            infected,
            recovered,
            dead,
            hospitalized,
            total_cases: infected.saturating_add(recovered).saturating_add(dead),
        }
    }

    /// `S + I + R + D` of this row.
    pub fn population(&self) -> u64 {
        self.susceptible
            .saturating_add(self.infected)
            .saturating_add(self.recovered)
            .saturating_add(self.dead)
    }
}

/// Day-indexed simulator output. Index 0 is the initial state.
///
/// Immutable once produced; callers own it outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationTrajectory {
    states: Vec<CompartmentState>,
}

impl SimulationTrajectory {
    pub(crate) fn from_states(states: Vec<CompartmentState>) -> Self {
        Self { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[CompartmentState] {
        &self.states
    }

    /// Snapshot for `day`, if the trajectory reaches it.
    pub fn day(&self, day: usize) -> Option<&CompartmentState> {
        self.states.get(day)
    }

    pub fn initial(&self) -> Option<&CompartmentState> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&CompartmentState> {
        self.states.last()
    }

    pub fn infected(&self) -> Vec<u64> {
        self.states.iter().map(|s| s.infected).collect()
    }

    pub fn dead(&self) -> Vec<u64> {
        self.states.iter().map(|s| s.dead).collect()
    }

    pub fn hospitalized(&self) -> Vec<u64> {
        self.states.iter().map(|s| s.hospitalized).collect()
    }

    /// `(day, hospitalized)` of the first day with maximal hospital demand.
    pub fn peak_hospitalized(&self) -> Option<(usize, u64)> {
        let mut peak: Option<(usize, u64)> = None;
        for (day, state) in self.states.iter().enumerate() {
            match peak {
                Some((_, best)) if state.hospitalized <= best => {}
                _ => peak = Some((day, state.hospitalized)),
            }
        }
        peak
    }
}

impl<'a> IntoIterator for &'a SimulationTrajectory {
    type Item = &'a CompartmentState;
    type IntoIter = std::slice::Iter<'a, CompartmentState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}
