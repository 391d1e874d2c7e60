//! Validated age-cohort table used by the stratifier.
use crate::{
    config::AgeGroupConfig,
    epidemic::errors::{EpidemicError, EpidemicResult},
};

/// One cohort's share of the population and per-case outcome rates.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeCohort {
    pub label: String,
    pub proportion: f64,
    pub mortality: f64,
    pub hospitalization_rate: f64,
}

/// Ordered cohort table with every column checked to be a finite
/// probability.
///
/// Proportions are not required to sum to 1; any shortfall shows up as
/// people the stratifier does not assign to a cohort.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeDistribution {
    cohorts: Vec<AgeCohort>,
}

impl AgeDistribution {
    /// Validate and take ownership of `cohorts`.
    ///
    /// Errors
    /// ------
    /// - [`EpidemicError::EmptyAgeDistribution`] for an empty table.
    /// - [`EpidemicError::InvalidCohort`] for the first NaN/±inf or
    ///   out-of-range entry.
    pub fn new(cohorts: Vec<AgeCohort>) -> EpidemicResult<Self> {
        if cohorts.is_empty() {
            return Err(EpidemicError::EmptyAgeDistribution);
        }
        for (index, cohort) in cohorts.iter().enumerate() {
            for (field, value) in [
                ("proportion", cohort.proportion),
                ("mortality", cohort.mortality),
                ("hospitalization_rate", cohort.hospitalization_rate),
            ] {
                if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                    return Err(EpidemicError::InvalidCohort { index, field, value });
                }
            }
        }
        Ok(Self { cohorts })
    }

    /// Build the cohort table from the configured `[[age_groups]]` rows.
    ///
    /// Parameters
    /// ----------
    /// - `groups`: configured cohorts, in display order.
    ///
    /// Returns
    /// -------
    /// - One [`AgeCohort`] per row, labelled with its `age_group` and in the
    ///   same order.
    ///
    /// Errors
    /// ------
    /// - The same as [`AgeDistribution::new`]: an empty table, or a
    ///   proportion or rate that is not a finite probability.
    pub fn from_config(groups: &[AgeGroupConfig]) -> EpidemicResult<Self> {
        Self::new(
            groups
                .iter()
                .map(|g| AgeCohort {
                    label: g.age_group.clone(),
                    proportion: g.proportion,
                    mortality: g.mortality,
                    hospitalization_rate: g.hospitalization_rate,
                })
                .collect(),
        )
    }

    pub fn cohorts(&self) -> &[AgeCohort] {
        &self.cohorts
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    /// Population-weighted case-fatality rate `Σ proportion × mortality`.
    pub fn baseline_mortality(&self) -> f64 {
        self.cohorts.iter().map(|c| c.proportion * c.mortality).sum()
    }

    /// `Σ proportion`.
    pub fn total_proportion(&self) -> f64 {
        self.cohorts.iter().map(|c| c.proportion).sum()
    }
}
