//! epidemic::models::stratifier — spread aggregate outcomes over age cohorts.
//!
//! The baseline cohort mortality rates describe a health system with free
//! beds. When a projection ends with a higher effective case-fatality rate
//! (capacity overflow), every cohort's mortality is scaled by the same ratio
//! `effective / baseline`. Cohorts are assumed equally likely to be
//! infected; in reality older cohorts need more care and would absorb a
//! larger share of the extra deaths.
use crate::epidemic::core::AgeDistribution;

/// Outcomes assigned to one cohort. Counts are truncated toward zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CohortOutcome {
    pub age_group: String,
    pub infected: u64,
    pub need_hospitalization: u64,
    pub dead: u64,
    pub recovered: u64,
}

/// Distribute `deaths` and `recovered` over the cohorts of `ages`.
///
/// Parameters
/// ----------
/// - `deaths`, `recovered`: projected final outcome totals.
/// - `ages`: cohort table; its proportion-weighted mortality is the baseline.
///
/// Returns
/// -------
/// One row per cohort, in table order:
/// - `infected = trunc(proportion × (deaths + recovered))`
/// - `need_hospitalization = trunc(hospitalization_rate × infected)`
/// - `dead = trunc(mortality × ratio × infected)`
/// - `recovered = infected - dead`, floored at 0
///
/// Notes
/// -----
/// - With no infections at all, or a zero baseline, every row is zero.
/// - `recovered` can only hit the floor when a scaled cohort mortality
///   exceeds 1, which happens for extreme effective rates.
/// - Per-cohort truncation means the dead column sums to `deaths` only up to
///   one person per cohort plus the proportions' deviation from 1.
pub fn stratify(deaths: u64, recovered: u64, ages: &AgeDistribution) -> Vec<CohortOutcome> {
    let total = deaths.saturating_add(recovered);
    let baseline = ages.baseline_mortality();

    if total == 0 || baseline <= 0.0 {
        return ages
            .cohorts()
            .iter()
            .map(|c| CohortOutcome {
                age_group: c.label.clone(),
                infected: 0,
                need_hospitalization: 0,
                dead: 0,
                recovered: 0,
            })
            .collect();
    }

    let total = total as f64;
    let death_increase_ratio = (deaths as f64 / total) / baseline;

    ages.cohorts()
        .iter()
        .map(|cohort| {
            let infected = truncate(cohort.proportion * total);
            let need_hospitalization = truncate(cohort.hospitalization_rate * infected as f64);
            let dead = truncate(cohort.mortality * death_increase_ratio * infected as f64);
            CohortOutcome {
                age_group: cohort.label.clone(),
                infected,
                need_hospitalization,
                dead,
                recovered: infected.saturating_sub(dead),
            }
        })
        .collect()
}

fn truncate(x: f64) -> u64 {
    if x.is_finite() && x > 0.0 { x.trunc() as u64 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::default_age_groups, epidemic::core::AgeCohort};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Dead and infected column sums against the inputs.
    // - Baseline outcomes when the effective rate equals the baseline.
    // - The zero-infection case and the recovered floor.
    // -------------------------------------------------------------------------

    fn defaults() -> AgeDistribution {
        AgeDistribution::from_config(&default_age_groups())
            .expect("AgeDistribution should be valid")
    }

    #[test]
    // Purpose
    // -------
    // Stratified deaths add back up to the input within truncation error.
    //
    // Given
    // -----
    // - `D = 1000, R = 99000`, default cohorts.
    //
    // Expect
    // ------
    // - Σ dead within 9 of 1000; Σ infected within 9 of 100000; cohort
    //   order preserved.
    fn dead_column_sums_to_input_deaths() {
        // Arrange
        let ages = defaults();

        // Act
        let rows = stratify(1_000, 99_000, &ages);

        // Assert
        let dead: u64 = rows.iter().map(|r| r.dead).sum();
        let infected: u64 = rows.iter().map(|r| r.infected).sum();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].age_group, "0-9");
        assert!(dead.abs_diff(1_000) <= 9, "dead = {dead}");
        assert!(infected.abs_diff(100_000) <= 9, "infected = {infected}");
        assert!(rows.iter().all(|r| r.recovered + r.dead == r.infected));
    }

    #[test]
    // Purpose
    // -------
    // With an effective rate equal to the baseline, cohorts keep their own
    // mortality.
    //
    // Given
    // -----
    // - Two cohorts, halves of the population, mortality 0.25 and 0.75
    //   (baseline 0.5); `D = 500, R = 500`.
    //
    // Expect
    // ------
    // - 500 infected each; 125 and 375 dead; hospitalization per cohort rate.
    fn baseline_rate_reproduces_cohort_mortality() {
        // Arrange
        let ages = AgeDistribution::new(vec![
            AgeCohort { label: "young".into(), proportion: 0.5, mortality: 0.25, hospitalization_rate: 0.2 },
            AgeCohort { label: "old".into(), proportion: 0.5, mortality: 0.75, hospitalization_rate: 0.5 },
        ])
        .expect("AgeDistribution should be valid");

        // Act
        let rows = stratify(500, 500, &ages);

        // Assert
        assert_eq!(rows[0].infected, 500);
        assert_eq!(rows[1].infected, 500);
        assert_eq!(rows[0].dead, 125);
        assert_eq!(rows[1].dead, 375);
        assert_eq!(rows[0].need_hospitalization, 100);
        assert_eq!(rows[1].need_hospitalization, 250);
        assert_eq!(rows[1].recovered, 125);
    }

    #[test]
    // Purpose
    // -------
    // No infections yields zero rows instead of a division by zero.
    //
    // Given
    // -----
    // - `D = R = 0`.
    //
    // Expect
    // ------
    // - Nine all-zero rows.
    fn zero_infections_yield_zero_rows() {
        // Arrange
        let ages = defaults();

        // Act
        let rows = stratify(0, 0, &ages);

        // Assert
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.infected == 0 && r.dead == 0 && r.recovered == 0));
    }

    #[test]
    // Purpose
    // -------
    // Extreme scaling cannot underflow the recovered column.
    //
    // Given
    // -----
    // - Only deaths (`R = 0`) with the default table, so the ratio is
    //   `1 / 0.0108866`.
    //
    // Expect
    // ------
    // - The 80+ cohort's scaled mortality exceeds 1; recovered is 0.
    fn recovered_is_floored_at_zero() {
        // Arrange
        let ages = defaults();

        // Act
        let rows = stratify(10_000, 0, &ages);

        // Assert
        let oldest = &rows[8];
        assert!(oldest.dead > oldest.infected);
        assert_eq!(oldest.recovered, 0);
    }
}
