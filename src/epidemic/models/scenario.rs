//! epidemic::models::scenario — regional projections assembled for the
//! presentation layer.
//!
//! Purpose
//! -------
//! Turn a region's latest reported counts into a simulator run and summarize
//! its healthcare impact: reported cases are scaled up to estimated true
//! infections, the susceptible stock is what remains of the population, and
//! the final deaths and recoveries are stratified by age.
//!
//! Key behaviors
//! -------------
//! - [`TrueCasesEstimator`] divides diagnosed counts by the reporting rate.
//! - [`project_region`] seeds [`simulate_with_policy`] from [`LatestCounts`].
//! - [`HealthcareImpact`] summarizes peak demand against bed capacity.
//! - [`RegionOutlook::build`] runs all of the above for one named region.
//!
//! Conventions
//! -----------
//! - This is the only epidemic module that logs; projections are reported
//!   at `info` level.
use tracing::info;

use crate::{
    config::ProjectionConfig,
    data::LatestCounts,
    epidemic::{
        core::{AgeDistribution, ModelParameters, SimulationTrajectory},
        errors::{EpidemicError, EpidemicResult},
        models::{
            simulator::{TruncationPolicy, simulate_with_policy},
            stratifier::{CohortOutcome, stratify},
        },
    },
};

/// Scales diagnosed case counts to estimated true infections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrueCasesEstimator {
    /// Share of true infections that get diagnosed.
    pub reporting_rate: f64,
}

impl TrueCasesEstimator {
    pub fn new(reporting_rate: f64) -> Self {
        Self { reporting_rate }
    }

    /// `round(diagnosed / reporting_rate)`; 0 for a non-positive rate.
    pub fn estimate(&self, diagnosed: u64) -> u64 {
        if !(self.reporting_rate.is_finite() && self.reporting_rate > 0.0) {
            return 0;
        }
        let estimate = diagnosed as f64 / self.reporting_rate;
        if estimate.is_finite() { estimate.round() as u64 } else { 0 }
    }
}

/// Simulate a region forward from its latest reported counts.
///
/// Infected is the estimated true case count; susceptible is
/// `population - infected - recovered - deaths`, floored at 0.
pub fn project_region(
    latest: &LatestCounts, params: &ModelParameters, num_days: usize,
    estimator: &TrueCasesEstimator, policy: TruncationPolicy,
) -> SimulationTrajectory {
    let infected = estimator.estimate(latest.confirmed);
    let susceptible = latest
        .population
        .saturating_sub(infected)
        .saturating_sub(latest.recovered)
        .saturating_sub(latest.deaths);
    simulate_with_policy(
        susceptible,
        infected,
        latest.recovered,
        latest.deaths,
        params,
        num_days,
        policy,
    )
}

/// Hospital demand summary of one trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthcareImpact {
    pub peak_hospitalized: u64,
    pub peak_day: usize,
    pub hospital_beds: u64,
    /// Percentage of peak demand without a bed, in `[0, 100]`.
    pub unmet_demand_pct: f64,
    pub final_dead: u64,
    pub final_recovered: u64,
}

impl HealthcareImpact {
    /// Summarize `trajectory` against `hospital_beds`.
    ///
    /// Notes
    /// -----
    /// - The peak is the first day with the highest hospitalized count.
    /// - An empty trajectory yields an all-zero summary.
    pub fn from_trajectory(trajectory: &SimulationTrajectory, hospital_beds: u64) -> Self {
        let (peak_day, peak_hospitalized) = trajectory.peak_hospitalized().unwrap_or((0, 0));
        let unmet_demand_pct = if peak_hospitalized == 0 {
            0.0
        } else {
            100.0 - (100.0 * hospital_beds as f64 / peak_hospitalized as f64).min(100.0)
        };
        let last = trajectory.last().copied().unwrap_or_default();
        Self {
            peak_hospitalized,
            peak_day,
            hospital_beds,
            unmet_demand_pct,
            final_dead: last.dead,
            final_recovered: last.recovered,
        }
    }

    /// Whether peak demand was strictly above the bed count.
    pub fn exceeds_capacity(&self) -> bool {
        self.peak_hospitalized > self.hospital_beds
    }
}

/// `P(infected | asymptomatic)` by Bayes' rule.
///
/// With prior `p = infected / population` and `a = P(asymptomatic | infected)`,
/// and assuming every uninfected person is asymptomatic:
/// `p·a / (a·p + (1 - p))`. Returns 0 for an empty population.
pub fn probability_infected_given_asymptomatic(
    population: u64, infected: u64, asymptomatic_ratio: f64,
) -> f64 {
    if population == 0 {
        return 0.0;
    }
    let p = (infected as f64 / population as f64).min(1.0);
    let denominator = asymptomatic_ratio * p + (1.0 - p);
    if denominator > 0.0 { p * asymptomatic_ratio / denominator } else { 0.0 }
}

/// Everything the presentation layer shows for one region and contact rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionOutlook {
    pub region: String,
    pub contact_rate: f64,
    pub trajectory: SimulationTrajectory,
    pub impact: HealthcareImpact,
    pub by_age: Vec<CohortOutcome>,
    pub probability_infected_if_asymptomatic: f64,
}

impl RegionOutlook {
    /// Project `region` under `contact_rate` for `num_days`.
    ///
    /// Parameters
    /// ----------
    /// - `config`: disease constants, age table, trimming policy.
    /// - `region`: region name; `latest` supplies its current counts. When
    ///   `latest.hospital_beds` is 0 the configured region capacity is used.
    /// - `contact_rate`: must lie within the configured contact-rate bounds.
    ///
    /// Errors
    /// ------
    /// - [`EpidemicError::UnknownRegion`] if `region` is not configured.
    /// - [`EpidemicError::InvalidContactRate`] for an out-of-bounds rate.
    /// - Age-table validation errors from [`AgeDistribution::from_config`].
    pub fn build(
        config: &ProjectionConfig, region: &str, latest: &LatestCounts, contact_rate: f64,
        num_days: usize,
    ) -> EpidemicResult<Self> {
        let epi = &config.epidemiology;
        let region_cfg = config
            .region(region)
            .ok_or_else(|| EpidemicError::UnknownRegion { name: region.to_string() })?;
        if !(contact_rate >= epi.min_contact_rate && contact_rate <= epi.max_contact_rate) {
            return Err(EpidemicError::InvalidContactRate {
                value: contact_rate,
                min: epi.min_contact_rate,
                max: epi.max_contact_rate,
            });
        }

        let ages = AgeDistribution::from_config(&config.age_groups)?;
        let mut latest = *latest;
        if latest.hospital_beds == 0 {
            latest.hospital_beds = region_cfg.hospital_beds;
        }
        if latest.population == 0 {
            latest.population = region_cfg.population;
        }

        let params = ModelParameters::from_config(
            epi,
            contact_rate,
            latest.hospital_beds as f64,
            ages.baseline_mortality(),
        );
        let estimator = TrueCasesEstimator::new(epi.reporting_rate);
        let policy = TruncationPolicy::from_config(&config.simulation);

        let trajectory = project_region(&latest, &params, num_days, &estimator, policy);
        let impact = HealthcareImpact::from_trajectory(&trajectory, latest.hospital_beds);
        let by_age = stratify(impact.final_dead, impact.final_recovered, &ages);
        let probability = probability_infected_given_asymptomatic(
            latest.population,
            estimator.estimate(latest.confirmed),
            epi.asymptomatic_rate,
        );

        info!(
            region,
            contact_rate,
            days = trajectory.len(),
            peak_hospitalized = impact.peak_hospitalized,
            peak_day = impact.peak_day,
            beds = impact.hospital_beds,
            final_dead = impact.final_dead,
            "projected region outlook"
        );

        Ok(Self {
            region: region.to_string(),
            contact_rate,
            trajectory,
            impact,
            by_age,
            probability_infected_if_asymptomatic: probability,
        })
    }
}
