//! Simulator rate parameters.
use crate::{
    config::EpidemiologyConfig,
    epidemic::errors::{EpidemicError, EpidemicResult},
};

/// Immutable per-run rates for [`simulate`](crate::epidemic::models::simulator::simulate).
///
/// All rates are per-day probabilities; `hospital_capacity` is a bed count.
/// Construction through [`ModelParameters::new`] does not validate, since the
/// simulator is total over any finite input. Use [`ModelParameters::validate`]
/// at boundaries where rates come from outside the crate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    pub transmission_rate_per_contact: f64,
    /// Mean daily contacts between one carrier and susceptible people.
    pub contact_rate: f64,
    pub recovery_rate: f64,
    /// Daily death probability of infected people with access to care.
    pub normal_death_rate: f64,
    /// Daily death probability of critically ill people denied a bed.
    pub critical_death_rate: f64,
    pub hospitalization_rate: f64,
    pub hospital_capacity: f64,
}

impl ModelParameters {
    pub fn new(
        transmission_rate_per_contact: f64, contact_rate: f64, recovery_rate: f64,
        normal_death_rate: f64, critical_death_rate: f64, hospitalization_rate: f64,
        hospital_capacity: f64,
    ) -> Self {
        Self {
            transmission_rate_per_contact,
            contact_rate,
            recovery_rate,
            normal_death_rate,
            critical_death_rate,
            hospitalization_rate,
            hospital_capacity,
        }
    }

    /// Derive simulator rates from the configured disease constants.
    ///
    /// Parameters
    /// ----------
    /// - `epi`: disease constants.
    /// - `contact_rate`: scenario contact rate.
    /// - `hospital_capacity`: beds available in the region.
    /// - `baseline_mortality`: population-weighted case-fatality rate, usually
    ///   [`ProjectionConfig::baseline_mortality`](crate::config::ProjectionConfig::baseline_mortality).
    ///
    /// Notes
    /// -----
    /// - Case-fatality rates are per case, not per day. Both are amortized
    ///   over the infectious period by multiplying with `recovery_rate`.
    pub fn from_config(
        epi: &EpidemiologyConfig, contact_rate: f64, hospital_capacity: f64,
        baseline_mortality: f64,
    ) -> Self {
        Self {
            transmission_rate_per_contact: epi.transmission_rate_per_contact,
            contact_rate,
            recovery_rate: epi.recovery_rate,
            normal_death_rate: baseline_mortality * epi.recovery_rate,
            critical_death_rate: epi.critical_death_rate * epi.recovery_rate,
            hospitalization_rate: epi.hospitalization_rate,
            hospital_capacity,
        }
    }

    /// `transmission_rate_per_contact × contact_rate`.
    pub fn effective_infection_rate(&self) -> f64 {
        self.transmission_rate_per_contact * self.contact_rate
    }

    /// Check that every rate is a finite probability and the capacity is a
    /// finite non-negative count.
    ///
    /// Errors
    /// ------
    /// - [`EpidemicError::InvalidRate`] naming the first offending field.
    pub fn validate(&self) -> EpidemicResult<()> {
        for (name, value) in [
            ("transmission_rate_per_contact", self.transmission_rate_per_contact),
            ("recovery_rate", self.recovery_rate),
            ("normal_death_rate", self.normal_death_rate),
            ("critical_death_rate", self.critical_death_rate),
            ("hospitalization_rate", self.hospitalization_rate),
        ] {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(EpidemicError::InvalidRate { name, value });
            }
        }
        if !(self.contact_rate.is_finite() && self.contact_rate >= 0.0) {
            return Err(EpidemicError::InvalidRate { name: "contact_rate", value: self.contact_rate });
        }
        if !(self.hospital_capacity.is_finite() && self.hospital_capacity >= 0.0) {
            return Err(EpidemicError::InvalidRate {
                name: "hospital_capacity",
                value: self.hospital_capacity,
            });
        }
        Ok(())
    }
}
