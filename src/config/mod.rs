//! config — immutable projection configuration, loaded once per run.
//!
//! Purpose
//! -------
//! Replace module-level constant tables with one explicit structure that is
//! parsed at process start and passed by reference into the simulator, the
//! age stratifier, the forecaster, and the artifact cache.
//!
//! Key behaviors
//! -------------
//! - Every section is `#[serde(default)]`, so an empty TOML document yields
//!   the built-in epidemiology constants and reference tables.
//! - [`ProjectionConfig::load`] reads a TOML file, applies `OUTBREAK_*`
//!   environment overrides, and validates the result.
//! - [`ProjectionConfig::validate`] rejects rates outside `[0, 1]`, empty or
//!   malformed age tables, and forecast options the fitter cannot honor.
//!
//! Conventions
//! -----------
//! - Rates are per-day probabilities except the age-table mortality and
//!   hospitalization columns, which are per-case outcomes. Conversion into
//!   per-day simulator rates happens in
//!   [`ModelParameters::from_config`](crate::epidemic::core::params::ModelParameters::from_config).
//! - Environment overrides: `OUTBREAK_ARTIFACT_DIR`,
//!   `OUTBREAK_STALE_AFTER_SECS`, `OUTBREAK_HORIZON_DAYS`.

pub mod errors;
pub mod tables;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::optimization::loglik_optimizer::LineSearcher;

pub use self::errors::{ConfigError, ConfigResult};
pub use self::tables::{AgeGroupConfig, RegionConfig, default_age_groups, default_regions};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub epidemiology: EpidemiologyConfig,
    pub simulation: SimulationConfig,
    pub forecast: ForecastConfig,
    pub cache: CacheConfig,
    pub age_groups: Vec<AgeGroupConfig>,
    pub regions: Vec<RegionConfig>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            epidemiology: EpidemiologyConfig::default(),
            simulation: SimulationConfig::default(),
            forecast: ForecastConfig::default(),
            cache: CacheConfig::default(),
            age_groups: default_age_groups(),
            regions: default_regions(),
        }
    }
}

/// Disease constants shared by every region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemiologyConfig {
    /// Probability that one carrier/susceptible contact transmits.
    pub transmission_rate_per_contact: f64,
    pub default_contact_rate: f64,
    pub min_contact_rate: f64,
    pub max_contact_rate: f64,
    /// Daily recovery probability (inverse infectious period).
    pub recovery_rate: f64,
    /// Case-fatality rate of critically ill patients denied a bed.
    pub critical_death_rate: f64,
    /// Share of true infections that are diagnosed and reported.
    pub reporting_rate: f64,
    /// Share of infections requiring a hospital bed.
    pub hospitalization_rate: f64,
    /// Share of infected people who never show symptoms.
    pub asymptomatic_rate: f64,
}

impl Default for EpidemiologyConfig {
    fn default() -> Self {
        Self {
            transmission_rate_per_contact: 0.018,
            default_contact_rate: 15.0,
            min_contact_rate: 0.0,
            max_contact_rate: 50.0,
            recovery_rate: 0.1,
            critical_death_rate: 0.122,
            reporting_rate: 0.14,
            hospitalization_rate: 0.19 * 0.14,
            asymptomatic_rate: 0.179,
        }
    }
}

/// Simulation window and trajectory trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Long-horizon window, roughly three years.
    pub default_time_scale_days: usize,
    /// Shortest view kept off the long-horizon window when trimming.
    pub min_view_days: usize,
    /// Default number of days projected by scenario runs.
    pub projection_days: usize,
}

impl SimulationConfig {
    /// Upper bound on how many settled trailing days may be trimmed.
    pub fn max_trim_days(&self) -> usize {
        self.default_time_scale_days.saturating_sub(self.min_view_days)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { default_time_scale_days: 12 * 3 * 31, min_view_days: 93, projection_days: 180 }
    }
}

/// Additive forecaster settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon_days: usize,
    pub interval_width: f64,
    pub n_changepoints: usize,
    /// Share of the history (from the start) eligible for changepoints.
    pub changepoint_range: f64,
    /// Weekly Fourier order; 0 disables seasonality.
    pub seasonality_order: usize,
    pub changepoint_penalty: f64,
    pub seasonality_penalty: f64,
    pub max_iter: usize,
    pub tol_grad: f64,
    pub tol_cost: f64,
    pub line_search: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            interval_width: 0.95,
            n_changepoints: 25,
            changepoint_range: 0.8,
            seasonality_order: 3,
            changepoint_penalty: 10.0,
            seasonality_penalty: 0.01,
            max_iter: 300,
            tol_grad: 1e-8,
            tol_cost: 1e-12,
            line_search: "MoreThuente".to_string(),
        }
    }
}

/// Artifact directory and staleness threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub artifact_dir: PathBuf,
    pub stale_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { artifact_dir: PathBuf::from("artifacts"), stale_after_secs: 3600 }
    }
}

impl ProjectionConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        let config: ProjectionConfig = toml::from_str(toml_str).map_err(|e| {
            ConfigError::Parse { path: "<string>".to_string(), message: e.to_string() }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`, apply `OUTBREAK_*` overrides, and validate.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config: ProjectionConfig = toml::from_str(&content).map_err(|e| {
            ConfigError::Parse { path: path.display().to_string(), message: e.to_string() }
        })?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("OUTBREAK_ARTIFACT_DIR") {
            self.cache.artifact_dir = PathBuf::from(dir);
        }
        if let Ok(raw) = std::env::var("OUTBREAK_STALE_AFTER_SECS") {
            match raw.parse() {
                Ok(secs) => self.cache.stale_after_secs = secs,
                Err(_) => warn!(value = %raw, "ignoring unparsable OUTBREAK_STALE_AFTER_SECS"),
            }
        }
        if let Ok(raw) = std::env::var("OUTBREAK_HORIZON_DAYS") {
            match raw.parse() {
                Ok(days) => self.forecast.horizon_days = days,
                Err(_) => warn!(value = %raw, "ignoring unparsable OUTBREAK_HORIZON_DAYS"),
            }
        }
    }

    /// Check every section for values the engine cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        let epi = &self.epidemiology;
        for (field, value) in [
            ("epidemiology.transmission_rate_per_contact", epi.transmission_rate_per_contact),
            ("epidemiology.recovery_rate", epi.recovery_rate),
            ("epidemiology.critical_death_rate", epi.critical_death_rate),
            ("epidemiology.reporting_rate", epi.reporting_rate),
            ("epidemiology.hospitalization_rate", epi.hospitalization_rate),
            ("epidemiology.asymptomatic_rate", epi.asymptomatic_rate),
        ] {
            check_unit_interval(field, value)?;
        }
        if !(epi.min_contact_rate >= 0.0
            && epi.min_contact_rate <= epi.default_contact_rate
            && epi.default_contact_rate <= epi.max_contact_rate
            && epi.max_contact_rate.is_finite())
        {
            return Err(ConfigError::invalid(
                "epidemiology.default_contact_rate",
                "contact rates must satisfy 0 <= min <= default <= max < inf",
            ));
        }

        if self.age_groups.is_empty() {
            return Err(ConfigError::invalid("age_groups", "at least one cohort is required"));
        }
        for (i, group) in self.age_groups.iter().enumerate() {
            check_unit_interval(&format!("age_groups[{i}].proportion"), group.proportion)?;
            check_unit_interval(&format!("age_groups[{i}].mortality"), group.mortality)?;
            check_unit_interval(
                &format!("age_groups[{i}].hospitalization_rate"),
                group.hospitalization_rate,
            )?;
        }

        let fc = &self.forecast;
        if fc.horizon_days == 0 {
            return Err(ConfigError::invalid("forecast.horizon_days", "must be greater than 0"));
        }
        if !(fc.interval_width > 0.0 && fc.interval_width < 1.0) {
            return Err(ConfigError::invalid("forecast.interval_width", "must lie in (0, 1)"));
        }
        if !(fc.changepoint_range > 0.0 && fc.changepoint_range <= 1.0) {
            return Err(ConfigError::invalid("forecast.changepoint_range", "must lie in (0, 1]"));
        }
        for (field, value) in [
            ("forecast.changepoint_penalty", fc.changepoint_penalty),
            ("forecast.seasonality_penalty", fc.seasonality_penalty),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, "must be finite and non-negative"));
            }
        }
        if fc.max_iter == 0 {
            return Err(ConfigError::invalid("forecast.max_iter", "must be greater than 0"));
        }
        for (field, value) in [("forecast.tol_grad", fc.tol_grad), ("forecast.tol_cost", fc.tol_cost)]
        {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, "must be finite and positive"));
            }
        }
        fc.line_search
            .parse::<LineSearcher>()
            .map_err(|e| ConfigError::invalid("forecast.line_search", e.to_string()))?;

        if self.cache.stale_after_secs == 0 {
            return Err(ConfigError::invalid("cache.stale_after_secs", "must be greater than 0"));
        }
        if self.simulation.min_view_days > self.simulation.default_time_scale_days {
            return Err(ConfigError::invalid(
                "simulation.min_view_days",
                "must not exceed simulation.default_time_scale_days",
            ));
        }
        Ok(())
    }

    /// Population-weighted baseline case-fatality rate, `Σ proportion × mortality`.
    pub fn baseline_mortality(&self) -> f64 {
        self.age_groups.iter().map(|g| g.proportion * g.mortality).sum()
    }

    /// Look up a region by exact name.
    pub fn region(&self, name: &str) -> Option<&RegionConfig> {
        self.regions.iter().find(|r| r.name == name)
    }
}

fn check_unit_interval(field: &str, value: f64) -> ConfigResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(field, format!("{value} must lie in [0, 1]")));
    }
    Ok(())
}
