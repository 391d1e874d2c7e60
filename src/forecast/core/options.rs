//! Forecaster options: horizon, interval, trend flexibility, penalties, and
//! the optimizer configuration used to fit them.
use crate::{
    config::ForecastConfig,
    forecast::errors::{ForecastError, ForecastResult},
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
};

/// Validated settings for [`AdditiveModel`](crate::forecast::models::additive::AdditiveModel).
///
/// - `horizon_days`: future rows appended after the history (≥ 1).
/// - `interval_width`: central coverage of the prediction interval, in `(0, 1)`.
/// - `n_changepoints`, `changepoint_range`: trend flexibility; changepoints
///   are spread over the first `changepoint_range` share of the history.
/// - `seasonality_order`: weekly Fourier order, 0 to disable.
/// - `changepoint_penalty`, `seasonality_penalty`: ridge weights on the
///   changepoint and Fourier coefficients.
/// - `mle`: L-BFGS settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOptions {
    pub horizon_days: usize,
    pub interval_width: f64,
    pub n_changepoints: usize,
    pub changepoint_range: f64,
    pub seasonality_order: usize,
    pub changepoint_penalty: f64,
    pub seasonality_penalty: f64,
    pub mle: MLEOptions,
}

impl ForecastOptions {
    /// Validate every field.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::InvalidHorizon`] for a zero horizon.
    /// - [`ForecastError::InvalidIntervalWidth`] outside `(0, 1)`.
    /// - [`ForecastError::InvalidOption`] for a changepoint range outside
    ///   `(0, 1]` or a negative/non-finite penalty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        horizon_days: usize, interval_width: f64, n_changepoints: usize, changepoint_range: f64,
        seasonality_order: usize, changepoint_penalty: f64, seasonality_penalty: f64,
        mle: MLEOptions,
    ) -> ForecastResult<Self> {
        if horizon_days == 0 {
            return Err(ForecastError::InvalidHorizon { horizon: horizon_days });
        }
        if !(interval_width > 0.0 && interval_width < 1.0) {
            return Err(ForecastError::InvalidIntervalWidth { width: interval_width });
        }
        if !(changepoint_range > 0.0 && changepoint_range <= 1.0) {
            return Err(ForecastError::InvalidOption {
                name: "changepoint_range",
                reason: format!("{changepoint_range} must lie in (0, 1]"),
            });
        }
        for (name, value) in [
            ("changepoint_penalty", changepoint_penalty),
            ("seasonality_penalty", seasonality_penalty),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ForecastError::InvalidOption {
                    name,
                    reason: format!("{value} must be finite and non-negative"),
                });
            }
        }
        Ok(Self {
            horizon_days,
            interval_width,
            n_changepoints,
            changepoint_range,
            seasonality_order,
            changepoint_penalty,
            seasonality_penalty,
            mle,
        })
    }

    /// Build options from the `[forecast]` configuration section.
    ///
    /// Errors
    /// ------
    /// - Validation errors from [`ForecastOptions::new`].
    /// - Tolerance or line-search errors, as
    ///   [`ForecastError::OptimizationFailed`].
    pub fn from_config(cfg: &ForecastConfig) -> ForecastResult<Self> {
        let tols = Tolerances::new(Some(cfg.tol_grad), Some(cfg.tol_cost), Some(cfg.max_iter))?;
        let line_searcher: LineSearcher = cfg.line_search.parse()?;
        let mle = MLEOptions::new(tols, line_searcher, None)?;
        Self::new(
            cfg.horizon_days,
            cfg.interval_width,
            cfg.n_changepoints,
            cfg.changepoint_range,
            cfg.seasonality_order,
            cfg.changepoint_penalty,
            cfg.seasonality_penalty,
            mle,
        )
    }

    /// Same options with a different horizon.
    pub fn with_horizon(&self, horizon_days: usize) -> ForecastResult<Self> {
        if horizon_days == 0 {
            return Err(ForecastError::InvalidHorizon { horizon: horizon_days });
        }
        Ok(Self { horizon_days, ..self.clone() })
    }
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            horizon_days: 7,
            interval_width: 0.95,
            n_changepoints: 25,
            changepoint_range: 0.8,
            seasonality_order: 3,
            changepoint_penalty: 10.0,
            seasonality_penalty: 0.01,
            mle: MLEOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Configuration defaults and `Default` agree.
    //
    // Given
    // -----
    // - `ForecastConfig::default()`.
    //
    // Expect
    // ------
    // - Equal option sets.
    fn config_defaults_match_default_options() {
        // Arrange
        let cfg = ForecastConfig::default();

        // Act
        let opts = ForecastOptions::from_config(&cfg).expect("ForecastOptions should be valid");

        // Assert
        assert_eq!(opts, ForecastOptions::default());
    }

    #[test]
    // Purpose
    // -------
    // Invalid horizons, widths, and line searches are rejected.
    //
    // Given
    // -----
    // - Horizon 0; width 1.0; line search "Armijo".
    //
    // Expect
    // ------
    // - `InvalidHorizon`, `InvalidIntervalWidth`, `OptimizationFailed`.
    fn invalid_settings_are_rejected() {
        // Arrange
        let base = ForecastConfig::default();
        let zero = ForecastConfig { horizon_days: 0, ..base.clone() };
        let wide = ForecastConfig { interval_width: 1.0, ..base.clone() };
        let armijo = ForecastConfig { line_search: "Armijo".into(), ..base };

        // Act / Assert
        assert_eq!(
            ForecastOptions::from_config(&zero),
            Err(ForecastError::InvalidHorizon { horizon: 0 })
        );
        assert_eq!(
            ForecastOptions::from_config(&wide),
            Err(ForecastError::InvalidIntervalWidth { width: 1.0 })
        );
        assert!(matches!(
            ForecastOptions::from_config(&armijo),
            Err(ForecastError::OptimizationFailed { .. })
        ));
        assert!(ForecastOptions::default().with_horizon(0).is_err());
    }
}
