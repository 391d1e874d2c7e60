//! forecast::models::additive — changepoint trend plus weekly seasonality,
//! fitted by penalized maximum likelihood.
//!
//! Purpose
//! -------
//! Fit one entity's cumulative case history on either the log or the linear
//! scale and project it forward with prediction intervals. This is the
//! single forecasting model behind both ensemble members.
//!
//! Key behaviors
//! -------------
//! - [`AdditiveModel::fit`] transforms the history for the chosen
//!   [`ModelVariant`], drops non-finite values, scales the target by its
//!   largest magnitude, lays out regressors with [`FeatureMap`], and
//!   maximizes a ridge-penalized Gaussian log-likelihood with
//!   [`maximize`] and an analytic gradient.
//! - After the fit, the residual variance uses `SSE / max(n - p, 1)` and the
//!   coefficient uncertainty comes from the pseudo-inverse of the observed
//!   information ([`information_pseudo_inverse`]).
//! - [`FittedAdditiveModel::predict`] returns point and interval values on
//!   the count scale; [`FittedAdditiveModel::forecast`] assembles the full
//!   [`ForecastSeries`] of history rows followed by the horizon.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two finite observations remain after the transform.
//! - Predictive standard deviation is `σ √(1 + xᵀ J⁺ x)` on the scaled
//!   axis; intervals are symmetric there and become asymmetric on the count
//!   scale for the log variant.
//! - Fitted models are plain data (`serde`) and can be persisted and
//!   reloaded without refitting.
//!
//! Conventions
//! -----------
//! - Objective: `ℓ(θ) = -½‖y - Xθ‖² - ½ Σ λ_j θ_j²` on the scaled target.
//! - History rows reproduce the finite observations (back-transformed and
//!   rounded) with collapsed bounds. Horizon rows start the day after the
//!   last date of the input series.
//! - Fitting logs its outcome at `debug` level.
//!
//! Testing notes
//! -------------
//! - Unit tests recover a known line, check interval ordering and width,
//!   exercise the log variant's zero handling, and reload a serialized fit.
use chrono::{Days, NaiveDate};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::{
    forecast::{
        core::{
            design::FeatureMap,
            options::ForecastOptions,
            series::{ForecastRow, ForecastSeries, HistoricalSeries, ModelVariant},
        },
        errors::{ForecastError, ForecastResult},
    },
    inference::covariance::{diagonal_std_errors, information_pseudo_inverse, quadratic_form},
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, Theta, maximize},
    },
};

/// Minimum number of finite observations required to fit.
pub const MIN_OBSERVATIONS: usize = 2;

/// Scaled regression problem handed to the optimizer.
#[derive(Debug, Clone)]
pub struct RegressionData {
    pub design: Array2<f64>,
    pub target: Array1<f64>,
    pub penalty: Array1<f64>,
}

impl RegressionData {
    fn residuals(&self, theta: &Theta) -> Array1<f64> {
        &self.target - &self.design.dot(theta)
    }

    /// `∇ℓ(θ) = Xᵀ r - λ ∘ θ`.
    fn score(&self, theta: &Theta) -> Array1<f64> {
        self.design.t().dot(&self.residuals(theta)) - &(&self.penalty * theta)
    }
}

/// Ridge-penalized Gaussian log-likelihood with unit noise scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct PenalizedLeastSquares;

impl LogLikelihood for PenalizedLeastSquares {
    type Data = RegressionData;

    fn value(&self, theta: &Theta, data: &RegressionData) -> OptResult<f64> {
        let r = data.residuals(theta);
        let ridge = (&data.penalty * theta * theta).sum();
        Ok(-0.5 * r.dot(&r) - 0.5 * ridge)
    }

    fn check(&self, theta: &Theta, data: &RegressionData) -> OptResult<()> {
        let (rows, cols) = data.design.dim();
        if rows != data.target.len() {
            return Err(OptError::DesignShapeMismatch { rows, targets: data.target.len() });
        }
        if theta.len() != cols || data.penalty.len() != cols {
            return Err(OptError::ThetaLengthMismatch { expected: cols, actual: theta.len() });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &RegressionData) -> OptResult<Grad> {
        Ok(data.score(theta))
    }
}

/// Unfitted model: options only.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditiveModel {
    opts: ForecastOptions,
}

impl AdditiveModel {
    pub fn new(opts: ForecastOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.opts
    }

    /// Fit `series` on the scale of `variant`.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::InsufficientHistory`] when fewer than
    ///   [`MIN_OBSERVATIONS`] finite transformed values remain.
    /// - [`ForecastError::OptimizationFailed`] for solver or covariance
    ///   failures.
    /// - [`ForecastError::NonFiniteValue`] if the residual scale is not finite.
    pub fn fit(
        &self, series: &HistoricalSeries, variant: ModelVariant,
    ) -> ForecastResult<FittedAdditiveModel> {
        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = series
            .iter()
            .map(|(d, v)| (d, variant.transform(v)))
            .filter(|(_, v)| v.is_finite())
            .unzip();
        if dates.len() < MIN_OBSERVATIONS {
            return Err(ForecastError::InsufficientHistory {
                needed: MIN_OBSERVATIONS,
                found: dates.len(),
            });
        }

        let y_scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let target = Array1::from_iter(values.iter().map(|v| v / y_scale));

        let features = FeatureMap::layout(&dates, &self.opts);
        let data = RegressionData {
            design: features.design_matrix(&dates),
            target,
            penalty: features.penalties(self.opts.changepoint_penalty, self.opts.seasonality_penalty),
        };

        let mut theta0 = Array1::<f64>::zeros(features.dim());
        theta0[0] = data.target.mean().unwrap_or(0.0);
        let outcome = maximize(&PenalizedLeastSquares, theta0, &data, &self.opts.mle)?;
        let theta = outcome.theta_hat;

        let n = dates.len();
        let p = features.dim();
        let residuals = data.residuals(&theta);
        let sse = residuals.dot(&residuals);
        let sigma = (sse / n.saturating_sub(p).max(1) as f64).sqrt();
        if !sigma.is_finite() {
            return Err(ForecastError::NonFiniteValue { what: "residual scale", value: sigma });
        }

        let neg_score = |th: &Array1<f64>| -data.score(th);
        let param_cov = information_pseudo_inverse(&neg_score, &theta)?;

        let z = standard_normal_quantile(0.5 * (1.0 + self.opts.interval_width))?;
        let max_std_error =
            diagonal_std_errors(&param_cov, sigma).fold(0.0_f64, |acc, &v| acc.max(v));

        debug!(
            %variant,
            observations = n,
            coefficients = p,
            changepoints = features.changepoints.len(),
            status = %outcome.status,
            iterations = outcome.iterations,
            sigma,
            max_std_error,
            "fitted additive model"
        );

        Ok(FittedAdditiveModel {
            variant,
            features,
            y_scale,
            theta: theta.to_vec(),
            sigma,
            param_cov: param_cov.iter().copied().collect(),
            z,
            horizon_days: self.opts.horizon_days,
            history: dates.into_iter().zip(values).collect(),
            last_date: series.last_date(),
        })
    }

    /// Fit and assemble the forecast in one call.
    pub fn fit_and_predict(
        &self, series: &HistoricalSeries, variant: ModelVariant,
    ) -> ForecastResult<ForecastSeries> {
        self.fit(series, variant)?.forecast()
    }
}

fn standard_normal_quantile(p: f64) -> ForecastResult<f64> {
    let normal = Normal::new(0.0, 1.0).map_err(|e| ForecastError::OptimizationFailed {
        status: format!("standard normal unavailable: {e}"),
    })?;
    Ok(normal.inverse_cdf(p))
}

/// Point and interval for one date on the count scale, before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub date: NaiveDate,
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A fitted additive model, serializable as a cache artifact.
///
/// `history` holds the fitted dates with their transformed (unscaled)
/// values. `param_cov` is `J⁺` flattened row-major, `dim × dim`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedAdditiveModel {
    pub variant: ModelVariant,
    pub features: FeatureMap,
    pub y_scale: f64,
    pub theta: Vec<f64>,
    pub sigma: f64,
    pub param_cov: Vec<f64>,
    pub z: f64,
    pub horizon_days: usize,
    pub history: Vec<(NaiveDate, f64)>,
    pub last_date: NaiveDate,
}

impl FittedAdditiveModel {
    fn coefficients(&self) -> ForecastResult<(Array1<f64>, Array2<f64>)> {
        let dim = self.features.dim();
        if self.theta.len() != dim || self.param_cov.len() != dim * dim {
            return Err(ForecastError::ArtifactCorrupt {
                key: String::new(),
                message: format!(
                    "coefficient shapes ({}, {}) do not match feature dimension {dim}",
                    self.theta.len(),
                    self.param_cov.len()
                ),
            });
        }
        let theta = Array1::from(self.theta.clone());
        let cov = Array2::from_shape_vec((dim, dim), self.param_cov.clone()).map_err(|e| {
            ForecastError::ArtifactCorrupt { key: String::new(), message: e.to_string() }
        })?;
        Ok((theta, cov))
    }

    /// Coefficient standard errors on the scaled axis, `σ √diag(J⁺)`, in
    /// feature order.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::ArtifactCorrupt`] if stored shapes are inconsistent.
    pub fn std_errors(&self) -> ForecastResult<Vec<f64>> {
        let (_, cov) = self.coefficients()?;
        Ok(diagonal_std_errors(&cov, self.sigma).to_vec())
    }

    /// Predict `dates` on the count scale.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::ArtifactCorrupt`] if stored shapes are inconsistent.
    /// - [`ForecastError::NonFiniteValue`] if a fitted-scale prediction is
    ///   not finite, or if back-transforming it overflows (the log variant
    ///   far outside the fitted range).
    pub fn predict(&self, dates: &[NaiveDate]) -> ForecastResult<Vec<Prediction>> {
        let (theta, cov) = self.coefficients()?;
        dates
            .iter()
            .map(|&date| {
                let x = self.features.features(date);
                let mean = x.dot(&theta);
                let sd = self.sigma * (1.0 + quadratic_form(&cov, &x).max(0.0)).sqrt();
                let half = self.z * sd;
                if !(mean.is_finite() && half.is_finite()) {
                    return Err(ForecastError::NonFiniteValue { what: "prediction", value: mean });
                }
                let prediction = Prediction {
                    date,
                    point: self.variant.inverse(mean * self.y_scale),
                    lower: self.variant.inverse((mean - half) * self.y_scale),
                    upper: self.variant.inverse((mean + half) * self.y_scale),
                };
                let overflow = [prediction.point, prediction.lower, prediction.upper]
                    .into_iter()
                    .find(|v| !v.is_finite());
                if let Some(value) = overflow {
                    return Err(ForecastError::NonFiniteValue {
                        what: "back-transformed prediction",
                        value,
                    });
                }
                Ok(prediction)
            })
            .collect()
    }

    /// The `horizon_days` consecutive dates after the last input date.
    pub fn future_dates(&self) -> Vec<NaiveDate> {
        (1..=self.horizon_days as u64)
            .filter_map(|i| self.last_date.checked_add_days(Days::new(i)))
            .collect()
    }

    /// History rows with collapsed bounds, then the rounded horizon.
    pub fn forecast(&self) -> ForecastResult<ForecastSeries> {
        let mut rows: Vec<ForecastRow> = self
            .history
            .iter()
            .map(|&(date, value)| ForecastRow::observed(date, round_count(self.variant.inverse(value))))
            .collect();
        for p in self.predict(&self.future_dates())? {
            rows.push(ForecastRow::new(
                p.date,
                round_count(p.point),
                round_count(p.lower),
                round_count(p.upper),
            ));
        }
        ForecastSeries::new(rows)
    }
}

/// Round half away from zero. Callers pass finite values only.
fn round_count(x: f64) -> i64 {
    x.round() as i64
}
