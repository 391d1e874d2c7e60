//! Regressors of the additive model.
//!
//! Purpose
//! -------
//! Map calendar dates onto the feature vector of a piecewise-linear trend
//! with weekly seasonality, and supply the ridge penalty attached to each
//! coefficient.
//!
//! Key behaviors
//! -------------
//! - [`FeatureMap::layout`] fixes the time origin, time scale, changepoint
//!   locations, and seasonality order from the fitting dates. The layout is
//!   stored with the fitted model so future dates map consistently.
//! - [`FeatureMap::features`] evaluates
//!   `x(d) = [1, t, (t - s_1)_+, …, (t - s_J)_+, sin(2π·1·d/7), cos(2π·1·d/7), …]`
//!   where `t = (d - origin) / span_days` and `d` counts days since origin.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least two strictly increasing dates are given to `layout`.
//! - Changepoints sit on fitting dates within the first `changepoint_range`
//!   share of the history, never on the first date, and are distinct.
//! - Seasonality needs two full weeks of history; shorter spans disable it.
//!
//! Conventions
//! -----------
//! - Coefficient layout: `θ = (m, k, δ_1..δ_J, β_1..β_2K)`.
//! - Offset and slope are unpenalized; changepoint and Fourier blocks carry
//!   their own penalty.
use std::f64::consts::PI;

use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::forecast::core::options::ForecastOptions;

/// Days per seasonal period.
pub const WEEKLY_PERIOD_DAYS: f64 = 7.0;

/// Shortest history span, in days, that enables weekly seasonality.
pub const MIN_SEASONAL_SPAN_DAYS: i64 = 14;

/// Fixed mapping from dates to regressors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMap {
    pub origin: NaiveDate,
    pub span_days: f64,
    /// Changepoint locations on the scaled time axis.
    pub changepoints: Vec<f64>,
    pub seasonality_order: usize,
}

impl FeatureMap {
    /// Lay out regressors for `dates`.
    ///
    /// Parameters
    /// ----------
    /// - `dates`: fitting dates, strictly increasing, at least two.
    /// - `opts`: changepoint count/range and seasonality order.
    ///
    /// Notes
    /// -----
    /// - With `h = floor(n · changepoint_range)` candidate rows, the number of
    ///   changepoints is `min(n_changepoints, h - 1)`, placed at rounded,
    ///   evenly spaced row indices in `[0, h - 1]`, first index excluded.
    pub fn layout(dates: &[NaiveDate], opts: &ForecastOptions) -> Self {
        let origin = dates[0];
        let last = dates[dates.len() - 1];
        let span = (last - origin).num_days();
        let span_days = span.max(1) as f64;

        let map = Self { origin, span_days, changepoints: Vec::new(), seasonality_order: 0 };

        let hist_size = (dates.len() as f64 * opts.changepoint_range).floor() as usize;
        let n_cp = opts.n_changepoints.min(hist_size.saturating_sub(1));
        let changepoints = if n_cp == 0 {
            Vec::new()
        } else {
            let step = (hist_size - 1) as f64 / n_cp as f64;
            (1..=n_cp)
                .map(|j| {
                    let idx = (j as f64 * step).round() as usize;
                    map.scaled_time(dates[idx.min(dates.len() - 1)])
                })
                .collect()
        };

        let seasonality_order =
            if span >= MIN_SEASONAL_SPAN_DAYS { opts.seasonality_order } else { 0 };

        Self { changepoints, seasonality_order, ..map }
    }

    /// Number of coefficients, `2 + J + 2K`.
    pub fn dim(&self) -> usize {
        2 + self.changepoints.len() + 2 * self.seasonality_order
    }

    /// Days since the first fitted date divided by the fitted span, so the
    /// history maps onto `[0, 1]` and the horizon lies beyond 1.
    pub fn scaled_time(&self, date: NaiveDate) -> f64 {
        self.days_since_origin(date) / self.span_days
    }

    fn days_since_origin(&self, date: NaiveDate) -> f64 {
        (date - self.origin).num_days() as f64
    }

    /// Regressor vector for one date.
    pub fn features(&self, date: NaiveDate) -> Array1<f64> {
        let mut x = Array1::<f64>::zeros(self.dim());
        let t = self.scaled_time(date);
        x[0] = 1.0;
        x[1] = t;
        let offset = 2;
        for (j, &s) in self.changepoints.iter().enumerate() {
            x[offset + j] = (t - s).max(0.0);
        }
        let offset = offset + self.changepoints.len();
        let d = self.days_since_origin(date);
        for k in 0..self.seasonality_order {
            let angle = 2.0 * PI * (k + 1) as f64 * d / WEEKLY_PERIOD_DAYS;
            x[offset + 2 * k] = angle.sin();
            x[offset + 2 * k + 1] = angle.cos();
        }
        x
    }

    /// Stack [`features`](Self::features) row-wise.
    pub fn design_matrix(&self, dates: &[NaiveDate]) -> Array2<f64> {
        let mut x = Array2::<f64>::zeros((dates.len(), self.dim()));
        for (i, &date) in dates.iter().enumerate() {
            x.row_mut(i).assign(&self.features(date));
        }
        x
    }

    /// Ridge weight per coefficient: 0 for offset and slope.
    pub fn penalties(&self, changepoint_penalty: f64, seasonality_penalty: f64) -> Array1<f64> {
        let mut lambda = Array1::<f64>::zeros(self.dim());
        let cp_end = 2 + self.changepoints.len();
        lambda.slice_mut(ndarray::s![2..cp_end]).fill(changepoint_penalty);
        lambda.slice_mut(ndarray::s![cp_end..]).fill(seasonality_penalty);
        lambda
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Changepoint placement and the seasonality span threshold.
    // - Feature values for hinge and Fourier terms.
    // - Penalty layout.
    // -------------------------------------------------------------------------

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).expect("date should be valid");
        (0..n).map(|i| start + chrono::Days::new(i as u64)).collect()
    }

    fn opts(n_changepoints: usize, seasonality_order: usize) -> ForecastOptions {
        ForecastOptions { n_changepoints, seasonality_order, ..ForecastOptions::default() }
    }

    #[test]
    // Purpose
    // -------
    // Changepoints are evenly spaced over the first 80% of rows.
    //
    // Given
    // -----
    // - 11 daily dates, 4 requested changepoints, range 0.8.
    //
    // Expect
    // ------
    // - `h = 8`, indices round(7/4 · j) = 2, 4, 5, 7 on `t = i / 10`.
    fn changepoints_are_evenly_spaced() {
        // Arrange
        let ds = dates(11);

        // Act
        let map = FeatureMap::layout(&ds, &opts(4, 3));

        // Assert
        let expected = [0.2, 0.4, 0.5, 0.7];
        assert_eq!(map.changepoints.len(), 4);
        for (got, want) in map.changepoints.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} vs {want}");
        }
        assert_eq!(map.seasonality_order, 0);
        assert_eq!(map.dim(), 6);
    }

    #[test]
    // Purpose
    // -------
    // Short histories get no changepoints and no seasonality.
    //
    // Given
    // -----
    // - Two dates.
    //
    // Expect
    // ------
    // - `dim = 2`, features `[1, t]`.
    fn two_points_give_a_straight_line() {
        // Arrange
        let ds = dates(2);

        // Act
        let map = FeatureMap::layout(&ds, &ForecastOptions::default());
        let x = map.features(ds[1]);

        // Assert
        assert_eq!(map.dim(), 2);
        assert_eq!(x.to_vec(), vec![1.0, 1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Hinge and Fourier regressors evaluate as documented.
    //
    // Given
    // -----
    // - 21 dates (span 20 ≥ 14), 1 changepoint, seasonality order 1.
    //
    // Expect
    // ------
    // - Changepoint at row round(15) → `t = 0.75`; for day 20 the hinge is
    //   `0.25` and the Fourier pair is `(sin, cos)(2π·20/7)`; penalties
    //   `[0, 0, 10, 0.01, 0.01]`.
    fn features_and_penalties_follow_layout() {
        // Arrange
        let ds = dates(21);
        let map = FeatureMap::layout(&ds, &opts(1, 1));

        // Act
        let x = map.features(ds[20]);
        let lambda = map.penalties(10.0, 0.01);
        let design = map.design_matrix(&ds);

        // Assert
        let angle = 2.0 * PI * 20.0 / 7.0;
        assert_eq!(map.changepoints.len(), 1);
        assert!((map.changepoints[0] - 0.75).abs() < 1e-12);
        assert!((x[2] - 0.25).abs() < 1e-12);
        assert!((x[3] - angle.sin()).abs() < 1e-12);
        assert!((x[4] - angle.cos()).abs() < 1e-12);
        assert_eq!(lambda.to_vec(), vec![0.0, 0.0, 10.0, 0.01, 0.01]);
        assert_eq!(design.dim(), (21, 5));
    }
}
