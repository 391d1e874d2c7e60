//! Per-entity forecasting: fit both variants, predict, and ensemble.
use crate::forecast::{
    core::{
        options::ForecastOptions,
        series::{ForecastSeries, HistoricalSeries, ModelVariant},
    },
    errors::ForecastResult,
    models::{
        additive::{AdditiveModel, FittedAdditiveModel},
        ensemble::ensemble,
    },
};

/// Fit `series` on `variant`'s scale and return history plus
/// `horizon_days` projected rows.
pub fn fit_and_predict(
    series: &HistoricalSeries, horizon_days: usize, variant: ModelVariant, opts: &ForecastOptions,
) -> ForecastResult<ForecastSeries> {
    AdditiveModel::new(opts.with_horizon(horizon_days)?).fit_and_predict(series, variant)
}

/// Both fitted members of one entity's ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedPair {
    pub log: FittedAdditiveModel,
    pub linear: FittedAdditiveModel,
}

impl FittedPair {
    /// Fit the log member, then the linear member, on the same history.
    ///
    /// Errors
    /// ------
    /// - The first member's fitting error; the linear member is not fitted
    ///   when the log member fails.
    pub fn fit(series: &HistoricalSeries, opts: &ForecastOptions) -> ForecastResult<Self> {
        let model = AdditiveModel::new(opts.clone());
        Ok(Self {
            log: model.fit(series, ModelVariant::Log)?,
            linear: model.fit(series, ModelVariant::Linear)?,
        })
    }

    pub fn get(&self, variant: ModelVariant) -> &FittedAdditiveModel {
        match variant {
            ModelVariant::Log => &self.log,
            ModelVariant::Linear => &self.linear,
        }
    }

    /// Forecast both members and ensemble them.
    ///
    /// Errors
    /// ------
    /// - Any member's prediction error, e.g. an overflowing log forecast.
    pub fn forecast(&self) -> ForecastResult<EntityForecast> {
        let log = self.log.forecast()?;
        let linear = self.linear.forecast()?;
        let ensembled = ensemble(&log, &linear);
        Ok(EntityForecast { log, linear, ensembled })
    }
}

/// The three series written per entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityForecast {
    pub log: ForecastSeries,
    pub linear: ForecastSeries,
    pub ensembled: ForecastSeries,
}

/// Fit both variants and ensemble them.
pub fn forecast_entity(
    series: &HistoricalSeries, opts: &ForecastOptions,
) -> ForecastResult<EntityForecast> {
    FittedPair::fit(series, opts)?.forecast()
}
