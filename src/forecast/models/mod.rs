//! models — the additive model, ensembling, and per-entity pipelines.

pub mod additive;
pub mod ensemble;
pub mod pipeline;

pub use self::additive::{AdditiveModel, FittedAdditiveModel, MIN_OBSERVATIONS, Prediction};
pub use self::ensemble::ensemble;
pub use self::pipeline::{EntityForecast, FittedPair, fit_and_predict, forecast_entity};
