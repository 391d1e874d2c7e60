//! forecast — short-horizon case forecasts with a persisted, self-healing
//! cache.
//!
//! Purpose
//! -------
//! Forecast cumulative confirmed cases per entity a few days ahead, with
//! prediction intervals, by averaging a log-scale and a linear-scale fit of
//! the same additive model, and serve those forecasts from disk.
//!
//! Key behaviors
//! -------------
//! - [`AdditiveModel`] fits a changepoint trend with weekly seasonality by
//!   penalized maximum likelihood ([`crate::optimization`]) and derives
//!   intervals from the parameter covariance ([`crate::inference`]).
//! - [`ensemble`] averages the two members over their shared dates.
//! - [`ForecastCache`] rebuilds every entity's artifacts from a
//!   [`crate::data::HistoricalDataProvider`] when they are missing, stale,
//!   or unreadable, retrying a failed read exactly once.
//!
//! Invariants & assumptions
//! ------------------------
//! - Forecast rows are strictly date-ordered; history rows have collapsed
//!   bounds and horizon rows satisfy `lower ≤ point ≤ upper`.
//! - The log member omits history dates whose value is zero, so the
//!   ensemble can be shorter than the linear member.
//!
//! Downstream usage
//! ----------------
//! - Most callers need [`ForecastCache::get_forecast`] only; [`prelude`]
//!   gathers the types it touches.

pub mod cache;
pub mod core;
pub mod errors;
pub mod models;

pub use self::cache::{
    ArtifactKey, ArtifactKind, ArtifactState, ArtifactStore, Clock, FixedClock, ForecastCache,
    FsArtifactStore, MemoryArtifactStore, RebuildReport, SystemClock,
};
pub use self::core::{ForecastOptions, ForecastRow, ForecastSeries, HistoricalSeries, ModelVariant};
pub use self::errors::{ForecastError, ForecastResult};
pub use self::models::{
    AdditiveModel, EntityForecast, FittedAdditiveModel, FittedPair, ensemble, fit_and_predict,
    forecast_entity,
};

pub mod prelude {
    pub use super::cache::{ArtifactState, ForecastCache, FsArtifactStore, SystemClock};
    pub use super::core::{ForecastOptions, ForecastRow, ForecastSeries, HistoricalSeries, ModelVariant};
    pub use super::errors::{ForecastError, ForecastResult};
    pub use super::models::{ensemble, fit_and_predict, forecast_entity};
}
