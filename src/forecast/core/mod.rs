//! core — series types, forecasting options, and the regressor layout.

pub mod design;
pub mod options;
pub mod series;

pub use self::design::{FeatureMap, MIN_SEASONAL_SPAN_DAYS, WEEKLY_PERIOD_DAYS};
pub use self::options::ForecastOptions;
pub use self::series::{ForecastRow, ForecastSeries, HistoricalSeries, ModelVariant};
