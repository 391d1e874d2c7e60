//! Forecast inputs and outputs: the historical series, model variants, and
//! the date-indexed forecast rows shared by models, the ensembler, and the
//! artifact cache.
use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::forecast::errors::{ForecastError, ForecastResult};

/// Target scale a model is fitted on.
///
/// `Log` fits `ln(y)` and exponentiates predictions; non-positive
/// observations become non-finite and are dropped before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    Log,
    Linear,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 2] = [ModelVariant::Log, ModelVariant::Linear];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Log => "log",
            ModelVariant::Linear => "linear",
        }
    }

    /// Map an observation onto the fitting scale.
    pub fn transform(&self, value: f64) -> f64 {
        match self {
            ModelVariant::Log => value.ln(),
            ModelVariant::Linear => value,
        }
    }

    /// Map a fitted-scale value back onto counts.
    pub fn inverse(&self, value: f64) -> f64 {
        match self {
            ModelVariant::Log => value.exp(),
            ModelVariant::Linear => value,
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log" => Ok(ModelVariant::Log),
            "linear" => Ok(ModelVariant::Linear),
            _ => Err(ForecastError::InvalidOption {
                name: "variant",
                reason: format!("'{s}' is neither 'log' nor 'linear'"),
            }),
        }
    }
}

/// Daily cumulative counts for one entity, dates strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl HistoricalSeries {
    /// Validate `(date, value)` pairs.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::EmptySeries`] for no rows.
    /// - [`ForecastError::UnsortedDates`] at the first non-increasing date.
    ///
    /// Notes
    /// -----
    /// - Values are not checked here; non-finite values are dropped during
    ///   fitting.
    pub fn new(points: Vec<(NaiveDate, f64)>) -> ForecastResult<Self> {
        if points.is_empty() {
            return Err(ForecastError::EmptySeries);
        }
        if let Some(index) = points.windows(2).position(|w| w[1].0 <= w[0].0) {
            return Err(ForecastError::UnsortedDates { index: index + 1 });
        }
        let (dates, values) = points.into_iter().unzip();
        Ok(Self { dates, values })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last observed date. Series are never empty.
    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// One forecast row on the count scale.
///
/// Historical rows carry `lower == point == upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    #[serde(rename = "confirmed")]
    pub point: i64,
    #[serde(rename = "lower_bound")]
    pub lower: i64,
    #[serde(rename = "upper_bound")]
    pub upper: i64,
}

impl ForecastRow {
    pub fn new(date: NaiveDate, point: i64, lower: i64, upper: i64) -> Self {
        Self { date, point, lower, upper }
    }

    /// A row with a collapsed interval.
    pub fn observed(date: NaiveDate, value: i64) -> Self {
        Self { date, point: value, lower: value, upper: value }
    }
}

/// Date-ordered forecast rows: history first, then the future horizon.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForecastSeries {
    rows: Vec<ForecastRow>,
}

impl ForecastSeries {
    /// Wrap rows whose dates strictly increase.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::UnsortedDates`] at the first violation.
    pub fn new(rows: Vec<ForecastRow>) -> ForecastResult<Self> {
        if let Some(index) = rows.windows(2).position(|w| w[1].date <= w[0].date) {
            return Err(ForecastError::UnsortedDates { index: index + 1 });
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    /// Row for `date`, located by binary search.
    pub fn get(&self, date: NaiveDate) -> Option<&ForecastRow> {
        self.rows.binary_search_by_key(&date, |r| r.date).ok().map(|i| &self.rows[i])
    }

    /// Rows dated strictly after `date`.
    pub fn after(&self, date: NaiveDate) -> &[ForecastRow] {
        let start = self.rows.partition_point(|r| r.date <= date);
        &self.rows[start..]
    }

    pub fn into_rows(self) -> Vec<ForecastRow> {
        self.rows
    }
}
