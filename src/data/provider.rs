//! Historical data providers.
//!
//! Purpose
//! -------
//! Supply [`DataSnapshot`]s to the forecast cache and scenario projector.
//! Scraping and ingestion from third-party sources happen outside the crate;
//! providers here only read what those jobs leave behind.
//!
//! Key behaviors
//! -------------
//! - [`StaticProvider`] hands out a clone of an in-memory snapshot; tests and
//!   embedding applications use it to control timestamps.
//! - [`CsvHistoryProvider`] reads a long-format CSV
//!   (`date,entity,confirmed,recovered,deaths`), joins the configured region
//!   table for population and beds, and stamps the snapshot with the file's
//!   modification time.
//!
//! Conventions
//! -----------
//! - Dates are ISO `YYYY-MM-DD`. Rows may appear in any order; histories are
//!   sorted by date and the latest counts come from each entity's last date.
//! - Several rows for the same entity and date (sub-regions reported
//!   separately) are summed into one observation, so every history has
//!   strictly increasing dates.
//! - Entities absent from the region table get zero population and beds.
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::RegionConfig,
    data::{
        errors::{DataError, DataResult},
        snapshot::{DataSnapshot, LatestCounts, RegionRecord},
    },
};

/// Source of historical data snapshots.
pub trait HistoricalDataProvider {
    /// Produce the current snapshot.
    ///
    /// Errors
    /// ------
    /// - [`DataError`] when the source is unreadable or empty.
    fn snapshot(&self) -> DataResult<DataSnapshot>;
}

/// Provider returning a fixed in-memory snapshot.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    snapshot: DataSnapshot,
}

impl StaticProvider {
    pub fn new(snapshot: DataSnapshot) -> Self {
        Self { snapshot }
    }

    /// Swap in a new snapshot, e.g. to simulate a data refresh.
    pub fn replace(&mut self, snapshot: DataSnapshot) {
        self.snapshot = snapshot;
    }

    /// Restamp the held snapshot's data time without touching its regions.
    pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.snapshot.timestamp = timestamp;
    }
}

impl HistoricalDataProvider for StaticProvider {
    fn snapshot(&self) -> DataResult<DataSnapshot> {
        Ok(self.snapshot.clone())
    }
}

#[derive(Debug, Deserialize)]
struct HistoryRow {
    date: NaiveDate,
    entity: String,
    confirmed: f64,
    #[serde(default)]
    recovered: f64,
    #[serde(default)]
    deaths: f64,
}

/// Provider over a long-format history CSV.
#[derive(Debug, Clone)]
pub struct CsvHistoryProvider {
    path: PathBuf,
    regions: Vec<RegionConfig>,
}

impl CsvHistoryProvider {
    /// Provider over the CSV at `path`, joined against `regions` for
    /// population and bed counts. The file is read on every snapshot.
    pub fn new(path: impl Into<PathBuf>, regions: Vec<RegionConfig>) -> Self {
        Self { path: path.into(), regions }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    fn modified_at(&self) -> DataResult<DateTime<Utc>> {
        let io_err = |e: std::io::Error| DataError::Io { path: self.path_str(), message: e.to_string() };
        let modified = std::fs::metadata(&self.path).and_then(|m| m.modified()).map_err(io_err)?;
        Ok(DateTime::<Utc>::from(modified))
    }

    fn read_rows(&self) -> DataResult<Vec<HistoryRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::Io { path: self.path_str(), message: e.to_string() })?;

        let mut rows = Vec::new();
        for result in reader.deserialize::<HistoryRow>() {
            let row = result.map_err(|e| DataError::MalformedRow {
                path: self.path_str(),
                line: e.position().map_or(0, |p| p.line()),
                message: e.to_string(),
            })?;
            rows.push(row);
        }
        Ok(rows)
    }
}

impl HistoricalDataProvider for CsvHistoryProvider {
    fn snapshot(&self) -> DataResult<DataSnapshot> {
        let timestamp = self.modified_at()?;
        let rows = self.read_rows()?;
        if rows.is_empty() {
            return Err(DataError::EmptySource { path: self.path_str() });
        }

        let mut grouped: BTreeMap<String, BTreeMap<NaiveDate, DailyTotals>> = BTreeMap::new();
        for row in rows {
            let day = grouped.entry(row.entity).or_default().entry(row.date).or_default();
            day.confirmed += row.confirmed;
            day.recovered += row.recovered;
            day.deaths += row.deaths;
        }

        let mut snapshot = DataSnapshot::new(timestamp);
        for (entity, days) in grouped {
            let (population, hospital_beds) = self
                .regions
                .iter()
                .find(|r| r.name == entity)
                .map_or((0, 0), |r| (r.population, r.hospital_beds));
            let latest = days
                .values()
                .next_back()
                .map(|d| LatestCounts {
                    confirmed: to_count(d.confirmed),
                    recovered: to_count(d.recovered),
                    deaths: to_count(d.deaths),
                    population,
                    hospital_beds,
                })
                .unwrap_or_default();
            let history = days.iter().map(|(date, d)| (*date, d.confirmed)).collect();
            snapshot.regions.insert(entity, RegionRecord { history, latest });
        }

        debug!(
            path = %self.path.display(),
            entities = snapshot.regions.len(),
            timestamp = %snapshot.timestamp,
            "loaded history snapshot"
        );
        Ok(snapshot)
    }
}

/// Counts of one entity on one date, summed over its source rows.
#[derive(Debug, Default, Clone, Copy)]
struct DailyTotals {
    confirmed: f64,
    recovered: f64,
    deaths: f64,
}

fn to_count(x: f64) -> u64 {
    if x.is_finite() && x > 0.0 { x.round() as u64 } else { 0 }
}
