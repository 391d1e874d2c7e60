//! Point-in-time view of the historical data consumed by the forecaster and
//! the scenario projector.
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

/// Most recent cumulative counts for one region plus its static capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatestCounts {
    pub confirmed: u64,
    pub recovered: u64,
    pub deaths: u64,
    pub population: u64,
    pub hospital_beds: u64,
}

/// Confirmed-case history and latest counts of one entity.
///
/// `history` is ordered by date, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionRecord {
    pub history: Vec<(NaiveDate, f64)>,
    pub latest: LatestCounts,
}

/// All entities of one data refresh, stamped with the time the underlying
/// data was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSnapshot {
    pub timestamp: DateTime<Utc>,
    pub regions: BTreeMap<String, RegionRecord>,
}

impl DataSnapshot {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, regions: BTreeMap::new() }
    }

    /// Builder-style insert.
    pub fn with_region(mut self, name: impl Into<String>, record: RegionRecord) -> Self {
        self.regions.insert(name.into(), record);
        self
    }

    /// Entity names in lexicographic order.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn region(&self, name: &str) -> Option<&RegionRecord> {
        self.regions.get(name)
    }
}
