//! data — historical data snapshots and the providers that produce them.
//!
//! The forecast cache asks a [`HistoricalDataProvider`] for a fresh
//! [`DataSnapshot`] on every rebuild. The snapshot timestamp records when
//! the data was produced; artifacts are stamped with the cache clock instead.

pub mod errors;
pub mod provider;
pub mod snapshot;

pub use self::errors::{DataError, DataResult};
pub use self::provider::{CsvHistoryProvider, HistoricalDataProvider, StaticProvider};
pub use self::snapshot::{DataSnapshot, LatestCounts, RegionRecord};
