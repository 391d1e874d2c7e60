//! Artifact naming: `(kind, entity, timestamp)` ↔ file name.
//!
//! - Ensembled predictions: `predictions_{entity}_t_{ts}.csv`
//! - Member predictions: `predictions_{log|linear}_{entity}_t_{ts}.csv`
//! - Fitted models: `model_{log|linear}_{entity}_t_{ts}.json`
//!
//! `ts` is the rebuild timestamp in UTC, formatted `%d-%m-%Y-%H-%M-%S`.
//! Lookups match the exact prefix for the kind and entity, then parse the
//! remainder as a timestamp; keys whose remainder does not parse are
//! ignored. The newest key is chosen by parsed time, not by name.
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use crate::forecast::{
    core::series::ModelVariant,
    errors::{ForecastError, ForecastResult},
};

/// Timestamp layout embedded in artifact names.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y-%H-%M-%S";

/// What an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Ensembled prediction CSV.
    Ensembled,
    /// One member's prediction CSV.
    Member(ModelVariant),
    /// One member's fitted model, JSON.
    Model(ModelVariant),
}

impl ArtifactKind {
    fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Ensembled | ArtifactKind::Member(_) => ".csv",
            ArtifactKind::Model(_) => ".json",
        }
    }

    /// Name prefix shared by every artifact of this kind for `entity`.
    pub fn prefix(&self, entity: &str) -> String {
        match self {
            ArtifactKind::Ensembled => format!("predictions_{entity}_t_"),
            ArtifactKind::Member(v) => format!("predictions_{v}_{entity}_t_"),
            ArtifactKind::Model(v) => format!("model_{v}_{entity}_t_"),
        }
    }
}

/// Fully qualified artifact name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
    pub kind: ArtifactKind,
    pub entity: String,
    pub timestamp: DateTime<Utc>,
}

impl ArtifactKey {
    /// Validate `entity` and truncate `timestamp` to whole seconds.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::InvalidArtifactKey`] for an empty entity or one
    ///   containing a path separator.
    pub fn new(kind: ArtifactKind, entity: &str, timestamp: DateTime<Utc>) -> ForecastResult<Self> {
        if entity.is_empty() {
            return Err(ForecastError::InvalidArtifactKey {
                key: entity.to_string(),
                reason: "entity name is empty",
            });
        }
        if entity.contains(['/', '\\']) || entity.starts_with('.') {
            return Err(ForecastError::InvalidArtifactKey {
                key: entity.to_string(),
                reason: "entity name must not contain path separators or start with '.'",
            });
        }
        Ok(Self { kind, entity: entity.to_string(), timestamp: truncate_to_seconds(timestamp) })
    }

    /// File name under the artifact root, e.g.
    /// `predictions_log_Victoria_t_20-04-2020-12-00-00.csv`.
    pub fn file_name(&self) -> String {
        format!(
            "{}{}{}",
            self.kind.prefix(&self.entity),
            format_timestamp(self.timestamp),
            self.kind.extension()
        )
    }

    /// Parse `name` as an artifact of `kind` for `entity`.
    pub fn parse(name: &str, kind: ArtifactKind, entity: &str) -> Option<Self> {
        let stamp = name.strip_prefix(&kind.prefix(entity))?.strip_suffix(kind.extension())?;
        let timestamp = parse_timestamp(stamp).ok()?;
        Some(Self { kind, entity: entity.to_string(), timestamp })
    }
}

/// Render `ts` in [`TIMESTAMP_FORMAT`]; sub-second precision is dropped.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a `%d-%m-%Y-%H-%M-%S` stamp as UTC.
///
/// Errors
/// ------
/// - [`ForecastError::InvalidArtifactKey`] if it does not match the layout.
pub fn parse_timestamp(stamp: &str) -> ForecastResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ForecastError::InvalidArtifactKey {
            key: stamp.to_string(),
            reason: "timestamp does not match %d-%m-%Y-%H-%M-%S",
        })
}

/// Newest key of `kind` for `entity` among `names`.
pub fn latest_key<'a, I>(names: I, kind: ArtifactKind, entity: &str) -> Option<ArtifactKey>
where
    I: IntoIterator<Item = &'a String>,
{
    names
        .into_iter()
        .filter_map(|name| ArtifactKey::parse(name, kind, entity))
        .max_by_key(|key| key.timestamp)
}

fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.with_nanosecond(0).unwrap_or(ts)
}
