//! forecast::cache::manager — staleness-driven memoization of entity forecasts.
//!
//! Purpose
//! -------
//! Serve ensembled forecasts from persisted artifacts, rebuilding every
//! entity's models and predictions from a fresh data snapshot when the
//! stored ones are missing, stale, or unreadable.
//!
//! Key behaviors
//! -------------
//! - [`ForecastCache::artifact_state`] classifies an entity as
//!   [`ArtifactState::Absent`], [`ArtifactState::Fresh`], or
//!   [`ArtifactState::Stale`] from the newest ensembled artifact's embedded
//!   rebuild timestamp and the configured threshold.
//! - [`ForecastCache::get_forecast`] rebuilds all entities when the entity is
//!   not fresh, reads the newest artifact, and on a read failure forces one
//!   more full rebuild before giving up with
//!   [`ForecastError::PredictionUnavailable`].
//! - [`ForecastCache::rebuild_all`] runs two sequential passes over the
//!   snapshot: fit-and-persist both members, then reload both members,
//!   predict, ensemble, and persist three prediction CSVs. An entity whose
//!   stored models cannot be reloaded is refitted once in the second pass.
//!
//! Invariants & assumptions
//! ------------------------
//! - Artifacts are stamped with the cache clock's time at the moment the
//!   snapshot is fetched, not with the snapshot's own data time. A rebuild
//!   therefore always yields fresh artifacts, however old the source data.
//! - An artifact stamped later than the rebuild time (clock skew, another
//!   writer) is never shadowed by that rebuild.
//! - Per-entity failures are logged at `warn` and collected in the
//!   [`RebuildReport`]; they never abort sibling entities.
//! - Only provider failures abort a rebuild.
//!
//! Conventions
//! -----------
//! - Single-threaded; the cache owns its provider, store, and clock.
//! - `rebuilds()` counts calls to [`ForecastCache::rebuild_all`], whether
//!   triggered internally or by the caller.
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::{
    config::ProjectionConfig,
    data::{DataSnapshot, HistoricalDataProvider, RegionRecord},
    forecast::{
        cache::{
            clock::Clock,
            codec::{decode_model, decode_series, encode_model, encode_series},
            keys::{ArtifactKey, ArtifactKind, latest_key},
            store::ArtifactStore,
        },
        core::{
            options::ForecastOptions,
            series::{ForecastSeries, HistoricalSeries, ModelVariant},
        },
        errors::{ForecastError, ForecastResult},
        models::pipeline::FittedPair,
    },
};

/// Freshness of an entity's newest ensembled artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Absent,
    Fresh,
    Stale,
}

/// Outcome of one [`ForecastCache::rebuild_all`] pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    pub timestamp: DateTime<Utc>,
    pub succeeded: Vec<String>,
    /// `(entity, error message)` per isolated failure.
    pub failed: Vec<(String, String)>,
}

/// Forecast memoization over a provider, an artifact store, and a clock.
#[derive(Debug)]
pub struct ForecastCache<P, S, C> {
    provider: P,
    store: S,
    clock: C,
    opts: ForecastOptions,
    stale_after: Duration,
    rebuilds: usize,
}

impl<P, S, C> ForecastCache<P, S, C>
where
    P: HistoricalDataProvider,
    S: ArtifactStore,
    C: Clock,
{
    /// Assemble a cache with no rebuilds counted yet.
    ///
    /// `stale_after` is the age beyond which an entity's newest ensembled
    /// artifact no longer counts as fresh.
    pub fn new(provider: P, store: S, clock: C, opts: ForecastOptions, stale_after: Duration) -> Self {
        Self { provider, store, clock, opts, stale_after, rebuilds: 0 }
    }

    /// Build from the `[forecast]` and `[cache]` sections of `cfg`.
    ///
    /// Errors
    /// ------
    /// - Any [`ForecastOptions::from_config`] validation error.
    pub fn from_config(
        provider: P, store: S, clock: C, cfg: &ProjectionConfig,
    ) -> ForecastResult<Self> {
        let opts = ForecastOptions::from_config(&cfg.forecast)?;
        let secs = i64::try_from(cfg.cache.stale_after_secs).unwrap_or(i64::MAX);
        let stale_after = Duration::try_seconds(secs).unwrap_or(Duration::MAX);
        Ok(Self::new(provider, store, clock, opts, stale_after))
    }

    /// Number of `rebuild_all` runs since construction, including forced ones.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn options(&self) -> &ForecastOptions {
        &self.opts
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Newest stored key of `kind` for `entity`.
    ///
    /// Parameters
    /// ----------
    /// - `kind`: the ensembled series, one member series, or one model.
    /// - `entity`: the entity the artifact belongs to.
    ///
    /// Returns
    /// -------
    /// - The key with the latest parsed timestamp, or `None` when nothing of
    ///   that kind is stored. Names that share the prefix but do not parse
    ///   as a key of `kind` are ignored.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::ArtifactIo`] when the store cannot be listed.
    pub fn latest(&self, kind: ArtifactKind, entity: &str) -> ForecastResult<Option<ArtifactKey>> {
        let names = self.store.list_keys(&kind.prefix(entity))?;
        Ok(latest_key(&names, kind, entity))
    }

    /// Freshness of `entity`'s newest ensembled artifact at the clock's now.
    pub fn artifact_state(&self, entity: &str) -> ForecastResult<ArtifactState> {
        let Some(key) = self.latest(ArtifactKind::Ensembled, entity)? else {
            return Ok(ArtifactState::Absent);
        };
        if self.clock.now() - key.timestamp > self.stale_after {
            Ok(ArtifactState::Stale)
        } else {
            Ok(ArtifactState::Fresh)
        }
    }

    /// Read the newest ensembled forecast without rebuilding.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::ArtifactNotFound`] when no artifact exists.
    /// - [`ForecastError::ArtifactIo`] / [`ForecastError::ArtifactCorrupt`]
    ///   when it cannot be read or decoded.
    pub fn read_forecast(&self, entity: &str) -> ForecastResult<ForecastSeries> {
        self.read_series(ArtifactKind::Ensembled, entity)
    }

    /// Read the newest prediction CSV of one ensemble member.
    pub fn read_member(&self, entity: &str, variant: ModelVariant) -> ForecastResult<ForecastSeries> {
        self.read_series(ArtifactKind::Member(variant), entity)
    }

    fn read_series(&self, kind: ArtifactKind, entity: &str) -> ForecastResult<ForecastSeries> {
        let key = self.latest(kind, entity)?.ok_or_else(|| ForecastError::ArtifactNotFound {
            key: kind.prefix(entity),
        })?;
        let name = key.file_name();
        let bytes = self.store.load(&name)?;
        decode_series(&bytes).map_err(|e| e.with_key(&name))
    }

    /// Ensembled forecast for `entity`, rebuilding as needed.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::PredictionUnavailable`] when the artifact is still
    ///   unreadable after one forced rebuild.
    pub fn get_forecast(&mut self, entity: &str) -> ForecastResult<ForecastSeries> {
        let state = self.artifact_state(entity).unwrap_or_else(|e| {
            warn!(entity, error = %e, "could not inspect artifacts; treating as absent");
            ArtifactState::Absent
        });
        if state != ArtifactState::Fresh {
            info!(entity, ?state, "forecast artifacts not fresh; rebuilding");
            if let Err(e) = self.rebuild_all() {
                warn!(entity, error = %e, "rebuild failed; trying stored artifacts");
            }
        }

        match self.read_forecast(entity) {
            Ok(series) => Ok(series),
            Err(first) => {
                warn!(entity, error = %first, "forecast unreadable; forcing rebuild");
                if let Err(e) = self.rebuild_all() {
                    warn!(entity, error = %e, "forced rebuild failed");
                }
                self.read_forecast(entity).map_err(|e| ForecastError::PredictionUnavailable {
                    entity: entity.to_string(),
                    cause: e.to_string(),
                })
            }
        }
    }

    /// Refit and re-persist every entity of a fresh snapshot.
    ///
    /// Returns
    /// -------
    /// A [`RebuildReport`] whose `timestamp` is the clock time at fetch.
    /// Every artifact written in this pass carries it, truncated to seconds.
    ///
    /// Errors
    /// ------
    /// - [`ForecastError::ProviderFailed`] if no snapshot can be obtained.
    ///   Per-entity failures are reported in the returned [`RebuildReport`].
    pub fn rebuild_all(&mut self) -> ForecastResult<RebuildReport> {
        self.rebuilds += 1;
        let snapshot = self.provider.snapshot()?;
        let stamp = self.clock.now();
        info!(
            %stamp,
            data_timestamp = %snapshot.timestamp,
            entities = snapshot.regions.len(),
            "rebuilding forecast artifacts"
        );

        let mut report = RebuildReport {
            timestamp: stamp,
            succeeded: Vec::new(),
            failed: Vec::new(),
        };

        let mut built = Vec::new();
        for (entity, record) in &snapshot.regions {
            match self.build_models(entity, record, stamp) {
                Ok(_) => built.push(entity.as_str()),
                Err(e) => {
                    warn!(entity = entity.as_str(), error = %e, "model build failed");
                    report.failed.push((entity.clone(), e.to_string()));
                }
            }
        }

        for entity in built {
            match self.write_predictions(&snapshot, entity, stamp) {
                Ok(()) => report.succeeded.push(entity.to_string()),
                Err(e) => {
                    warn!(entity, error = %e, "prediction write failed");
                    report.failed.push((entity.to_string(), e.to_string()));
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "forecast rebuild finished"
        );
        Ok(report)
    }

    /// Fit both members for one entity and persist them.
    fn build_models(
        &mut self, entity: &str, record: &RegionRecord, timestamp: DateTime<Utc>,
    ) -> ForecastResult<FittedPair> {
        let series = HistoricalSeries::new(record.history.clone()).map_err(|e| match e {
            ForecastError::EmptySeries => ForecastError::DataUnavailable { entity: entity.to_string() },
            other => other,
        })?;
        let pair = FittedPair::fit(&series, &self.opts)?;
        for variant in ModelVariant::ALL {
            let key = ArtifactKey::new(ArtifactKind::Model(variant), entity, timestamp)?.file_name();
            let bytes = encode_model(pair.get(variant)).map_err(|e| e.with_key(&key))?;
            self.store.save(&key, &bytes)?;
        }
        Ok(pair)
    }

    fn load_models(&self, entity: &str, timestamp: DateTime<Utc>) -> ForecastResult<FittedPair> {
        let load = |variant| -> ForecastResult<_> {
            let key = ArtifactKey::new(ArtifactKind::Model(variant), entity, timestamp)?.file_name();
            let bytes = self.store.load(&key)?;
            decode_model(&bytes).map_err(|e| e.with_key(&key))
        };
        Ok(FittedPair { log: load(ModelVariant::Log)?, linear: load(ModelVariant::Linear)? })
    }

    /// Reload, predict, ensemble, and persist the three prediction CSVs.
    fn write_predictions(
        &mut self, snapshot: &DataSnapshot, entity: &str, timestamp: DateTime<Utc>,
    ) -> ForecastResult<()> {
        let pair = match self.load_models(entity, timestamp) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(entity, error = %e, "stored models unreadable; refitting");
                let record = snapshot
                    .region(entity)
                    .ok_or_else(|| ForecastError::DataUnavailable { entity: entity.to_string() })?;
                self.build_models(entity, record, timestamp)?
            }
        };

        let forecast = pair.forecast()?;
        let outputs = [
            (ArtifactKind::Member(ModelVariant::Log), &forecast.log),
            (ArtifactKind::Member(ModelVariant::Linear), &forecast.linear),
            (ArtifactKind::Ensembled, &forecast.ensembled),
        ];
        for (kind, series) in outputs {
            let key = ArtifactKey::new(kind, entity, timestamp)?.file_name();
            let bytes = encode_series(series).map_err(|e| e.with_key(&key))?;
            self.store.save(&key, &bytes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{LatestCounts, StaticProvider},
        forecast::cache::{clock::FixedClock, store::MemoryArtifactStore},
    };
    use chrono::{Days, NaiveDate, TimeZone};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Absent/fresh/stale classification and the rebuild count it implies.
    // - Isolation of per-entity failures within one rebuild.
    // - Refitting when stored models are corrupt.
    // - Escalation to `PredictionUnavailable` after one forced rebuild.
    //
    // The filesystem store is exercised end to end in the integration tests.
    // -------------------------------------------------------------------------

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 4, 20, 12, 0, 0).single().expect("timestamp should be valid")
    }

    fn record(n: usize) -> RegionRecord {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).expect("date should be valid");
        RegionRecord {
            history: (0..n)
                .map(|i| (start + Days::new(i as u64), 10.0 + 3.0 * i as f64 + (i * i) as f64 * 0.5))
                .collect(),
            latest: LatestCounts::default(),
        }
    }

    fn cache_at(
        snapshot: DataSnapshot, now: DateTime<Utc>,
    ) -> ForecastCache<StaticProvider, MemoryArtifactStore, FixedClock> {
        ForecastCache::new(
            StaticProvider::new(snapshot),
            MemoryArtifactStore::new(),
            FixedClock::new(now),
            ForecastOptions::default(),
            Duration::hours(1),
        )
    }

    #[test]
    // Purpose
    // -------
    // An absent artifact triggers one rebuild; a fresh one triggers none.
    //
    // Given
    // -----
    // - A snapshot at `now` with one region and an empty store.
    //
    // Expect
    // ------
    // - First call: one rebuild, 5 stored artifacts. Second call: no new
    //   rebuild and the same series.
    fn absent_then_fresh() {
        // Arrange
        let snapshot = DataSnapshot::new(noon()).with_region("Victoria", record(20));
        let mut cache = cache_at(snapshot, noon());

        // Act
        let state_before = cache.artifact_state("Victoria").expect("store should list");
        let first = cache.get_forecast("Victoria").expect("forecast should be served");
        let second = cache.get_forecast("Victoria").expect("forecast should be served");

        // Assert
        assert_eq!(state_before, ArtifactState::Absent);
        assert_eq!(cache.rebuilds(), 1);
        assert_eq!(cache.store().len(), 5);
        assert_eq!(first, second);
        assert_eq!(
            cache.artifact_state("Victoria").expect("store should list"),
            ArtifactState::Fresh
        );
    }

    #[test]
    // Purpose
    // -------
    // Time passing beyond the threshold makes the artifact stale, and one
    // rebuild makes it fresh again even though the source data is old.
    //
    // Given
    // -----
    // - Artifacts built at noon from a snapshot whose data time is noon.
    // - The clock moves 2 hours ahead; the snapshot is not refreshed.
    //
    // Expect
    // ------
    // - `Stale`, then exactly one more rebuild stamped with the new clock
    //   time, then `Fresh`; further calls do not rebuild.
    fn stale_artifacts_rebuild_once() {
        // Arrange
        let snapshot = DataSnapshot::new(noon()).with_region("Victoria", record(20));
        let clock = FixedClock::new(noon());
        let mut cache = ForecastCache::new(
            StaticProvider::new(snapshot),
            MemoryArtifactStore::new(),
            clock.clone(),
            ForecastOptions::default(),
            Duration::hours(1),
        );
        cache.rebuild_all().expect("rebuild should succeed");
        clock.advance(Duration::hours(2));

        // Act
        let state = cache.artifact_state("Victoria").expect("store should list");
        cache.get_forecast("Victoria").expect("forecast should be served");
        cache.get_forecast("Victoria").expect("forecast should be served");

        // Assert
        assert_eq!(state, ArtifactState::Stale);
        assert_eq!(cache.rebuilds(), 2);
        let newest = cache
            .latest(ArtifactKind::Ensembled, "Victoria")
            .expect("store should list")
            .expect("a rebuilt artifact should exist");
        assert_eq!(newest.timestamp, noon() + Duration::hours(2));
        assert_eq!(
            cache.artifact_state("Victoria").expect("store should list"),
            ArtifactState::Fresh
        );
    }

    #[test]
    // Purpose
    // -------
    // One entity's bad data does not stop the others.
    //
    // Given
    // -----
    // - "Good" with 20 rows, "Empty" with none, "Short" with one row.
    //
    // Expect
    // ------
    // - `succeeded == ["Good"]`; "Empty" fails as `DataUnavailable`.
    fn rebuild_isolates_entity_failures() {
        // Arrange
        let snapshot = DataSnapshot::new(noon())
            .with_region("Good", record(20))
            .with_region("Empty", RegionRecord::default())
            .with_region("Short", record(1));
        let mut cache = cache_at(snapshot, noon());

        // Act
        let report = cache.rebuild_all().expect("rebuild should succeed");

        // Assert
        assert_eq!(report.succeeded, vec!["Good".to_string()]);
        assert_eq!(report.failed.len(), 2);
        let empty = report
            .failed
            .iter()
            .find(|(e, _)| e == "Empty")
            .expect("Empty should be reported");
        assert_eq!(
            empty.1,
            ForecastError::DataUnavailable { entity: "Empty".to_string() }.to_string()
        );
        assert!(cache.read_forecast("Good").is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Corrupt stored models are refitted during prediction writing.
    //
    // Given
    // -----
    // - A store already holding an unreadable log model at the rebuild time.
    //
    // Expect
    // ------
    // - The entity still succeeds; the member forecasts are readable.
    fn corrupt_models_are_refitted() {
        // Arrange
        let snapshot = DataSnapshot::new(noon()).with_region("Victoria", record(20));
        let mut cache = cache_at(snapshot.clone(), noon());
        let record = snapshot.region("Victoria").expect("region should be configured");
        cache.build_models("Victoria", record, noon()).expect("build_models should succeed");
        let key = ArtifactKey::new(ArtifactKind::Model(ModelVariant::Log), "Victoria", noon())
            .expect("ArtifactKey should be valid")
            .file_name();
        cache.store_mut().save(&key, b"{broken").expect("artifact should be saved");

        // Act
        let result = cache.write_predictions(&snapshot, "Victoria", noon());

        // Assert
        assert!(result.is_ok());
        assert!(cache.read_member("Victoria", ModelVariant::Log).is_ok());
        assert!(cache.read_member("Victoria", ModelVariant::Linear).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Unknown entities surface as unavailable after exactly two rebuilds.
    //
    // Given
    // -----
    // - A snapshot without "Atlantis".
    //
    // Expect
    // ------
    // - `PredictionUnavailable { entity: "Atlantis", .. }`, two rebuilds.
    fn unreadable_after_retry_is_fatal() {
        // Arrange
        let snapshot = DataSnapshot::new(noon()).with_region("Victoria", record(20));
        let mut cache = cache_at(snapshot, noon());

        // Act
        let result = cache.get_forecast("Atlantis");

        // Assert
        assert!(matches!(
            result,
            Err(ForecastError::PredictionUnavailable { ref entity, .. }) if entity == "Atlantis"
        ));
        assert_eq!(cache.rebuilds(), 2);
    }
}
