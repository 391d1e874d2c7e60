//! outbreak_projection — outbreak simulation and short-horizon case forecasting.
//!
//! Purpose
//! -------
//! Serve as the crate root for two independent pipelines that share
//! configuration, data access, and numerics:
//! - an S/I/R/D projection of one region's outbreak whose mortality rises
//!   once hospital capacity is exceeded, broken down by age cohort;
//! - a log/linear ensemble forecast of cumulative confirmed cases, memoized
//!   on disk and rebuilt when stale or unreadable.
//!
//! Key behaviors
//! -------------
//! - [`epidemic`] holds the simulator, the age stratifier, and regional
//!   scenario assembly.
//! - [`forecast`] holds the additive model, the ensembler, and the artifact
//!   cache.
//! - [`data`] supplies point-in-time snapshots of historical counts.
//! - [`config`] loads TOML configuration with environment overrides and
//!   carries the built-in epidemiological, age, and region tables.
//! - [`optimization`] and [`inference`] provide the maximum-likelihood
//!   driver and covariance helpers used by the forecaster.
//! - [`telemetry`] installs the `tracing` subscriber.
//!
//! Invariants & assumptions
//! ------------------------
//! - Neither pipeline consumes the other's output.
//! - Public entry points validate inputs and return typed errors; numerical
//!   kernels below them assume validated inputs and never produce NaN counts.
//!
//! Conventions
//! -----------
//! - Days are calendar days; day 0 of a simulation is the initial state.
//! - Each module owns its error enum and `*Result` alias.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code they cover.
//! - `tests/` holds end-to-end runs of both pipelines and property tests of
//!   the simulator.

pub mod config;
pub mod data;
pub mod epidemic;
pub mod forecast;
pub mod inference;
pub mod optimization;
pub mod telemetry;
