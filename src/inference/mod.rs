//! inference — post-fit uncertainty for the additive forecaster.
//!
//! Purpose
//! -------
//! Convert a fitted coefficient vector into covariance information used to
//! widen forecast intervals beyond the residual noise alone.
//!
//! Key behaviors
//! -------------
//! - Observed information from finite-difference Hessians of the score.
//! - Eigen-truncated pseudo-inverse (`nalgebra`) so rank-deficient designs
//!   (e.g. redundant changepoints) never yield infinite variances.
//!
//! Conventions
//! -----------
//! - Pure numerical code: no logging, no I/O. Failures surface as
//!   [`OptResult`](crate::optimization::errors::OptResult).

pub mod covariance;

pub use self::covariance::{
    EIGEN_EPS, diagonal_std_errors, information_pseudo_inverse, pseudo_inverse, quadratic_form,
};
