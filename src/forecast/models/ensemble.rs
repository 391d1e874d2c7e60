//! Average two forecasts over their shared dates.
//!
//! The log-scale fit damps large-count noise; the linear fit follows the
//! local trend. Their plain average is a cheap heuristic, not a weighted
//! combination.
use crate::forecast::core::series::{ForecastRow, ForecastSeries};

/// Elementwise mean of `a` and `b` on dates present in both.
///
/// Rows follow `a`'s order. Point, lower, and upper are each
/// `(a + b) / 2` truncated toward zero.
pub fn ensemble(a: &ForecastSeries, b: &ForecastSeries) -> ForecastSeries {
    let rows = a
        .rows()
        .iter()
        .filter_map(|ra| {
            b.get(ra.date).map(|rb| {
                ForecastRow::new(
                    ra.date,
                    mean_trunc(ra.point, rb.point),
                    mean_trunc(ra.lower, rb.lower),
                    mean_trunc(ra.upper, rb.upper),
                )
            })
        })
        .collect();
    // Subsequence of an ordered series, so ordering holds.
    ForecastSeries::new(rows).unwrap_or_default()
}

fn mean_trunc(x: i64, y: i64) -> i64 {
    ((x as i128 + y as i128) / 2) as i64
}
