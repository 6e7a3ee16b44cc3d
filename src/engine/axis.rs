//! Y-axis bounds for the indexed chart.
//!
//! Bounds snap to a "nice" tick interval chosen by the size of the data range,
//! and always leave at least one interval of room on either side of the 100
//! baseline so the reference level stays visible.

use crate::domain::{AxisBounds, IndexedPoint};
use crate::engine::index::INDEX_BASE;

/// Tick interval for a given data range.
pub fn nice_interval(range: f64) -> f64 {
    if range <= 10.0 {
        2.0
    } else if range <= 50.0 {
        5.0
    } else if range <= 100.0 {
        10.0
    } else {
        (range / 100.0).ceil() * 10.0
    }
}

/// Axis bounds covering every indexed value and the baseline.
///
/// Returns `None` for an empty series.
pub fn axis_bounds(points: &[IndexedPoint]) -> Option<AxisBounds> {
    let (min, max) = points.iter().map(|p| p.indexed_value).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
    })?;

    let interval = nice_interval(max - min);
    let lower = ((min / interval).floor() * interval).min(INDEX_BASE - interval);
    let upper = ((max / interval).ceil() * interval).max(INDEX_BASE + interval);

    Some(AxisBounds {
        min: lower,
        max: upper,
        interval,
    })
}
