//! Period resolution and return calculation.
//!
//! Given a series, a period and "now", `resolve`:
//!
//! 1. re-sorts the series (stable, by date)
//! 2. finds the latest sample not after `now` (the end anchor for presets)
//! 3. derives target start/end dates for the period
//! 4. snaps both targets to the nearest dates present in the series
//! 5. slices the window and computes a simple or annualized (CAGR) return
//!
//! The function is pure: no clock reads, no mutation of the input.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{PeriodSpec, Preset, ResolvedResult, Sample};
use crate::error::EngineError;
use crate::math::{closest_date, preset_start_date, year_fraction};

/// Below this span (in 30/360 years) an annualized return falls back to the
/// simple return.
pub const MIN_ANNUALIZE_YEARS: f64 = 1.0 / 12.0;

/// Target boundaries before snapping to available dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodTargets {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolve a period over `series` and compute its return.
///
/// An empty series, or one whose samples are all dated after `now`, yields
/// `ResolvedResult::empty()`. A zero start value is an error.
pub fn resolve(series: &[Sample], period: PeriodSpec, now: NaiveDate) -> Result<ResolvedResult, EngineError> {
    if series.is_empty() {
        return Ok(ResolvedResult::empty());
    }

    let sorted = sorted_series(series);

    let Some(targets) = period_targets(&sorted, period, now)? else {
        debug!(%now, "no sample at or before now; nothing to resolve");
        return Ok(ResolvedResult::empty());
    };

    let dates = || sorted.iter().map(|s| s.date);
    let (Some(start_date), Some(end_date)) = (closest_date(targets.start, dates()), closest_date(targets.end, dates()))
    else {
        return Ok(ResolvedResult::empty());
    };

    let Some(window) = boundary_window(&sorted, start_date, end_date) else {
        return Ok(ResolvedResult::empty());
    };
    let filtered_series = sorted[window.0..=window.1].to_vec();

    let start = filtered_series[0];
    let end = filtered_series[filtered_series.len() - 1];

    let is_annualized = match period {
        PeriodSpec::Custom { .. } => year_fraction(start_date, end_date) >= 1.0,
        PeriodSpec::Preset { preset } => preset.annualizes(),
    };

    let return_value = period_return(start, end, is_annualized)?;

    debug!(
        period = %period.label(),
        target_start = %targets.start,
        target_end = %targets.end,
        %start_date,
        %end_date,
        points = filtered_series.len(),
        is_annualized,
        return_value,
        "resolved period"
    );

    let inception = sorted[last_on_first_date(&sorted)];

    Ok(ResolvedResult {
        filtered_series,
        start_date: Some(start_date),
        end_date: Some(end_date),
        start_value: Some(start.value),
        end_value: Some(end.value),
        return_value: Some(return_value),
        is_annualized,
        inception_date: Some(inception.date),
        inception_value: Some(inception.value),
    })
}

/// Stable ascending sort by date; equal dates keep their input order.
pub fn sorted_series(series: &[Sample]) -> Vec<Sample> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|s| s.date);
    sorted
}

/// The sample with the greatest date not after `now` (`sorted` must be ascending).
pub fn latest_usable(sorted: &[Sample], now: NaiveDate) -> Option<Sample> {
    sorted.iter().rev().find(|s| s.date <= now).copied()
}

/// Compute the unsnapped target dates for `period`.
///
/// Returns `Ok(None)` when no sample is usable at `now`.
pub fn period_targets(
    sorted: &[Sample],
    period: PeriodSpec,
    now: NaiveDate,
) -> Result<Option<PeriodTargets>, EngineError> {
    let Some(first) = sorted.first() else {
        return Ok(None);
    };
    let Some(latest) = latest_usable(sorted, now) else {
        return Ok(None);
    };

    let targets = match period {
        PeriodSpec::Custom { start, end } => {
            if start > end {
                return Err(EngineError::InvertedRange { start, end });
            }
            PeriodTargets { start, end }
        }
        PeriodSpec::Preset {
            preset: Preset::SinceInception,
        } => PeriodTargets {
            start: first.date,
            end: latest.date,
        },
        PeriodSpec::Preset { preset } => PeriodTargets {
            // Only overflows near the calendar limits; the first sample is the
            // closest date in that case anyway.
            start: preset_start_date(preset, latest.date).unwrap_or(first.date),
            end: latest.date,
        },
    };

    Ok(Some(targets))
}

/// Index range `[start, end]` of the window between two snapped dates.
///
/// When several samples share a boundary date, the last one in input order is
/// the boundary sample at both ends. Inception follows the same rule.
fn boundary_window(sorted: &[Sample], start: NaiveDate, end: NaiveDate) -> Option<(usize, usize)> {
    let start_idx = sorted.partition_point(|s| s.date <= start).checked_sub(1)?;
    let end_idx = sorted.partition_point(|s| s.date <= end).checked_sub(1)?;
    if start_idx > end_idx || sorted[start_idx].date != start || sorted[end_idx].date != end {
        return None;
    }
    Some((start_idx, end_idx))
}

/// Index of the last sample on the earliest date of a non-empty sorted series.
fn last_on_first_date(sorted: &[Sample]) -> usize {
    let first = sorted[0].date;
    sorted.partition_point(|s| s.date <= first) - 1
}

/// Simple or annualized return between two samples.
pub fn period_return(start: Sample, end: Sample, annualize: bool) -> Result<f64, EngineError> {
    if start.value == 0.0 {
        return Err(EngineError::DegenerateValue {
            date: start.date,
            value: start.value,
        });
    }

    let ratio = end.value / start.value;
    let years = year_fraction(start.date, end.date);
    let r = if annualize && years >= MIN_ANNUALIZE_YEARS {
        ratio.powf(1.0 / years) - 1.0
    } else {
        ratio - 1.0
    };

    if !r.is_finite() {
        return Err(EngineError::NonFiniteReturn {
            start: start.date,
            end: end.date,
        });
    }
    Ok(r)
}
