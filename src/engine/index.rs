//! Indexed (base = 100) chart series.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{IndexedPoint, ResolvedResult, Sample};
use crate::engine::resolve::MIN_ANNUALIZE_YEARS;
use crate::error::EngineError;
use crate::math::year_fraction;

/// Scale of the indexed series at the start of the period.
pub const INDEX_BASE: f64 = 100.0;

/// Rescale `filtered` so its first sample is 100 and annotate each point with
/// its annualized return since inception.
///
/// Only a zero period baseline is an error. A since-inception return that
/// cannot be computed leaves that point's annotation as `None`.
///
/// Pure and restartable; callers recompute from scratch on every change.
pub fn index_series(
    filtered: &[Sample],
    inception_date: NaiveDate,
    inception_value: f64,
) -> Result<Vec<IndexedPoint>, EngineError> {
    let Some(first) = filtered.first() else {
        return Ok(Vec::new());
    };
    if first.value == 0.0 {
        return Err(EngineError::DegenerateValue {
            date: first.date,
            value: first.value,
        });
    }
    if inception_value == 0.0 {
        debug!(%inception_date, "zero inception value; since-inception returns omitted");
    }

    let baseline = first.value;
    let points = filtered
        .iter()
        .map(|p| IndexedPoint {
            timestamp: p.date,
            indexed_value: p.value / baseline * INDEX_BASE,
            actual_value: p.value,
            annualized_return_since_inception: since_inception_return(inception_date, inception_value, *p),
        })
        .collect();
    Ok(points)
}

fn since_inception_return(inception_date: NaiveDate, inception_value: f64, p: Sample) -> Option<f64> {
    if inception_value == 0.0 {
        return None;
    }
    let ratio = p.value / inception_value;
    let years = year_fraction(inception_date, p.date);
    let r = if years >= MIN_ANNUALIZE_YEARS {
        ratio.powf(1.0 / years) - 1.0
    } else {
        ratio - 1.0
    };
    r.is_finite().then_some(r)
}

/// `index_series` over a resolved result; an empty result gives an empty series.
pub fn index_result(result: &ResolvedResult) -> Result<Vec<IndexedPoint>, EngineError> {
    match result.inception() {
        Some(inception) => index_series(&result.filtered_series, inception.date, inception.value),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn first_point_is_exactly_base() {
        let filtered = vec![
            Sample::new(d(2021, 1, 4), 123.456),
            Sample::new(d(2021, 6, 1), 150.0),
            Sample::new(d(2022, 1, 4), 98.0),
        ];
        let pts = index_series(&filtered, d(2020, 1, 1), 100.0).unwrap();
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0].indexed_value, 100.0);
        assert!((pts[1].indexed_value - 150.0 / 123.456 * 100.0).abs() < 1e-12);
        assert_eq!(pts[2].actual_value, 98.0);
        assert_eq!(pts[2].timestamp, d(2022, 1, 4));
    }

    #[test]
    fn since_inception_switches_to_cagr_after_one_month() {
        let inception = d(2020, 1, 1);
        let filtered = vec![
            Sample::new(d(2020, 1, 21), 110.0),
            Sample::new(d(2022, 1, 1), 121.0),
        ];
        let pts = index_series(&filtered, inception, 100.0).unwrap();
        // 20/360 years < 1/12: simple return.
        assert!((pts[0].annualized_return_since_inception.unwrap() - 0.10).abs() < 1e-12);
        // Exactly 2 years: sqrt(1.21) - 1.
        assert!((pts[1].annualized_return_since_inception.unwrap() - 0.10).abs() < 1e-12);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(index_series(&[], d(2020, 1, 1), 1.0).unwrap().is_empty());
        assert!(index_result(&ResolvedResult::empty()).unwrap().is_empty());
    }

    #[test]
    fn zero_inception_value_leaves_annotation_empty() {
        let filtered = vec![Sample::new(d(2021, 1, 1), 10.0), Sample::new(d(2021, 6, 1), 12.0)];
        let pts = index_series(&filtered, d(2020, 1, 1), 0.0).unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[1].indexed_value, 120.0);
        assert!(pts.iter().all(|p| p.annualized_return_since_inception.is_none()));
    }

    #[test]
    fn negative_inception_value_leaves_annotation_empty() {
        // Positive / negative ratio under a fractional power is NaN.
        let filtered = vec![Sample::new(d(2021, 7, 1), 10.0)];
        let pts = index_series(&filtered, d(2020, 1, 1), -10.0).unwrap();
        assert_eq!(pts[0].indexed_value, INDEX_BASE);
        assert_eq!(pts[0].annualized_return_since_inception, None);
    }

    #[test]
    fn zero_period_baseline_is_an_error() {
        let filtered = vec![Sample::new(d(2021, 1, 1), 0.0), Sample::new(d(2021, 6, 1), 12.0)];
        let err = index_series(&filtered, d(2020, 1, 1), 5.0).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateValue { .. }));
    }

    proptest! {
        #[test]
        fn indexed_series_always_starts_at_base(values in proptest::collection::vec(0.01f64..1.0e6, 1..50)) {
            let start = d(2010, 1, 1);
            let filtered: Vec<Sample> = values
                .iter()
                .enumerate()
                .map(|(i, v)| Sample::new(start + chrono::Duration::days(i as i64 * 7), *v))
                .collect();
            let pts = index_series(&filtered, start, filtered[0].value).unwrap();
            prop_assert_eq!(pts.len(), filtered.len());
            prop_assert_eq!(pts[0].indexed_value, INDEX_BASE);
        }
    }
}
