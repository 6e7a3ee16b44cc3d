//! Returns for every preset in one pass (the `table` view).

use chrono::NaiveDate;

use crate::domain::{PeriodSpec, Preset, ResolvedResult, Sample};
use crate::engine::resolve::{period_targets, resolve, sorted_series};
use crate::error::EngineError;

/// One preset's outcome.
#[derive(Debug, Clone)]
pub struct PeriodRow {
    pub preset: Preset,
    pub outcome: Result<ResolvedResult, EngineError>,
    /// The preset reaches back before the first sample, so the window was
    /// snapped forward to inception.
    pub truncated: bool,
}

/// Resolve every preset against the same series and `now`.
///
/// A failing preset does not abort the others.
pub fn period_table(series: &[Sample], now: NaiveDate) -> Vec<PeriodRow> {
    let sorted = sorted_series(series);
    let first_date = sorted.first().map(|s| s.date);

    Preset::ALL
        .iter()
        .map(|&preset| {
            let period = PeriodSpec::preset(preset);
            let truncated = match (period_targets(&sorted, period, now), first_date) {
                (Ok(Some(targets)), Some(first)) => preset != Preset::SinceInception && targets.start < first,
                _ => false,
            };
            PeriodRow {
                preset,
                outcome: resolve(&sorted, period, now),
                truncated,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn table_covers_all_presets_in_order() {
        let start = d(2020, 1, 1);
        let series: Vec<Sample> = (0..(4 * 365))
            .map(|i| Sample::new(start + Duration::days(i), 100.0 + i as f64 * 0.05))
            .collect();
        let rows = period_table(&series, d(2023, 12, 30));

        let presets: Vec<Preset> = rows.iter().map(|r| r.preset).collect();
        assert_eq!(presets, Preset::ALL.to_vec());

        let by = |p: Preset| rows.iter().find(|r| r.preset == p).unwrap();
        assert!(!by(Preset::ThreeYears).truncated);
        assert!(by(Preset::FiveYears).truncated);
        assert!(by(Preset::TwentyYears).truncated);
        assert!(!by(Preset::SinceInception).truncated);

        // Truncated presets snap to inception, same as since-inception.
        let five = by(Preset::FiveYears).outcome.as_ref().unwrap();
        let si = by(Preset::SinceInception).outcome.as_ref().unwrap();
        assert_eq!(five.start_date, si.start_date);
        assert_eq!(five.return_value, si.return_value);
    }

    #[test]
    fn failing_preset_does_not_abort_others() {
        let series = vec![
            Sample::new(d(2015, 1, 1), 0.0),
            Sample::new(d(2024, 6, 1), 100.0),
            Sample::new(d(2024, 12, 31), 110.0),
        ];
        let rows = period_table(&series, d(2025, 1, 1));
        let si = rows.iter().find(|r| r.preset == Preset::SinceInception).unwrap();
        assert!(si.outcome.is_err());
        let one_month = rows.iter().find(|r| r.preset == Preset::OneMonth).unwrap();
        assert!(one_month.outcome.is_ok());
    }

    #[test]
    fn empty_series_gives_empty_rows() {
        let rows = period_table(&[], d(2025, 1, 1));
        assert_eq!(rows.len(), Preset::ALL.len());
        assert!(rows.iter().all(|r| r.outcome.as_ref().unwrap().is_empty()));
    }
}
