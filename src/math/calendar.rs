//! Calendar helpers: preset boundaries and nearest-date matching.

use chrono::{Datelike, Months, NaiveDate};

use crate::domain::Preset;

/// Target start date for a calendar preset, anchored at `end`.
///
/// Month/year offsets use `chrono::Months`, which clamps to the last valid day
/// of the target month (`2024-02-29` minus one year is `2023-02-28`).
///
/// Returns `None` for `SinceInception` (it resolves to the first sample of the
/// series, which this function does not see) and on calendar overflow.
pub fn preset_start_date(preset: Preset, end: NaiveDate) -> Option<NaiveDate> {
    let months = match preset {
        Preset::OneMonth => 1,
        Preset::ThreeMonths => 3,
        Preset::Ytd => return NaiveDate::from_ymd_opt(end.year(), 1, 1),
        Preset::OneYear => 12,
        Preset::ThreeYears => 3 * 12,
        Preset::FiveYears => 5 * 12,
        Preset::TenYears => 10 * 12,
        Preset::FifteenYears => 15 * 12,
        Preset::TwentyYears => 20 * 12,
        Preset::SinceInception => return None,
    };
    end.checked_sub_months(Months::new(months))
}

/// The candidate closest to `target` (absolute day distance).
///
/// Scans left to right and only replaces the running best on a strictly
/// smaller distance, so the first of several equidistant candidates wins.
pub fn closest_date<I>(target: NaiveDate, candidates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut best: Option<(NaiveDate, i64)> = None;
    for date in candidates {
        let diff = (date - target).num_days().abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((date, diff)),
        }
    }
    best.map(|(date, _)| date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn calendar_offsets() {
        let end = d(2025, 3, 31);
        assert_eq!(preset_start_date(Preset::OneMonth, end), Some(d(2025, 2, 28)));
        assert_eq!(preset_start_date(Preset::ThreeMonths, end), Some(d(2024, 12, 31)));
        assert_eq!(preset_start_date(Preset::OneYear, end), Some(d(2024, 3, 31)));
        assert_eq!(preset_start_date(Preset::TenYears, end), Some(d(2015, 3, 31)));
        assert_eq!(preset_start_date(Preset::TwentyYears, end), Some(d(2005, 3, 31)));
    }

    #[test]
    fn leap_day_clamps_in_non_leap_year() {
        assert_eq!(preset_start_date(Preset::OneYear, d(2024, 2, 29)), Some(d(2023, 2, 28)));
        assert_eq!(preset_start_date(Preset::FiveYears, d(2024, 2, 29)), Some(d(2019, 2, 28)));
    }

    #[test]
    fn ytd_is_first_of_year() {
        assert_eq!(preset_start_date(Preset::Ytd, d(2025, 8, 14)), Some(d(2025, 1, 1)));
    }

    #[test]
    fn since_inception_is_not_resolved_here() {
        assert_eq!(preset_start_date(Preset::SinceInception, d(2025, 8, 14)), None);
    }

    #[test]
    fn closest_date_tie_prefers_first_candidate() {
        // Two days either side of the target.
        let candidates = [d(2015, 3, 30), d(2015, 4, 3)];
        assert_eq!(closest_date(d(2015, 4, 1), candidates), Some(d(2015, 3, 30)));
        let reversed = [d(2015, 4, 3), d(2015, 3, 30)];
        assert_eq!(closest_date(d(2015, 4, 1), reversed), Some(d(2015, 4, 3)));
    }

    #[test]
    fn closest_date_prefers_nearer_candidate_over_earlier() {
        let candidates = [d(2015, 3, 30), d(2015, 4, 2)];
        assert_eq!(closest_date(d(2015, 4, 1), candidates), Some(d(2015, 4, 2)));
    }

    #[test]
    fn closest_date_picks_minimum_distance() {
        let candidates = [d(2020, 1, 1), d(2020, 1, 10), d(2020, 1, 20)];
        assert_eq!(closest_date(d(2020, 1, 12), candidates), Some(d(2020, 1, 10)));
        assert_eq!(closest_date(d(2030, 1, 1), candidates), Some(d(2020, 1, 20)));
        assert_eq!(closest_date(d(1990, 1, 1), candidates), Some(d(2020, 1, 1)));
    }

    #[test]
    fn closest_date_empty_is_none() {
        assert_eq!(closest_date(d(2020, 1, 1), std::iter::empty()), None);
    }
}
