//! US 30/360 (NASD) year fractions.
//!
//! Every annualized figure in the crate uses this time base, so it has to
//! agree with the spreadsheet `DAYS360(start, end, FALSE) / 360` convention:
//!
//! ```text
//! d1 = 31 -> d1 = 30
//! d2 = 31 and d1 >= 30 -> d2 = 30      (evaluated after the d1 rule)
//! days = (y2 - y1) * 360 + (m2 - m1) * 30 + (d2 - d1)
//! ```
//!
//! The computation is integer arithmetic followed by a single division, so the
//! result is exact whenever `days / 360` is representable (e.g. whole years).

use chrono::{Datelike, NaiveDate};

/// Days in a 30/360 year.
pub const DAYS_PER_YEAR: f64 = 360.0;

/// 30/360 day count between two dates.
///
/// The arguments are ordered first, so the result is never negative.
pub fn days_30_360(start: NaiveDate, end: NaiveDate) -> i64 {
    let (start, end) = if start > end { (end, start) } else { (start, end) };

    let (y1, m1, mut d1) = (start.year() as i64, start.month() as i64, start.day() as i64);
    let (y2, m2, mut d2) = (end.year() as i64, end.month() as i64, end.day() as i64);

    if d1 == 31 {
        d1 = 30;
    }
    if d2 == 31 && d1 >= 30 {
        d2 = 30;
    }

    (y2 - y1) * 360 + (m2 - m1) * 30 + (d2 - d1)
}

/// Fraction of a year between two dates under US 30/360.
pub fn year_fraction(start: NaiveDate, end: NaiveDate) -> f64 {
    days_30_360(start, end) as f64 / DAYS_PER_YEAR
}
