//! CSV ingest and normalization.
//!
//! This module is responsible for turning a two-column `date,value` export into
//! a clean, sorted series that is safe to hand to the period engine.
//!
//! Design goals:
//! - **Header row is always skipped** (its names are not interpreted)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (stable sort, no dedupe)
//! - **Separation of concerns**: no return logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::Sample;
use crate::error::AppError;

/// Spreadsheet serial number of 1970-01-01.
pub const SERIAL_UNIX_EPOCH: f64 = 25569.0;

/// Minimum number of valid rows for a usable series.
pub const MIN_ROWS: usize = 2;

/// Summary stats about the samples that survived ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub n_points: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub value_min: f64,
    pub value_max: f64,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: sorted samples + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedSeries {
    pub samples: Vec<Sample>,
    pub stats: SeriesStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and normalize a `date,value` CSV file.
pub fn load_series(path: &Path) -> Result<IngestedSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let ingested = parse_series_from_reader(file)?;
    debug!(
        path = %path.display(),
        rows_read = ingested.rows_read,
        rows_used = ingested.rows_used,
        "loaded series"
    );
    Ok(ingested)
}

/// Parse a `date,value` CSV from any reader (the first row is a header).
pub fn parse_series_from_reader<R: Read>(reader: R) -> Result<IngestedSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record) {
            Ok(sample) => samples.push(sample),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        warn!(dropped = row_errors.len(), rows_read, "dropped invalid rows");
    }

    let rows_used = samples.len();
    if rows_used < MIN_ROWS {
        return Err(AppError::new(
            3,
            format!("Need at least {MIN_ROWS} valid rows, found {rows_used} (of {rows_read} read)."),
        ));
    }

    samples.sort_by_key(|s| s.date);

    let stats = compute_stats(&samples)
        .ok_or_else(|| AppError::new(3, "No valid samples remain after normalization."))?;

    Ok(IngestedSeries {
        samples,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn parse_row(record: &StringRecord) -> Result<Sample, String> {
    let raw_date = record
        .get(0)
        .map(|s| s.trim().trim_start_matches('\u{feff}'))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing date value.".to_string())?;
    let raw_value = record
        .get(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing value.".to_string())?;

    let date = parse_date_cell(raw_date)?;
    let value = raw_value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid value '{raw_value}'."))?;

    Ok(Sample::new(date, value))
}

/// Parse a date cell: a spreadsheet serial number or a date string.
pub fn parse_date_cell(s: &str) -> Result<NaiveDate, String> {
    if let Ok(serial) = s.parse::<f64>() {
        return serial_to_date(serial).ok_or_else(|| format!("Invalid serial date '{s}'."));
    }
    parse_date(s)
}

/// Convert a spreadsheet serial day number to a calendar date.
///
/// Serial `25569` is 1970-01-01; a fractional part (time of day) is dropped.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = (serial - SERIAL_UNIX_EPOCH).floor();
    if days.abs() > 3_000_000.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::days(days as i64))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but spreadsheet exports often use
    // US-style `MM/DD/YYYY` or carry a time component. We accept a small set
    // of common formats to reduce friction while keeping parsing deterministic.
    const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected a serial number or one of: YYYY-MM-DD, YYYY/MM/DD, MM/DD/YYYY."
    ))
}

fn compute_stats(samples: &[Sample]) -> Option<SeriesStats> {
    let first = samples.first()?;
    let last = samples.last()?;

    let mut value_min = f64::INFINITY;
    let mut value_max = f64::NEG_INFINITY;
    for s in samples {
        value_min = value_min.min(s.value);
        value_max = value_max.max(s.value);
    }

    Some(SeriesStats {
        n_points: samples.len(),
        first_date: first.date,
        last_date: last.date,
        value_min,
        value_max,
    })
}
