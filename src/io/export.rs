//! Export series to CSV.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream
//! scripts, and re-ingestable where they carry a plain `date,value` layout.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{IndexedPoint, Sample};
use crate::error::AppError;

/// Write the indexed chart series to a CSV file.
pub fn write_indexed_csv(path: &Path, points: &[IndexedPoint]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_indexed(BufWriter::new(file), points)
}

fn write_indexed<W: Write>(mut out: W, points: &[IndexedPoint]) -> Result<(), AppError> {
    writeln!(out, "date,indexed_value,actual_value,annualized_return_since_inception")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        // Missing since-inception returns are written as an empty cell.
        let since_inception = p
            .annualized_return_since_inception
            .map(|r| format!("{r:.8}"))
            .unwrap_or_default();
        writeln!(
            out,
            "{},{:.6},{:.6},{since_inception}",
            p.timestamp, p.indexed_value, p.actual_value
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

/// Write a raw `date,value` series (the ingest format).
pub fn write_series_csv(path: &Path, samples: &[Sample]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series CSV '{}': {e}", path.display())))?;
    write_series(BufWriter::new(file), samples)
}

fn write_series<W: Write>(mut out: W, samples: &[Sample]) -> Result<(), AppError> {
    writeln!(out, "date,value").map_err(|e| AppError::new(2, format!("Failed to write series CSV header: {e}")))?;
    for s in samples {
        writeln!(out, "{},{:.4}", s.date, s.value)
            .map_err(|e| AppError::new(2, format!("Failed to write series CSV row: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush series CSV: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::parse_series_from_reader;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn indexed_csv_layout() {
        let points = vec![IndexedPoint {
            timestamp: d(2024, 1, 2),
            indexed_value: 100.0,
            actual_value: 1234.5,
            annualized_return_since_inception: Some(0.0525),
        }];
        let mut buf = Vec::new();
        write_indexed(&mut buf, &points).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "date,indexed_value,actual_value,annualized_return_since_inception\n\
             2024-01-02,100.000000,1234.500000,0.05250000\n"
        );
    }

    #[test]
    fn missing_since_inception_return_is_an_empty_cell() {
        let points = vec![IndexedPoint {
            timestamp: d(2024, 1, 2),
            indexed_value: 100.0,
            actual_value: 50.0,
            annualized_return_since_inception: None,
        }];
        let mut buf = Vec::new();
        write_indexed(&mut buf, &points).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("2024-01-02,100.000000,50.000000,\n"));
    }

    #[test]
    fn series_csv_is_reingestable() {
        let samples = vec![Sample::new(d(2024, 1, 2), 100.0), Sample::new(d(2024, 1, 3), 101.25)];
        let mut buf = Vec::new();
        write_series(&mut buf, &samples).unwrap();
        let ingested = parse_series_from_reader(buf.as_slice()).unwrap();
        assert_eq!(ingested.samples, samples);
    }
}
