//! Read/write result JSON files.
//!
//! Result JSON is the "portable" representation of one resolved period:
//! - period selection and reference date
//! - summary figures (boundaries, values, return, annualized flag, inception)
//! - the indexed chart series and its axis bounds
//!
//! The schema is defined by `ResultFile`.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{AxisBounds, IndexedPoint, PeriodSpec, ResolvedResult};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    pub now: NaiveDate,
    pub period: PeriodSpec,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_value: Option<f64>,
    pub end_value: Option<f64>,
    pub return_value: Option<f64>,
    pub is_annualized: bool,
    pub inception_date: Option<NaiveDate>,
    pub inception_value: Option<f64>,
    pub axis: Option<AxisBounds>,
    pub points: Vec<IndexedPoint>,
}

impl ResultFile {
    pub fn new(
        now: NaiveDate,
        period: PeriodSpec,
        result: &ResolvedResult,
        points: &[IndexedPoint],
        axis: Option<AxisBounds>,
    ) -> Self {
        Self {
            tool: "perfview".to_string(),
            now,
            period,
            start_date: result.start_date,
            end_date: result.end_date,
            start_value: result.start_value,
            end_value: result.end_value,
            return_value: result.return_value,
            is_annualized: result.is_annualized,
            inception_date: result.inception_date,
            inception_value: result.inception_value,
            axis,
            points: points.to_vec(),
        }
    }
}

/// Write a result JSON file.
pub fn write_result_json(path: &Path, doc: &ResultFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, doc)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;

    Ok(())
}

/// Read a result JSON file.
pub fn read_result_json(path: &Path) -> Result<ResultFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    let doc: ResultFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Preset, Sample};
    use crate::engine::{axis_bounds, index_result, resolve};

    #[test]
    fn result_json_round_trips_through_disk() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let series = vec![
            Sample::new(d(2020, 1, 1), 100.0),
            Sample::new(d(2021, 1, 1), 110.0),
            Sample::new(d(2022, 1, 1), 121.0),
        ];
        let now = d(2022, 6, 1);
        let period = PeriodSpec::preset(Preset::SinceInception);
        let result = resolve(&series, period, now).unwrap();
        let points = index_result(&result).unwrap();
        let doc = ResultFile::new(now, period, &result, &points, axis_bounds(&points));

        let path = std::env::temp_dir().join(format!("perfview_result_{}.json", std::process::id()));
        write_result_json(&path, &doc).unwrap();
        let back = read_result_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.period, period);
        assert_eq!(back.points.len(), 3);
        assert!(back.is_annualized);
        assert_eq!(back.start_date, Some(d(2020, 1, 1)));
    }
}
