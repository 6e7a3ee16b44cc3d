//! Shared "view pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> period resolution -> indexing -> axis bounds
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{AxisBounds, IndexedPoint, PeriodSpec, ResolvedResult, Sample, ViewConfig};
use crate::error::{AppError, EngineError};
use crate::io::ingest::IngestedSeries;

/// Everything needed to present one period: summary, chart series, axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodView {
    pub result: ResolvedResult,
    pub points: Vec<IndexedPoint>,
    /// `None` when there are no points to chart.
    pub axis: Option<AxisBounds>,
}

/// All computed outputs of a single `perfview show` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedSeries,
    pub view: PeriodView,
}

/// Load the CSV named by `config` and compute its period view.
pub fn run_view(config: &ViewConfig) -> Result<RunOutput, AppError> {
    let ingest = crate::io::ingest::load_series(&config.csv_path)?;
    info!(
        path = %config.csv_path.display(),
        points = ingest.samples.len(),
        "series loaded"
    );

    let view = view_period(&ingest.samples, config.period, config.now)?;
    Ok(RunOutput { ingest, view })
}

/// Resolve, index, and bound one period over an already-loaded series.
///
/// The TUI calls this on every period change without re-reading the file.
pub fn view_period(samples: &[Sample], period: PeriodSpec, now: NaiveDate) -> Result<PeriodView, EngineError> {
    let result = crate::engine::resolve(samples, period, now)?;
    let points = crate::engine::index_result(&result)?;
    let axis = crate::engine::axis_bounds(&points);
    Ok(PeriodView { result, points, axis })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Preset;
    use std::io::Write;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series() -> Vec<Sample> {
        vec![
            Sample::new(d(2020, 1, 1), 1000.0),
            Sample::new(d(2021, 1, 1), 1100.0),
            Sample::new(d(2022, 1, 1), 1210.0),
        ]
    }

    #[test]
    fn view_period_since_inception() {
        let view = view_period(&series(), PeriodSpec::preset(Preset::SinceInception), d(2022, 6, 1)).unwrap();
        assert_eq!(view.points.len(), 3);
        assert!((view.points[0].indexed_value - 100.0).abs() < 1e-12);
        assert!((view.points[2].indexed_value - 121.0).abs() < 1e-9);
        let axis = view.axis.unwrap();
        assert!(axis.min <= 100.0 && axis.max >= 121.0);
        assert!(view.result.is_annualized);
    }

    #[test]
    fn view_period_with_nothing_before_now_is_empty() {
        let view = view_period(&series(), PeriodSpec::preset(Preset::OneYear), d(2019, 1, 1)).unwrap();
        assert!(view.result.is_empty());
        assert!(view.points.is_empty());
        assert!(view.axis.is_none());
    }

    #[test]
    fn unusable_inception_keeps_the_period_return() {
        for inception in [0.0, -10.0] {
            let samples = vec![
                Sample::new(d(2015, 1, 1), inception),
                Sample::new(d(2024, 1, 1), 100.0),
                Sample::new(d(2024, 12, 31), 110.0),
            ];
            let period = PeriodSpec::preset(Preset::OneYear);
            let now = d(2025, 1, 1);
            let resolved = crate::engine::resolve(&samples, period, now).unwrap();

            let view = view_period(&samples, period, now).unwrap();
            assert_eq!(view.result.return_value, resolved.return_value);
            assert!((view.result.return_value.unwrap() - 0.10).abs() < 1e-2);
            assert_eq!(view.points.len(), 2);
            assert!(view.points.iter().all(|p| p.annualized_return_since_inception.is_none()));
            assert!(view.axis.is_some());
        }
    }

    #[test]
    fn view_period_propagates_engine_errors() {
        let err = view_period(&series(), PeriodSpec::custom(d(2022, 1, 1), d(2020, 1, 1)), d(2022, 6, 1))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvertedRange { .. }));
    }

    #[test]
    fn run_view_reads_csv() {
        let path = std::env::temp_dir().join(format!("perfview_pipeline_{}.csv", std::process::id()));
        {
            let mut f = std::fs::File::create(&path).unwrap();
            writeln!(f, "date,value").unwrap();
            writeln!(f, "2020-01-01,1000").unwrap();
            writeln!(f, "2021-01-01,1100").unwrap();
        }
        let config = ViewConfig {
            csv_path: path.clone(),
            now: d(2021, 6, 1),
            period: PeriodSpec::preset(Preset::OneYear),
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_series: None,
            export_result: None,
        };
        let run = run_view(&config).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(run.ingest.samples.len(), 2);
        let ret = run.view.result.return_value.unwrap();
        assert!((ret - 0.1).abs() < 1e-12);
        assert!(run.view.result.is_annualized);
    }
}
