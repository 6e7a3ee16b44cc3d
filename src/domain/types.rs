//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed by value through the pure return engine
//! - exported to JSON/CSV
//! - rendered by the CLI report, ASCII plot and TUI

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One observation of the input time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub value: f64,
}

impl Sample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Fixed look-back periods.
///
/// Every preset except `Ytd` and `SinceInception` is a calendar offset from the
/// end anchor (the latest sample not after "now").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Preset {
    #[serde(rename = "1m")]
    #[value(name = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    #[value(name = "3m")]
    ThreeMonths,
    #[serde(rename = "ytd")]
    #[value(name = "ytd")]
    Ytd,
    #[serde(rename = "1y")]
    #[value(name = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    #[value(name = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    #[value(name = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    #[value(name = "10y")]
    TenYears,
    #[serde(rename = "15y")]
    #[value(name = "15y")]
    FifteenYears,
    #[serde(rename = "20y")]
    #[value(name = "20y")]
    TwentyYears,
    #[serde(rename = "si")]
    #[value(name = "si")]
    SinceInception,
}

impl Preset {
    /// All presets in display order (shortest look-back first).
    pub const ALL: [Preset; 10] = [
        Preset::OneMonth,
        Preset::ThreeMonths,
        Preset::Ytd,
        Preset::OneYear,
        Preset::ThreeYears,
        Preset::FiveYears,
        Preset::TenYears,
        Preset::FifteenYears,
        Preset::TwentyYears,
        Preset::SinceInception,
    ];

    /// Short label used on the command line and in reports.
    pub fn label(self) -> &'static str {
        match self {
            Preset::OneMonth => "1m",
            Preset::ThreeMonths => "3m",
            Preset::Ytd => "ytd",
            Preset::OneYear => "1y",
            Preset::ThreeYears => "3y",
            Preset::FiveYears => "5y",
            Preset::TenYears => "10y",
            Preset::FifteenYears => "15y",
            Preset::TwentyYears => "20y",
            Preset::SinceInception => "si",
        }
    }

    /// Human-readable name for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Preset::OneMonth => "1 Month",
            Preset::ThreeMonths => "3 Months",
            Preset::Ytd => "Year to Date",
            Preset::OneYear => "1 Year",
            Preset::ThreeYears => "3 Years",
            Preset::FiveYears => "5 Years",
            Preset::TenYears => "10 Years",
            Preset::FifteenYears => "15 Years",
            Preset::TwentyYears => "20 Years",
            Preset::SinceInception => "Since Inception",
        }
    }

    /// Whether returns over this preset are reported as CAGR.
    ///
    /// `1m`, `3m` and `ytd` are always simple returns.
    pub fn annualizes(self) -> bool {
        match self {
            Preset::OneMonth | Preset::ThreeMonths | Preset::Ytd => false,
            Preset::OneYear
            | Preset::ThreeYears
            | Preset::FiveYears
            | Preset::TenYears
            | Preset::FifteenYears
            | Preset::TwentyYears
            | Preset::SinceInception => true,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which period to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum PeriodSpec {
    Preset { preset: Preset },
    /// Explicit caller-chosen boundaries (need not exist in the series).
    Custom { start: NaiveDate, end: NaiveDate },
}

impl PeriodSpec {
    pub fn preset(preset: Preset) -> Self {
        PeriodSpec::Preset { preset }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        PeriodSpec::Custom { start, end }
    }

    pub fn label(&self) -> String {
        match self {
            PeriodSpec::Preset { preset } => preset.label().to_string(),
            PeriodSpec::Custom { start, end } => format!("custom {start}..{end}"),
        }
    }
}

impl From<Preset> for PeriodSpec {
    fn from(value: Preset) -> Self {
        PeriodSpec::preset(value)
    }
}

/// Output of a single `resolve` call.
///
/// All optional fields are `None` together when there is nothing to show yet
/// (empty series, or every sample dated after "now").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedResult {
    pub filtered_series: Vec<Sample>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_value: Option<f64>,
    pub end_value: Option<f64>,
    pub return_value: Option<f64>,
    pub is_annualized: bool,
    pub inception_date: Option<NaiveDate>,
    pub inception_value: Option<f64>,
}

impl ResolvedResult {
    pub fn empty() -> Self {
        Self {
            filtered_series: Vec::new(),
            start_date: None,
            end_date: None,
            start_value: None,
            end_value: None,
            return_value: None,
            is_annualized: false,
            inception_date: None,
            inception_value: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.return_value.is_none()
    }

    /// The first sample of the whole series, when known.
    pub fn inception(&self) -> Option<Sample> {
        Some(Sample::new(self.inception_date?, self.inception_value?))
    }
}

/// Per-sample chart record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexedPoint {
    pub timestamp: NaiveDate,
    /// Value rescaled so the first sample of the period equals 100.
    pub indexed_value: f64,
    pub actual_value: f64,
    /// `None` when the inception value cannot anchor a return (zero, or a
    /// sign flip under a fractional power).
    pub annualized_return_since_inception: Option<f64>,
}

/// Y-axis range for the indexed chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
    /// Tick spacing; `min` and `max` are multiples of it.
    pub interval: f64,
}

impl AxisBounds {
    /// Tick values from `min` to `max` inclusive.
    pub fn ticks(&self) -> Vec<f64> {
        if !(self.interval > 0.0) || self.max < self.min {
            return Vec::new();
        }
        let n = ((self.max - self.min) / self.interval).round() as usize;
        (0..=n).map(|i| self.min + i as f64 * self.interval).collect()
    }
}

/// A full `show` run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub csv_path: PathBuf,
    /// Reference "today"; samples after it are ignored by presets.
    pub now: NaiveDate,
    pub period: PeriodSpec,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_series: Option<PathBuf>,
    pub export_result: Option<PathBuf>,
}

/// Settings for synthetic series generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub initial_value: f64,
    /// Annual log drift.
    pub drift: f64,
    /// Annual volatility of log returns.
    pub volatility: f64,
    pub seed: u64,
}
