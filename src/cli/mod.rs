//! Command-line parsing for the period-return viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the engine code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{PeriodSpec, Preset};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "perfview", version, about = "Period returns and indexed performance for a date,value series")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one period, print its return, and optionally plot/export.
    Show(ShowArgs),
    /// Print returns for every preset period.
    Table(TableArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same engine as `perfview show`, but lets you switch periods
    /// and renders the indexed chart in a terminal UI using Ratatui.
    Tui(TuiArgs),
    /// Write a synthetic daily series CSV (seeded random walk).
    Sample(SampleArgs),
}

/// Options for resolving a single period.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Input CSV (`date,value`, first row is a header).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: PathBuf,

    /// Preset period (ignored when --from/--to are given).
    #[arg(short = 'p', long, value_enum, default_value_t = Preset::OneYear)]
    pub period: Preset,

    /// Custom period start (YYYY-MM-DD); requires --to.
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Custom period end (YYYY-MM-DD); requires --from.
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Reference date (defaults to $PERFVIEW_NOW, then today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub now: Option<NaiveDate>,

    /// Skip the terminal plot (plotted by default).
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the indexed series to CSV.
    #[arg(long = "export-series", value_name = "CSV")]
    pub export_series: Option<PathBuf>,

    /// Export the resolved result (summary + indexed series) to JSON.
    #[arg(long = "export-result", value_name = "JSON")]
    pub export_result: Option<PathBuf>,
}

impl ShowArgs {
    /// The selected period: custom when both bounds are given, else the preset.
    pub fn period_spec(&self) -> PeriodSpec {
        match (self.from, self.to) {
            (Some(start), Some(end)) => PeriodSpec::custom(start, end),
            _ => PeriodSpec::preset(self.period),
        }
    }
}

/// Options for the all-presets table.
#[derive(Debug, Parser, Clone)]
pub struct TableArgs {
    /// Input CSV (`date,value`, first row is a header).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: PathBuf,

    /// Reference date (defaults to $PERFVIEW_NOW, then today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub now: Option<NaiveDate>,
}

/// Options for the TUI.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Input CSV; prompts with a picker when omitted.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Initial preset period.
    #[arg(short = 'p', long, value_enum, default_value_t = Preset::OneYear)]
    pub period: Preset,

    /// Reference date (defaults to $PERFVIEW_NOW, then today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub now: Option<NaiveDate>,

    /// Write logs to this file (the TUI owns the terminal, so stderr is unused).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Options for synthetic series generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// First date of the series.
    #[arg(long, default_value = "2010-01-01")]
    pub start: NaiveDate,

    /// Last date of the series.
    #[arg(long, default_value = "2025-12-31")]
    pub end: NaiveDate,

    /// Starting value.
    #[arg(long, default_value_t = 1000.0)]
    pub initial: f64,

    /// Annual drift of log returns.
    #[arg(long, default_value_t = 0.07)]
    pub drift: f64,

    /// Annual volatility of log returns.
    #[arg(long, default_value_t = 0.15)]
    pub vol: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn show_defaults_to_one_year_preset() {
        let cli = Cli::try_parse_from(["perfview", "show", "-f", "nav.csv"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.period_spec(), PeriodSpec::preset(Preset::OneYear));
        assert!(!args.no_plot);
    }

    #[test]
    fn show_from_to_selects_custom() {
        let cli = Cli::try_parse_from([
            "perfview", "show", "-f", "nav.csv", "--from", "2015-04-01", "--to", "2025-04-01",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.period_spec(), PeriodSpec::custom(d(2015, 4, 1), d(2025, 4, 1)));
    }

    #[test]
    fn from_without_to_is_rejected() {
        let res = Cli::try_parse_from(["perfview", "show", "-f", "nav.csv", "--from", "2015-04-01"]);
        assert!(res.is_err());
    }

    #[test]
    fn plot_is_switched_off_with_no_plot_only() {
        let cli = Cli::try_parse_from(["perfview", "show", "-f", "nav.csv", "--no-plot"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert!(args.no_plot);
        assert!(Cli::try_parse_from(["perfview", "show", "-f", "nav.csv", "--plot"]).is_err());
    }

    #[test]
    fn preset_names_parse() {
        let cli = Cli::try_parse_from(["perfview", "show", "-f", "x.csv", "-p", "ytd", "--now", "2024-05-01"]).unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.period, Preset::Ytd);
        assert_eq!(args.now, Some(d(2024, 5, 1)));
    }
}
