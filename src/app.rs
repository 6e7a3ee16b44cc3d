//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging and resolves the reference date
//! - runs period resolution and prints reports/plots
//! - writes optional exports
//! - generates synthetic series

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, SampleArgs, ShowArgs, TableArgs, TuiArgs};
use crate::domain::{SampleConfig, ViewConfig};
use crate::error::AppError;

pub mod pipeline;

/// Environment variable overriding the reference date (`YYYY-MM-DD`).
pub const NOW_ENV: &str = "PERFVIEW_NOW";

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Entry point for the `perfview` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; it only supplies defaults like PERFVIEW_NOW/RUST_LOG.
    let _ = dotenvy::dotenv();

    // We want `perfview` and `perfview -f nav.csv` to behave like `perfview tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Show(args) => {
            init_logging(None)?;
            handle_show(args)
        }
        Command::Table(args) => {
            init_logging(None)?;
            handle_table(args)
        }
        Command::Sample(args) => {
            init_logging(None)?;
            handle_sample(args)
        }
        Command::Tui(args) => {
            // The TUI owns the terminal; only log when asked to, and never to stderr.
            if let Some(path) = &args.log_file {
                init_logging(Some(path.as_path()))?;
            }
            handle_tui(args)
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Logs go to stderr unless `log_file` is given. Filtering follows `RUST_LOG`,
/// defaulting to `warn`.
fn init_logging(log_file: Option<&Path>) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .map_err(|e| AppError::new(2, format!("Failed to create log file '{}': {e}", path.display())))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber may already be installed (e.g., when embedded); keep that one.
    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = view_config_from_args(&args)?;
    let run = pipeline::run_view(&config)?;
    let view = &run.view;

    println!("{}", crate::report::format_dataset_summary(&run.ingest, config.now));
    println!("{}", crate::report::format_result(&view.result, &config.period));

    if config.plot {
        if let Some(axis) = &view.axis {
            let plot = crate::plot::render_indexed_plot(&view.points, axis, config.plot_width, config.plot_height);
            println!("{plot}");
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_series {
        crate::io::export::write_indexed_csv(path, &view.points)?;
        println!("Wrote indexed series to {}", path.display());
    }
    if let Some(path) = &config.export_result {
        let doc = crate::io::result::ResultFile::new(config.now, config.period, &view.result, &view.points, view.axis);
        crate::io::result::write_result_json(path, &doc)?;
        println!("Wrote result to {}", path.display());
    }

    Ok(())
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let now = resolve_now(args.now)?;
    let ingest = crate::io::ingest::load_series(&args.file)?;
    let rows = crate::engine::period_table(&ingest.samples, now);

    println!("{}", crate::report::format_dataset_summary(&ingest, now));
    println!("{}", crate::report::format_period_table(&rows));
    Ok(())
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let now = resolve_now(args.now)?;
    crate::tui::run(args, now)
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = sample_config_from_args(&args);
    let series = crate::data::generate_series(&config)?;
    crate::io::export::write_series_csv(&args.output, &series)?;
    println!("Wrote {} samples to {}", series.len(), args.output.display());
    Ok(())
}

pub fn view_config_from_args(args: &ShowArgs) -> Result<ViewConfig, AppError> {
    Ok(ViewConfig {
        csv_path: args.file.clone(),
        now: resolve_now(args.now)?,
        period: args.period_spec(),
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_series: args.export_series.clone(),
        export_result: args.export_result.clone(),
    })
}

pub fn sample_config_from_args(args: &SampleArgs) -> SampleConfig {
    SampleConfig {
        start: args.start,
        end: args.end,
        initial_value: args.initial,
        drift: args.drift,
        volatility: args.vol,
        seed: args.seed,
    }
}

/// Pick the reference date: the flag, then `PERFVIEW_NOW`, then the local date.
pub fn resolve_now(flag: Option<NaiveDate>) -> Result<NaiveDate, AppError> {
    now_from_sources(flag, std::env::var(NOW_ENV).ok().as_deref())
}

fn now_from_sources(flag: Option<NaiveDate>, env_value: Option<&str>) -> Result<NaiveDate, AppError> {
    if let Some(now) = flag {
        return Ok(now);
    }
    match env_value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| AppError::new(2, format!("Invalid {NOW_ENV} '{raw}' (expected YYYY-MM-DD): {e}"))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Rewrite argv so `perfview` defaults to `perfview tui`.
///
/// Rules:
/// - `perfview`                      -> `perfview tui`
/// - `perfview -f nav.csv ...`       -> `perfview tui -f nav.csv ...`
/// - `perfview --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "table" | "tui" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["perfview"])), argv(&["perfview", "tui"]));
    }

    #[test]
    fn leading_flags_are_tui_flags() {
        assert_eq!(
            rewrite_args(argv(&["perfview", "-f", "nav.csv"])),
            argv(&["perfview", "tui", "-f", "nav.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        assert_eq!(rewrite_args(argv(&["perfview", "table", "-f", "x.csv"])), argv(&["perfview", "table", "-f", "x.csv"]));
        assert_eq!(rewrite_args(argv(&["perfview", "--help"])), argv(&["perfview", "--help"]));
    }

    #[test]
    fn now_prefers_flag_then_env() {
        let flag = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(now_from_sources(Some(flag), Some("2020-01-01")).unwrap(), flag);
        assert_eq!(
            now_from_sources(None, Some(" 2020-01-01 ")).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(now_from_sources(None, Some("01/02/2020")).unwrap_err().exit_code(), 2);
        assert!(now_from_sources(None, Some("")).is_ok());
    }

    #[test]
    fn show_args_map_to_view_config() {
        let cli = crate::cli::Cli::try_parse_from([
            "perfview", "show", "-f", "nav.csv", "--no-plot", "--now", "2024-12-31", "-p", "3y",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        let config = view_config_from_args(&args).unwrap();
        assert!(!config.plot);
        assert_eq!(config.now, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(config.period, crate::domain::PeriodSpec::preset(crate::domain::Preset::ThreeYears));
    }
}
