//! Formatted terminal output for resolved periods.
//!
//! We keep formatting code in one place so:
//! - the engine stays clean and testable
//! - output changes are localized (important for snapshot tests)

use chrono::NaiveDate;

use crate::domain::{PeriodSpec, ResolvedResult};
use crate::engine::PeriodRow;
use crate::io::ingest::IngestedSeries;

/// Format the dataset header (what was loaded, and what was dropped).
pub fn format_dataset_summary(ingest: &IngestedSeries, now: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str("=== perfview - Period Returns ===\n");
    out.push_str(&format!("As-of: {now}\n"));
    out.push_str(&format!(
        "Series: n={} | dates=[{}, {}] | values=[{:.2}, {:.2}]\n",
        ingest.stats.n_points,
        ingest.stats.first_date,
        ingest.stats.last_date,
        ingest.stats.value_min,
        ingest.stats.value_max,
    ));
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "Dropped {} of {} rows (first: line {}: {})\n",
            ingest.row_errors.len(),
            ingest.rows_read,
            ingest.row_errors[0].line,
            ingest.row_errors[0].message,
        ));
    }
    out
}

/// Format the summary of a single resolved period.
pub fn format_result(result: &ResolvedResult, period: &PeriodSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("Period: {}\n", period_name(period)));

    let (Some(start), Some(end), Some(sv), Some(ev), Some(ret)) = (
        result.start_date,
        result.end_date,
        result.start_value,
        result.end_value,
        result.return_value,
    ) else {
        out.push_str("No data at or before the reference date.\n");
        return out;
    };

    out.push_str(&format!("Range: {start} -> {end} ({} points)\n", result.filtered_series.len()));
    out.push_str(&format!("Start: {}\n", fmt_value(sv)));
    out.push_str(&format!("End:   {}\n", fmt_value(ev)));
    out.push_str(&format!(
        "Return: {}{}\n",
        fmt_pct(ret),
        if result.is_annualized { " (annualized)" } else { "" }
    ));
    if let Some(inception) = result.inception() {
        out.push_str(&format!(
            "Inception: {} @ {}\n",
            inception.date,
            fmt_value(inception.value)
        ));
    }
    out
}

/// Format the all-presets table.
pub fn format_period_table(rows: &[PeriodRow]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<6} {:<10} {:<10} {:>12} {:>12} {:>10} {:<4}\n",
            "period", "start", "end", "start_val", "end_val", "return", "ann"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<6} {:-<10} {:-<10} {:-<12} {:-<12} {:-<10} {:-<4}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for row in rows {
        let label = if row.truncated {
            format!("{}*", row.preset.label())
        } else {
            row.preset.label().to_string()
        };

        let line = match &row.outcome {
            Ok(r) => match (r.start_date, r.end_date, r.start_value, r.end_value, r.return_value) {
                (Some(s), Some(e), Some(sv), Some(ev), Some(ret)) => format!(
                    "{:<6} {:<10} {:<10} {:>12.2} {:>12.2} {:>10} {:<4}",
                    label,
                    s.to_string(),
                    e.to_string(),
                    sv,
                    ev,
                    fmt_pct(ret),
                    if r.is_annualized { "yes" } else { "no" }
                ),
                _ => format!("{label:<6} (no data)"),
            },
            Err(err) => format!("{label:<6} error: {err}"),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if rows.iter().any(|r| r.truncated) {
        out.push_str("* period starts before the first sample; measured since inception\n");
    }
    out
}

/// Long display name for a period selection.
pub fn period_name(period: &PeriodSpec) -> String {
    match period {
        PeriodSpec::Preset { preset } => preset.display_name().to_string(),
        PeriodSpec::Custom { start, end } => format!("Custom ({start} to {end})"),
    }
}

/// Signed percentage with two decimals (`0.1234` -> `+12.34%`).
pub fn fmt_pct(v: f64) -> String {
    format!("{:+.2}%", v * 100.0)
}

/// Value with thousands separators and two decimals.
pub fn fmt_value(v: f64) -> String {
    let s = format!("{:.2}", v.abs());
    let (int_part, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}
