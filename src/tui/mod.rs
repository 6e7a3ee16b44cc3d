//! Ratatui-based terminal UI.
//!
//! The TUI loads one series, then lets you cycle through preset periods or type
//! a custom range. Each change re-resolves the period and redraws the indexed
//! chart, without re-reading the file.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};
use tracing::{debug, info};

use crate::app::pipeline::{view_period, PeriodView};
use crate::cli::TuiArgs;
use crate::domain::{AxisBounds, PeriodSpec, Preset};
use crate::engine::INDEX_BASE;
use crate::error::AppError;
use crate::io::ingest::IngestedSeries;
use crate::report::{fmt_pct, fmt_value, period_name};

mod plotters_chart;

use plotters_chart::IndexPlottersChart;

/// Start the TUI.
///
/// Without `-f`, the CSV picker runs first (before the terminal switches modes).
pub fn run(args: TuiArgs, now: NaiveDate) -> Result<(), AppError> {
    let path = match args.file {
        Some(path) => crate::cli::picker::validate_csv_path(&path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };
    let ingest = crate::io::ingest::load_series(&path)?;
    info!(path = %path.display(), points = ingest.samples.len(), %now, "tui started");

    let mut app = App::new(path, ingest, now, args.period);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    path: PathBuf,
    ingest: IngestedSeries,
    now: NaiveDate,
    period: PeriodSpec,
    /// Preset that ←/→ step from, also while a custom range is shown.
    preset: Preset,
    range_input: String,
    editing_range: bool,
    status: String,
    view: Option<PeriodView>,
}

impl App {
    fn new(path: PathBuf, ingest: IngestedSeries, now: NaiveDate, preset: Preset) -> Self {
        let mut app = Self {
            path,
            ingest,
            now,
            period: PeriodSpec::preset(preset),
            preset,
            range_input: String::new(),
            editing_range: false,
            status: String::new(),
            view: None,
        };
        app.recompute();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_range {
            self.handle_range_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right => self.select_preset(self.preset.next()),
            KeyCode::Left => self.select_preset(self.preset.prev()),
            KeyCode::Char('c') => {
                self.editing_range = true;
                if self.range_input.is_empty() {
                    if let Some(view) = &self.view {
                        if let (Some(s), Some(e)) = (view.result.start_date, view.result.end_date) {
                            self.range_input = format!("{s} {e}");
                        }
                    }
                }
                self.status = "Custom range: YYYY-MM-DD YYYY-MM-DD. Enter to apply, Esc to cancel.".to_string();
            }
            _ => {}
        }
        false
    }

    fn handle_range_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_range = false;
                self.status = "Custom range canceled.".to_string();
            }
            KeyCode::Enter => match parse_custom_range(&self.range_input) {
                Ok((start, end)) => {
                    self.editing_range = false;
                    self.period = PeriodSpec::custom(start, end);
                    self.recompute();
                }
                Err(msg) => self.status = msg,
            },
            KeyCode::Backspace => {
                self.range_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' || c == ' ' {
                    self.range_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn select_preset(&mut self, preset: Preset) {
        self.preset = preset;
        self.period = PeriodSpec::preset(preset);
        self.recompute();
    }

    fn recompute(&mut self) {
        match view_period(&self.ingest.samples, self.period, self.now) {
            Ok(view) => {
                self.status = match view.result.return_value {
                    Some(ret) => format!("{}: {}", self.period.label(), fmt_pct(ret)),
                    None => "No data at or before the reference date.".to_string(),
                };
                debug!(period = %self.period.label(), points = view.points.len(), "period view updated");
                self.view = Some(view);
            }
            Err(err) => {
                self.status = err.to_string();
                self.view = None;
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("perfview", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " - {} | n={} | as-of {}",
                self.path.display(),
                self.ingest.stats.n_points,
                self.now
            )),
        ]));

        // Preset strip; the active preset is highlighted unless a custom range is shown.
        let mut tabs = Vec::new();
        for preset in Preset::ALL {
            let active = matches!(self.period, PeriodSpec::Preset { preset: p } if p == preset);
            let style = if active {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            tabs.push(Span::styled(format!(" {} ", preset.label()), style));
        }
        if matches!(self.period, PeriodSpec::Custom { .. }) {
            tabs.push(Span::styled(
                " custom ",
                Style::default().fg(Color::Black).bg(Color::White),
            ));
        }
        lines.push(Line::from(tabs));

        if let Some(view) = &self.view {
            let r = &view.result;
            if let (Some(s), Some(e), Some(sv), Some(ev), Some(ret)) =
                (r.start_date, r.end_date, r.start_value, r.end_value, r.return_value)
            {
                let ret_color = if ret >= 0.0 { Color::Green } else { Color::Red };
                lines.push(Line::from(vec![
                    Span::raw(format!("{}: {s} → {e} | return ", period_name(&self.period))),
                    Span::styled(
                        fmt_pct(ret),
                        Style::default().fg(ret_color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(if r.is_annualized { " (annualized)" } else { "" }),
                ]));
                lines.push(Line::from(Span::styled(
                    format!(
                        "start {} | end {} | points {}",
                        fmt_value(sv),
                        fmt_value(ev),
                        r.filtered_series.len()
                    ),
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Indexed (start = 100)").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some((view, axis)) = self.view.as_ref().and_then(|v| v.axis.map(|a| (v, a))) else {
            let msg = Paragraph::new("No points to chart for this period.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (series, x_bounds, y_bounds) = chart_series(view, &axis);
        let rising = view.result.return_value.map_or(true, |r| r >= 0.0);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = IndexPlottersChart {
            series: &series,
            baseline: INDEX_BASE,
            x_bounds,
            y_bounds,
            x_label: "date",
            y_label: "index",
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_index,
            line_color: if rising { RGBColor(0, 255, 0) } else { RGBColor(255, 0, 0) },
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, &axis);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut spans = Vec::new();
        if self.editing_range {
            spans.push(Span::styled("range> ", Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(
                self.range_input.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" | "));
        } else {
            spans.push(Span::styled(
                "←/→ period  c custom range  q quit",
                Style::default().fg(Color::Gray),
            ));
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(&self.status, Style::default().fg(Color::Yellow)));

        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Parse `YYYY-MM-DD YYYY-MM-DD` into a custom range.
fn parse_custom_range(input: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let [start, end] = parts.as_slice() else {
        return Err("Enter two dates: YYYY-MM-DD YYYY-MM-DD".to_string());
    };
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{s}': {e}"))
    };
    Ok((parse(*start)?, parse(*end)?))
}

/// Build the chart series and bounds for Plotters.
///
/// X is the date ordinal (days from CE) so tick formatters can map back to dates.
fn chart_series(view: &PeriodView, axis: &AxisBounds) -> (Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let series: Vec<(f64, f64)> = view
        .points
        .iter()
        .map(|p| (p.timestamp.num_days_from_ce() as f64, p.indexed_value))
        .collect();

    let (mut x0, mut x1) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => (0.0, 1.0),
    };
    if x1 <= x0 {
        x0 -= 1.0;
        x1 += 1.0;
    }

    (series, [x0, x1], [axis.min, axis.max])
}

fn fmt_axis_date(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_axis_index(v: f64) -> String {
    format!("{v:.0}")
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 6,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Overlay tick labels: dates along x, the axis interval ticks along y.
fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    axis: &AxisBounds,
) {
    let style = Style::default().fg(Color::Gray);

    let x_ticks = 4usize;
    for i in 0..x_ticks {
        let u = i as f64 / (x_ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_date(x_val);
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2).max(inner.x);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len.min((inner.x + inner.width).saturating_sub(start)),
                height: 1,
            },
        );
    }

    let span = axis.max - axis.min;
    let mut last_row: Option<u16> = None;
    for tick in axis.ticks() {
        let u = if span > 0.0 { (tick - axis.min) / span } else { 0.0 };
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        // Dense ticks on short charts would overwrite each other.
        if last_row.is_some_and(|row| row.abs_diff(y) < 2) {
            continue;
        }
        last_row = Some(y);

        let label = fmt_axis_index(tick);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("date")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("index")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sample;
    use crate::io::ingest::parse_series_from_reader;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn app() -> App {
        let csv = "date,value\n2020-01-01,1000\n2021-01-01,1100\n2022-01-01,1210\n";
        let ingest = parse_series_from_reader(csv.as_bytes()).unwrap();
        App::new(PathBuf::from("nav.csv"), ingest, d(2022, 6, 1), Preset::OneYear)
    }

    #[test]
    fn custom_range_parsing() {
        assert_eq!(
            parse_custom_range(" 2015-04-01   2025-04-01 ").unwrap(),
            (d(2015, 4, 1), d(2025, 4, 1))
        );
        assert!(parse_custom_range("2015-04-01").is_err());
        assert!(parse_custom_range("2015-04-01 2025-13-01").unwrap_err().contains("2025-13-01"));
    }

    #[test]
    fn arrows_cycle_presets() {
        let mut app = app();
        assert_eq!(app.period, PeriodSpec::preset(Preset::OneYear));
        app.handle_key(KeyCode::Right);
        assert_eq!(app.period, PeriodSpec::preset(Preset::ThreeYears));
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.period, PeriodSpec::preset(Preset::Ytd));
        assert!(app.view.is_some());
    }

    #[test]
    fn custom_range_entry_applies_on_enter() {
        let mut app = app();
        app.handle_key(KeyCode::Char('c'));
        assert!(app.editing_range);
        app.range_input.clear();
        for c in "2020-01-01 2022-01-01".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        assert!(!app.handle_key(KeyCode::Enter));
        assert!(!app.editing_range);
        assert_eq!(app.period, PeriodSpec::custom(d(2020, 1, 1), d(2022, 1, 1)));
        let ret = app.view.as_ref().unwrap().result.return_value.unwrap();
        assert!((ret - 0.1).abs() < 1e-12);
    }

    #[test]
    fn inverted_custom_range_reports_error() {
        let mut app = app();
        app.handle_key(KeyCode::Char('c'));
        app.range_input = "2022-01-01 2020-01-01".to_string();
        app.handle_key(KeyCode::Enter);
        assert!(app.view.is_none());
        assert!(app.status.contains("after"), "status: {}", app.status);
    }

    #[test]
    fn q_quits_only_outside_edit_mode() {
        let mut app = app();
        app.handle_key(KeyCode::Char('c'));
        assert!(!app.handle_key(KeyCode::Char('q')));
        app.handle_key(KeyCode::Esc);
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn chart_series_uses_date_ordinals() {
        let samples = vec![Sample::new(d(2020, 1, 1), 100.0), Sample::new(d(2020, 1, 11), 110.0)];
        let view = view_period(&samples, PeriodSpec::preset(Preset::SinceInception), d(2020, 2, 1)).unwrap();
        let axis = view.axis.unwrap();
        let (series, x_bounds, y_bounds) = chart_series(&view, &axis);
        assert_eq!(series.len(), 2);
        assert_eq!(x_bounds[1] - x_bounds[0], 10.0);
        assert_eq!(y_bounds, [axis.min, axis.max]);
        assert_eq!(fmt_axis_date(x_bounds[0]), "2020-01-01");
    }
}
