//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - indexed series: `*` line (x = calendar position, y = index level)
//! - baseline at 100: `.` row

use crate::domain::{AxisBounds, IndexedPoint};
use crate::engine::INDEX_BASE;

/// Render the indexed series within the given axis bounds.
pub fn render_indexed_plot(points: &[IndexedPoint], axis: &AxisBounds, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return "Plot: (no points)\n".to_string();
    };

    let span_days = (last.timestamp - first.timestamp).num_days() as f64;
    let (y_min, y_max) = (axis.min, axis.max);

    let mut grid = vec![vec![' '; width]; height];

    // Baseline first so the series can overlay it.
    let base_row = map_y(INDEX_BASE, y_min, y_max, height);
    for cell in grid[base_row].iter_mut() {
        *cell = '.';
    }

    let mut prev = None;
    for p in points {
        let t = (p.timestamp - first.timestamp).num_days() as f64;
        let x = map_x(t, span_days, width);
        let y = map_y(p.indexed_value, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, '*'),
            None => grid[y][x] = '*',
        }
        prev = Some((x, y));
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{}, {}] | index=[{y_min:.2}, {y_max:.2}] (step {})\n",
        first.timestamp, last.timestamp, axis.interval
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn map_x(t: f64, span: f64, width: usize) -> usize {
    if span <= 0.0 {
        return 0;
    }
    let u = (t / span).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    if y_max <= y_min {
        return height - 1;
    }
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish); overwrites whatever is underneath.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(date: NaiveDate, indexed_value: f64) -> IndexedPoint {
        IndexedPoint {
            timestamp: date,
            indexed_value,
            actual_value: indexed_value,
            annualized_return_since_inception: Some(0.0),
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 1, 10).unwrap();
        let points = vec![point(start, 100.0), point(end, 110.0)];
        let axis = AxisBounds { min: 98.0, max: 110.0, interval: 2.0 };

        let txt = render_indexed_plot(&points, &axis, 10, 5);
        let expected = concat!(
            "Plot: dates=[2020-01-01, 2020-01-10] | index=[98.00, 110.00] (step 2)\n",
            "        **\n",
            "     ***  \n",
            "  ***     \n",
            "**........\n",
            "          \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_points_render_placeholder() {
        let axis = AxisBounds { min: 98.0, max: 102.0, interval: 2.0 };
        assert_eq!(render_indexed_plot(&[], &axis, 20, 5), "Plot: (no points)\n");
    }

    #[test]
    fn single_point_sits_on_baseline() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let axis = AxisBounds { min: 98.0, max: 102.0, interval: 2.0 };
        let txt = render_indexed_plot(&[point(start, 100.0)], &axis, 10, 5);
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows[2], "*.........");
    }
}
