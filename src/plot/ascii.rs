//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks without a graphical surface
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - solid lines: `-`, dashed lines: `.`
//! - markers: `o` for the first series, `*` for the second, `+` after that

use std::io::Write;

use crate::error::AppError;
use crate::plot::chart::{ChartSpec, LineKind, date_to_x, pad_range, x_to_date_label};
use crate::plot::sink::RenderSink;

const MARKERS: [char; 3] = ['o', '*', '+'];

/// Writes an ASCII rendering of each chart to `out`.
pub struct AsciiSink<W: Write> {
    out: W,
    width: usize,
    height: usize,
}

impl<W: Write> AsciiSink<W> {
    pub fn new(out: W, width: usize, height: usize) -> Self {
        Self { out, width, height }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for AsciiSink<W> {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), AppError> {
        let text = render_ascii_chart(chart, self.width, self.height);
        writeln!(self.out, "{text}")
            .and_then(|_| self.out.flush())
            .map_err(|e| AppError::render(format!("Failed to write ASCII chart: {e}")))
    }
}

/// Render `chart` into a `width` × `height` character grid with a small header.
pub fn render_ascii_chart(chart: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut out = String::new();
    out.push_str(&chart.title);
    out.push('\n');

    let x_range = chart.data_x_range();
    let y_range = chart.data_y_range();
    let (Some((x_min, x_max)), Some((y_min, y_max))) = (x_range, y_range) else {
        out.push_str("(no data)\n");
        return out;
    };
    let (x_min, x_max) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 1.0, x_max + 1.0)
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let map = |x: f64, y: f64| {
        (
            map_x(x, x_min, x_max, width),
            map_y(y, y_min, y_max, height),
        )
    };

    // Lines first so markers overlay them.
    for series in &chart.series {
        let ch = match series.line {
            LineKind::Solid => '-',
            LineKind::Dashed => '.',
        };
        let mut prev = None;
        for &(d, v) in &series.points {
            let (x, y) = map(date_to_x(d), v);
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, ch),
                None => grid[y][x] = ch,
            }
            prev = Some((x, y));
        }
    }

    for (idx, series) in chart.series.iter().enumerate() {
        if !series.markers {
            continue;
        }
        let marker = MARKERS[idx.min(MARKERS.len() - 1)];
        for &(d, v) in &series.points {
            let (x, y) = map(date_to_x(d), v);
            grid[y][x] = marker;
        }
    }

    let (first, last) = (x_to_date_label(x_min), x_to_date_label(x_max));
    out.push_str(&format!("x=[{first}, {last}] | y=[{y_min:.2}, {y_max:.2}]\n"));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    if chart.legend {
        for (idx, series) in chart.series.iter().enumerate() {
            let style = match series.line {
                LineKind::Solid => "solid",
                LineKind::Dashed => "dashed",
            };
            let marker = MARKERS[idx.min(MARKERS.len() - 1)];
            out.push_str(&format!("{marker} {} ({style})\n", series.label));
        }
    }

    out
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
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
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
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
