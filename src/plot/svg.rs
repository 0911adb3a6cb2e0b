//! SVG file sink.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::chart::ChartSpec;
use crate::plot::draw::{DrawOptions, draw_chart};
use crate::plot::sink::RenderSink;

/// Writes each chart to `<out_dir>/<slug>.svg`.
#[derive(Debug, Clone)]
pub struct SvgSink {
    out_dir: PathBuf,
    size: (u32, u32),
    written: Vec<PathBuf>,
}

impl SvgSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            size: (1200, 600),
            written: Vec::new(),
        }
    }

    /// Paths written so far, in render order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl RenderSink for SvgSink {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), AppError> {
        fs::create_dir_all(&self.out_dir).map_err(|e| {
            AppError::render(format!(
                "Failed to create chart directory '{}': {e}",
                self.out_dir.display()
            ))
        })?;

        let path = self.out_dir.join(format!("{}.svg", chart.slug()));
        write_svg(&path, chart, self.size)?;

        tracing::info!(path = %path.display(), title = %chart.title, "chart written");
        self.written.push(path);
        Ok(())
    }
}

fn write_svg(path: &Path, chart: &ChartSpec, size: (u32, u32)) -> Result<(), AppError> {
    let opts = DrawOptions::svg();
    let render_err = |e: &dyn std::fmt::Display| {
        AppError::render(format!("Failed to render '{}': {e}", path.display()))
    };

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&opts.background).map_err(|e| render_err(&e))?;
    draw_chart(&root, chart, &opts).map_err(|e| render_err(&e))?;
    root.present().map_err(|e| render_err(&e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{MonthPoint, MonthlySeries};
    use crate::plot::chart::{forecast_chart, historical_chart};
    use crate::series::{forecast_series, month_end};

    fn monthly() -> MonthlySeries {
        let points = (1..=6)
            .map(|m| MonthPoint {
                month_end: month_end(NaiveDate::from_ymd_opt(2023, m, 1).unwrap()).unwrap(),
                sales: 100.0 + 10.0 * m as f64,
            })
            .collect();
        MonthlySeries { points }
    }

    #[test]
    fn writes_one_file_per_chart() {
        let pid = std::process::id();
        let dir = std::env::temp_dir().join(format!("sales_forecast_svg_{pid}"));
        let mut sink = SvgSink::new(&dir);

        let history = monthly();
        let forecast = forecast_series(&history, &[170.0; 12]).unwrap();
        sink.render(&historical_chart(&history)).unwrap();
        sink.render(&forecast_chart(&history, &forecast)).unwrap();

        assert_eq!(
            sink.written(),
            &[
                dir.join("monthly_sales_trend.svg"),
                dir.join("sales_forecast_next_12_months.svg"),
            ]
        );
        let svg = fs::read_to_string(&sink.written()[0]).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Monthly Sales Trend"));
    }
}
