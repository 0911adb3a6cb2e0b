//! Render-only chart descriptions.
//!
//! A `ChartSpec` is computed from the series before any sink sees it, so the
//! "what to draw" part is testable without a display surface.

use chrono::{Datelike, NaiveDate};

use crate::domain::{ForecastSeries, MonthPoint, MonthlySeries};

/// Line pattern of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Solid,
    Dashed,
}

/// 8-bit RGB colour, independent of any drawing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SeriesColor {
    pub const BLUE: SeriesColor = SeriesColor {
        r: 31,
        g: 119,
        b: 180,
    };
    pub const ORANGE: SeriesColor = SeriesColor {
        r: 255,
        g: 165,
        b: 0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
    pub line: LineKind,
    pub color: SeriesColor,
    pub markers: bool,
}

/// Background grid appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub dashed: bool,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
    pub grid: GridStyle,
    pub legend: bool,
}

const LIGHT_DASHED_GRID: GridStyle = GridStyle {
    dashed: true,
    alpha: 0.6,
};

/// Chart of the monthly series alone.
pub fn historical_chart(monthly: &MonthlySeries) -> ChartSpec {
    ChartSpec {
        title: "Monthly Sales Trend".to_string(),
        x_label: "Date".to_string(),
        y_label: "Sales".to_string(),
        series: vec![actual_series(monthly, "Monthly Sales")],
        grid: LIGHT_DASHED_GRID,
        legend: false,
    }
}

/// Historical series overlaid with the forecast on shared axes.
pub fn forecast_chart(monthly: &MonthlySeries, forecast: &ForecastSeries) -> ChartSpec {
    let forecasted = ChartSeries {
        label: "Forecasted Sales".to_string(),
        points: xy(&forecast.points),
        line: LineKind::Dashed,
        color: SeriesColor::ORANGE,
        markers: true,
    };

    ChartSpec {
        title: format!("Sales Forecast (Next {} Months)", forecast.len()),
        x_label: "Date".to_string(),
        y_label: "Sales".to_string(),
        series: vec![actual_series(monthly, "Actual Sales"), forecasted],
        grid: LIGHT_DASHED_GRID,
        legend: true,
    }
}

fn actual_series(monthly: &MonthlySeries, label: &str) -> ChartSeries {
    ChartSeries {
        label: label.to_string(),
        points: xy(&monthly.points),
        line: LineKind::Solid,
        color: SeriesColor::BLUE,
        markers: true,
    }
}

fn xy(points: &[MonthPoint]) -> Vec<(NaiveDate, f64)> {
    points.iter().map(|p| (p.month_end, p.sales)).collect()
}

impl ChartSpec {
    /// File-name friendly title, e.g. `monthly_sales_trend`.
    pub fn slug(&self) -> String {
        let mut out = String::with_capacity(self.title.len());
        for ch in self.title.chars() {
            if ch.is_ascii_alphanumeric() {
                out.push(ch.to_ascii_lowercase());
            } else if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
        }
        out.trim_end_matches('_').to_string()
    }

    /// Min/max x over all series, as day numbers (see [`date_to_x`]).
    pub fn data_x_range(&self) -> Option<(f64, f64)> {
        finite_range(self.all_points().map(|(d, _)| date_to_x(d)))
    }

    /// Min/max y over all series.
    pub fn data_y_range(&self) -> Option<(f64, f64)> {
        finite_range(self.all_points().map(|(_, v)| v))
    }

    fn all_points(&self) -> impl Iterator<Item = (NaiveDate, f64)> {
        self.series.iter().flat_map(|s| s.points.iter().copied())
    }

    /// X axis bounds with a half-month margin on each side.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        let (lo, hi) = self.data_x_range()?;
        Some((lo - 15.0, hi + 15.0))
    }

    /// Y axis bounds padded by 5% of the span (or ±1 for a flat series).
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let (lo, hi) = self.data_y_range()?;
        Some(pad_range(lo, hi, 0.05))
    }
}

/// Dates map to days since 0001-01-01 so plotting can use a plain `f64` axis.
pub fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Inverse of [`date_to_x`], formatted as `YYYY-MM` for tick labels.
pub fn x_to_month_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Inverse of [`date_to_x`], formatted as `YYYY-MM-DD`.
pub fn x_to_date_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.to_string())
        .unwrap_or_default()
}

pub fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    if span < 1e-12 {
        return (min - 1.0, max + 1.0);
    }
    let pad = span * frac;
    (min - pad, max + pad)
}

fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::forecast_series;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn monthly() -> MonthlySeries {
        MonthlySeries {
            points: vec![
                MonthPoint {
                    month_end: d(2023, 1, 31),
                    sales: 150.0,
                },
                MonthPoint {
                    month_end: d(2023, 2, 28),
                    sales: 75.0,
                },
            ],
        }
    }

    #[test]
    fn historical_chart_is_single_solid_series() {
        let chart = historical_chart(&monthly());
        assert_eq!(chart.title, "Monthly Sales Trend");
        assert_eq!(chart.x_label, "Date");
        assert_eq!(chart.y_label, "Sales");
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].line, LineKind::Solid);
        assert!(chart.series[0].markers);
        assert!(chart.grid.dashed);
        assert_eq!(chart.slug(), "monthly_sales_trend");
    }

    #[test]
    fn forecast_chart_overlays_dashed_orange_forecast() {
        let history = monthly();
        let forecast = forecast_series(&history, &[80.0; 12]).unwrap();
        let chart = forecast_chart(&history, &forecast);

        assert_eq!(chart.title, "Sales Forecast (Next 12 Months)");
        assert_eq!(chart.slug(), "sales_forecast_next_12_months");
        assert!(chart.legend);
        assert_eq!(chart.series[0].label, "Actual Sales");
        assert_eq!(chart.series[1].label, "Forecasted Sales");
        assert_eq!(chart.series[1].line, LineKind::Dashed);
        assert_eq!(chart.series[1].color, SeriesColor::ORANGE);
        assert_eq!(chart.series[1].points.len(), 12);
        assert_eq!(chart.series[1].points[0].0, d(2023, 3, 31));
    }

    #[test]
    fn bounds_cover_all_series() {
        let history = monthly();
        let forecast = forecast_series(&history, &[300.0; 12]).unwrap();
        let chart = forecast_chart(&history, &forecast);

        let (y0, y1) = chart.y_bounds().unwrap();
        assert!(y0 < 75.0 && y1 > 300.0);
        let (x0, x1) = chart.data_x_range().unwrap();
        assert_eq!(x_to_date_label(x0), "2023-01-31");
        assert_eq!(x_to_date_label(x1), "2024-02-29");
        assert_eq!(x_to_month_label(x1), "2024-02");
    }

    #[test]
    fn empty_chart_has_no_bounds() {
        let chart = historical_chart(&MonthlySeries::default());
        assert!(chart.x_bounds().is_none());
        assert!(chart.y_bounds().is_none());
    }
}
