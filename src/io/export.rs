//! Export the monthly history and its forecast to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{ForecastSeries, MonthlySeries};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct ExportRow {
    month_end: NaiveDate,
    sales: f64,
    kind: &'static str,
}

/// Write `month_end,sales,kind` rows: history first (`actual`), then `forecast`.
pub fn write_series_csv(
    path: &Path,
    monthly: &MonthlySeries,
    forecast: &ForecastSeries,
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| export_error(path, e))?;

    let actual = monthly.points.iter().map(|p| (p, "actual"));
    let predicted = forecast.points.iter().map(|p| (p, "forecast"));
    for (p, kind) in actual.chain(predicted) {
        writer
            .serialize(ExportRow {
                month_end: p.month_end,
                sales: p.sales,
                kind,
            })
            .map_err(|e| export_error(path, e))?;
    }

    writer.flush().map_err(|e| export_error(path, e))?;
    Ok(())
}

fn export_error(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::export(format!("Failed to write export CSV '{}': {e}", path.display()))
}
