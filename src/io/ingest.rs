//! CSV load and sales cleaning.
//!
//! Load turns a retail transactions export into a `SalesTable`: the column
//! list plus one `(line, date, raw sales)` record per row. Clean then coerces
//! the sales text to numbers and drops whatever has no date or does not parse.
//!
//! Design goals:
//! - **Fail fast on the table** (missing file, bad bytes, missing columns,
//!   malformed rows, unparseable dates are all fatal)
//! - **Lossy but accounted cleaning** (blank dates and bad sales values are
//!   dropped and listed in a `CleanReport`, never raised)
//! - **Deterministic behavior** (same file, same output)

use std::fs;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use encoding_rs::Encoding;

use crate::domain::{
    CleanReport, CleanedSeries, DropReason, DroppedRow, PipelineConfig, SalesObservation,
    SalesRecord, SalesTable,
};
use crate::error::AppError;

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Read the configured CSV fully into memory and parse it.
pub fn load_sales_table(config: &PipelineConfig) -> Result<SalesTable, AppError> {
    load_sales_table_with(config, parse_sales_table)
}

/// Same as [`load_sales_table`], with the text-to-table step supplied by the caller.
///
/// The existence check runs first; `parse` is never called for a missing path.
pub fn load_sales_table_with<F>(config: &PipelineConfig, parse: F) -> Result<SalesTable, AppError>
where
    F: FnOnce(&str, &PipelineConfig) -> Result<SalesTable, AppError>,
{
    let encoding = resolve_encoding(&config.encoding)?;
    let path = &config.csv_path;

    if !path.exists() {
        let message = format!("Dataset not found at {}", path.display());
        return Err(AppError::missing_input(message));
    }

    let bytes = fs::read(path)
        .map_err(|e| AppError::read(format!("Error reading CSV '{}': {e}", path.display())))?;

    // `decode` sniffs a BOM first, so a UTF-8 export with BOM still reads cleanly.
    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        let (shown, label) = (path.display(), used.name());
        return Err(AppError::read(format!(
            "Error reading CSV '{shown}': invalid byte sequence for encoding {label}"
        )));
    }

    parse(&text, config)
}

/// Resolve an encoding label such as `latin1` or `utf-8`.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, AppError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| AppError::config(format!("Unknown text encoding '{label}'.")))
}

/// Parse decoded CSV text into a `SalesTable`.
pub fn parse_sales_table(text: &str, config: &PipelineConfig) -> Result<SalesTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::read(format!("Error reading CSV headers: {e}")))?
        .clone();
    let columns = column_names(&headers);

    let date_idx = find_column(&columns, &config.date_column)?;
    let sales_idx = find_column(&columns, &config.sales_column)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::read(format!("Error reading CSV: {e}")))?;
        // Header is line 1; fall back to the row index when the reader has no position.
        let line = record.position().map_or(idx + 2, |p| p.line() as usize);

        let date_text = record.get(date_idx).unwrap_or_default();
        let date = parse_date(date_text).map_err(|e| {
            AppError::read(format!(
                "Error reading CSV: line {line}, column `{}`: {e}",
                config.date_column
            ))
        })?;

        records.push(SalesRecord {
            line,
            date,
            sales: record.get(sales_idx).unwrap_or_default().to_string(),
        });
    }

    Ok(SalesTable {
        columns,
        date_column: config.date_column.clone(),
        sales_column: config.sales_column.clone(),
        records,
    })
}

/// Coerce sales to numbers and drop the rows without a date or a numeric sales value.
pub fn clean_sales(table: &SalesTable) -> CleanedSeries {
    let mut observations = Vec::with_capacity(table.records.len());
    let mut dropped = Vec::new();

    for record in &table.records {
        let Some(date) = record.date else {
            dropped.push(DroppedRow {
                line: record.line,
                reason: DropReason::MissingDate,
                value: String::new(),
            });
            continue;
        };
        match coerce_numeric(&record.sales) {
            Some(sales) => observations.push(SalesObservation { date, sales }),
            None => dropped.push(DroppedRow {
                line: record.line,
                reason: DropReason::NonNumericSales,
                value: record.sales.clone(),
            }),
        }
    }

    let report = CleanReport {
        rows_in: table.records.len(),
        rows_kept: observations.len(),
        dropped,
    };

    CleanedSeries {
        observations,
        report,
    }
}

/// Numeric coercion: empty, non-numeric and non-finite values become `None`.
pub fn coerce_numeric(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn column_names(headers: &StringRecord) -> Vec<String> {
    headers.iter().map(normalize_header_name).collect()
}

fn normalize_header_name(name: &str) -> String {
    // A UTF-8 BOM shows up as U+FEFF after UTF-8 decoding, or as "ï»¿" when the
    // file is read as Latin-1. Either way it is not part of the column name.
    name.trim()
        .trim_start_matches('\u{feff}')
        .trim_start_matches("\u{ef}\u{bb}\u{bf}")
        .to_string()
}

fn find_column(columns: &[String], name: &str) -> Result<usize, AppError> {
    columns.iter().position(|c| c == name).ok_or_else(|| {
        AppError::read(format!(
            "Error reading CSV: missing column `{name}` (found: {})",
            columns.join(", ")
        ))
    })
}

/// An empty cell is a missing date (`None`); anything else must parse.
fn parse_date(s: &str) -> Result<Option<NaiveDate>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(Some(d));
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Some(dt.date()));
        }
    }
    Err(format!(
        "invalid date '{s}' (expected YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD, MM-DD-YYYY or DD.MM.YYYY)"
    ))
}
