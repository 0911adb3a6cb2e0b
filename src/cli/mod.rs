//! Command-line parsing for the sales forecaster.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline. Model order and horizon are fixed and have no flags.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{
    DEFAULT_CHART_DIR, DEFAULT_CSV_PATH, DEFAULT_DATE_COLUMN, DEFAULT_ENCODING,
    DEFAULT_SALES_COLUMN, PipelineConfig, RenderTarget,
};
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "forecast",
    version,
    about = "Monthly retail sales trend and 12-month ARIMA(1,1,1) forecast"
)]
pub struct Cli {
    /// Sales CSV to read.
    #[arg(long = "csv", env = "SALES_CSV", default_value = DEFAULT_CSV_PATH)]
    pub csv: PathBuf,

    /// Name of the order date column.
    #[arg(long, default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    /// Name of the sales amount column.
    #[arg(long, default_value = DEFAULT_SALES_COLUMN)]
    pub sales_column: String,

    /// Text encoding of the CSV (any WHATWG label, e.g. latin1, utf-8).
    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    /// Where charts are shown.
    #[arg(long, value_enum, default_value_t = RenderTarget::Terminal)]
    pub render: RenderTarget,

    /// Directory for SVG charts (`--render svg`).
    #[arg(long, env = "SALES_CHART_DIR", default_value = DEFAULT_CHART_DIR)]
    pub out_dir: PathBuf,

    /// Write actual + forecast months to this CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Insert zero-sales months for calendar gaps.
    #[arg(long)]
    pub fill_missing_months: bool,

    /// Rows shown at each checkpoint.
    #[arg(long = "head", default_value_t = 5)]
    pub head: usize,
}

impl Cli {
    /// Build the run configuration. Fixed settings keep their defaults.
    pub fn to_config(&self) -> Result<PipelineConfig, AppError> {
        if self.head == 0 {
            return Err(AppError::config("--head must be at least 1"));
        }
        Ok(PipelineConfig {
            csv_path: self.csv.clone(),
            date_column: self.date_column.clone(),
            sales_column: self.sales_column.clone(),
            encoding: self.encoding.clone(),
            head_rows: self.head,
            fill_missing_months: self.fill_missing_months,
            render: self.render,
            out_dir: self.out_dir.clone(),
            export: self.export.clone(),
            ..PipelineConfig::default()
        })
    }
}
