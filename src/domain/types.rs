//! Shared domain types.
//!
//! All entities are transient: computed once per run and held in memory.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;

/// Default input file, relative to the working directory.
pub const DEFAULT_CSV_PATH: &str = "data/stores_sales_forecasting.csv";
/// Default column holding the transaction date.
pub const DEFAULT_DATE_COLUMN: &str = "Order Date";
/// Default column holding the sales amount.
pub const DEFAULT_SALES_COLUMN: &str = "Sales";
/// Default text encoding label of the input file.
pub const DEFAULT_ENCODING: &str = "latin1";
/// Default directory for rendered SVG charts.
pub const DEFAULT_CHART_DIR: &str = "charts";
/// Number of months forecast beyond the last observed month.
pub const FORECAST_HORIZON: usize = 12;
/// Fixed model order.
pub const DEFAULT_ORDER: ArimaOrder = ArimaOrder { p: 1, d: 1, q: 1 };

/// ARIMA(p, d, q) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    /// Autoregressive order.
    pub p: usize,
    /// Differencing order.
    pub d: usize,
    /// Moving-average order.
    pub q: usize,
}

impl ArimaOrder {
    /// Number of ARMA coefficients estimated on the differenced series.
    pub fn n_coeffs(self) -> usize {
        self.p + self.q
    }

    /// Smallest series length the estimator accepts.
    ///
    /// The differenced series needs `p + q + 2` observations.
    pub fn min_observations(self) -> usize {
        self.d + self.p + self.q + 2
    }
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// Where the two charts go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderTarget {
    /// Full-screen terminal chart; blocks until a key is pressed.
    Terminal,
    /// One SVG file per chart under the output directory.
    Svg,
    /// Character plot on stdout.
    Ascii,
}

/// One parsed row of the input table.
///
/// Only the date and the raw sales text are kept; other columns pass through unused.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// 1-based line number in the file (header is line 1).
    pub line: usize,
    /// `None` when the date cell is empty.
    pub date: Option<NaiveDate>,
    /// Sales cell exactly as read (trimmed), before numeric coercion.
    pub sales: String,
}

/// Output of the load stage.
#[derive(Debug, Clone)]
pub struct SalesTable {
    /// All column names, in file order.
    pub columns: Vec<String>,
    pub date_column: String,
    pub sales_column: String,
    pub records: Vec<SalesRecord>,
}

/// A (date, numeric sales) pair that survived cleaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalesObservation {
    pub date: NaiveDate,
    pub sales: f64,
}

/// Why cleaning removed a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The date cell was empty.
    MissingDate,
    /// The sales cell did not coerce to a finite number.
    NonNumericSales,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::MissingDate => f.write_str("missing date"),
            DropReason::NonNumericSales => f.write_str("non-numeric sales"),
        }
    }
}

/// A record removed during cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    pub line: usize,
    pub reason: DropReason,
    /// The offending cell as read.
    pub value: String,
}

/// What cleaning did to the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_kept: usize,
    pub dropped: Vec<DroppedRow>,
}

impl CleanReport {
    /// Dropped rows with the given reason.
    pub fn dropped_for(&self, reason: DropReason) -> usize {
        self.dropped.iter().filter(|r| r.reason == reason).count()
    }
}

/// Output of the clean stage.
#[derive(Debug, Clone)]
pub struct CleanedSeries {
    pub observations: Vec<SalesObservation>,
    pub report: CleanReport,
}

/// One calendar month, stamped with its last day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthPoint {
    pub month_end: NaiveDate,
    pub sales: f64,
}

/// Monthly sums in strictly increasing month order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    pub points: Vec<MonthPoint>,
}

impl MonthlySeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.sales).collect()
    }

    pub fn last_month_end(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.month_end)
    }
}

/// Point forecast for the months right after the monthly series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    pub points: Vec<MonthPoint>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Run configuration. Every literal of the pipeline lives here.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub csv_path: PathBuf,
    pub date_column: String,
    pub sales_column: String,
    /// Encoding label understood by `encoding_rs` (e.g. `latin1`, `utf-8`).
    pub encoding: String,
    pub order: ArimaOrder,
    pub horizon: usize,
    /// Rows shown at the stdout checkpoints.
    pub head_rows: usize,
    /// Insert zero-sum months for calendar gaps between first and last month.
    pub fill_missing_months: bool,
    pub render: RenderTarget,
    pub out_dir: PathBuf,
    pub export: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            sales_column: DEFAULT_SALES_COLUMN.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            order: DEFAULT_ORDER,
            horizon: FORECAST_HORIZON,
            head_rows: 5,
            fill_missing_months: false,
            render: RenderTarget::Terminal,
            out_dir: PathBuf::from(DEFAULT_CHART_DIR),
            export: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_fixed_model() {
        let config = PipelineConfig::default();
        assert_eq!(config.order, ArimaOrder { p: 1, d: 1, q: 1 });
        assert_eq!(config.horizon, 12);
        assert_eq!(config.date_column, "Order Date");
        assert_eq!(config.sales_column, "Sales");
        assert!(!config.fill_missing_months);
    }

    #[test]
    fn order_minimum_length() {
        assert_eq!(DEFAULT_ORDER.min_observations(), 5);
        assert_eq!(DEFAULT_ORDER.to_string(), "ARIMA(1,1,1)");
    }
}
