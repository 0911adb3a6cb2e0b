//! The forecast pipeline, shared by the binary and the tests.
//!
//! Keeping this in one place keeps the workflow linear and easy to follow:
//! load -> clean -> aggregate -> plot history -> fit -> forecast -> plot combined
//!
//! The binary only picks where charts go (`RenderSink`) and where the
//! checkpoint text goes (`io::Write`).

use std::fmt;
use std::io::Write;

use crate::domain::{CleanReport, ForecastSeries, MonthlySeries, PipelineConfig, SalesTable};
use crate::error::AppError;
use crate::fit::{ArimaModel, fit_arima};
use crate::io::{clean_sales, load_sales_table};
use crate::plot::{RenderSink, forecast_chart, historical_chart};
use crate::series::{aggregate_monthly, forecast_series};

/// Pipeline progress. Transitions are strictly linear; any error ends in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Loaded,
    Cleaned,
    Aggregated,
    PlottedHistorical,
    Fitted,
    Forecasted,
    PlottedCombined,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Start => "start",
            Stage::Loaded => "loaded",
            Stage::Cleaned => "cleaned",
            Stage::Aggregated => "aggregated",
            Stage::PlottedHistorical => "plotted-historical",
            Stage::Fitted => "fitted",
            Stage::Forecasted => "forecasted",
            Stage::PlottedCombined => "plotted-combined",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Everything a successful run computed.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: SalesTable,
    pub clean_report: CleanReport,
    pub monthly: MonthlySeries,
    pub model: ArimaModel,
    pub forecast: ForecastSeries,
    /// Stages visited, in order, ending with `Done`.
    pub stages: Vec<Stage>,
}

/// Load, clean and aggregate only. No output, no rendering.
pub fn load_clean_aggregate(config: &PipelineConfig) -> Result<MonthlySeries, AppError> {
    let table = load_sales_table(config)?;
    let cleaned = clean_sales(&table);
    aggregate_monthly(&cleaned.observations, config.fill_missing_months)
}

/// Run all stages, printing checkpoints to `out` and sending both charts to `sink`.
pub fn run_pipeline(
    config: &PipelineConfig,
    sink: &mut dyn RenderSink,
    out: &mut dyn Write,
) -> Result<RunOutput, AppError> {
    run_pipeline_tracked(config, sink, out, &mut StageTracker::new())
}

/// Same as [`run_pipeline`], recording every stage into `tracker`.
///
/// On error the tracker ends with `Failed`, right after the last stage that
/// completed.
pub fn run_pipeline_tracked(
    config: &PipelineConfig,
    sink: &mut dyn RenderSink,
    out: &mut dyn Write,
    tracker: &mut StageTracker,
) -> Result<RunOutput, AppError> {
    match run_stages(config, sink, out, tracker) {
        Ok(mut run) => {
            tracker.advance(Stage::Done);
            run.stages = tracker.visited.clone();
            Ok(run)
        }
        Err(err) => {
            tracing::error!(stage = %tracker.current(), kind = ?err.kind(), "pipeline failed");
            tracker.advance(Stage::Failed);
            Err(err)
        }
    }
}

/// Stages visited by one run, starting at `Start`.
#[derive(Debug)]
pub struct StageTracker {
    visited: Vec<Stage>,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self {
            visited: vec![Stage::Start],
        }
    }
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> &[Stage] {
        &self.visited
    }

    pub fn current(&self) -> Stage {
        self.visited.last().copied().unwrap_or(Stage::Start)
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!(from = %self.current(), to = %next, "stage transition");
        self.visited.push(next);
    }
}

fn run_stages(
    config: &PipelineConfig,
    sink: &mut dyn RenderSink,
    out: &mut dyn Write,
    tracker: &mut StageTracker,
) -> Result<RunOutput, AppError> {
    let head = config.head_rows;

    // 1) Load.
    let table = load_sales_table(config)?;
    tracker.advance(Stage::Loaded);
    tracing::info!(
        rows = table.records.len(),
        columns = table.columns.len(),
        "dataset loaded"
    );
    emit(out, &crate::report::format_load_summary(&table, head))?;

    // 2) Clean.
    let cleaned = clean_sales(&table);
    tracker.advance(Stage::Cleaned);
    if !cleaned.report.dropped.is_empty() {
        tracing::warn!(
            dropped = cleaned.report.dropped.len(),
            kept = cleaned.report.rows_kept,
            "dropped rows without a date or numeric sales"
        );
    }
    let summary = crate::report::format_clean_summary(&cleaned.report, head);
    emit(out, &summary)?;

    // 3) Aggregate. Nothing to chart or fit without at least one month.
    let monthly = aggregate_monthly(&cleaned.observations, config.fill_missing_months)?;
    if monthly.is_empty() {
        return Err(AppError::insufficient_data(config.order.min_observations(), 0));
    }
    tracker.advance(Stage::Aggregated);
    tracing::info!(months = monthly.len(), "monthly series prepared");
    emit(out, &crate::report::format_monthly_head(&monthly, head))?;

    // 4) Historical chart.
    sink.render(&historical_chart(&monthly))?;
    tracker.advance(Stage::PlottedHistorical);

    // 5) Fit.
    let model = fit_arima(&monthly.values(), config.order)?;
    tracker.advance(Stage::Fitted);
    tracing::info!(
        order = %model.order,
        ar = ?model.ar,
        ma = ?model.ma,
        sigma2 = model.quality.sigma2,
        "model fitted"
    );
    emit(out, &crate::report::format_fit_summary(&model))?;

    // 6) Forecast.
    let values = model.forecast(config.horizon)?;
    let forecast = forecast_series(&monthly, &values)?;
    tracker.advance(Stage::Forecasted);
    emit(out, &crate::report::format_forecast_table(&forecast))?;

    // 7) Combined chart.
    sink.render(&forecast_chart(&monthly, &forecast))?;
    tracker.advance(Stage::PlottedCombined);

    Ok(RunOutput {
        table,
        clean_report: cleaned.report,
        monthly,
        model,
        forecast,
        stages: Vec::new(),
    })
}

fn emit(out: &mut dyn Write, text: &str) -> Result<(), AppError> {
    writeln!(out, "{text}").map_err(|e| AppError::export(format!("Failed to write output: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::error::ErrorKind;
    use crate::io::ingest::tests::{BLANK_DATE_CSV, SCENARIO_CSV, config_for, write_fixture};
    use crate::plot::sink::RecordingSink;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn month_ends(monthly: &MonthlySeries) -> Vec<NaiveDate> {
        monthly.points.iter().map(|p| p.month_end).collect()
    }

    /// One row per month for `months` months starting January 2021, with a wobble.
    fn monthly_csv(months: u32) -> String {
        let mut csv = String::from("Row ID,Order Date,Sales\n");
        for i in 0..months {
            let year = 2021 + (i / 12) as i32;
            let month = i % 12 + 1;
            let sales = 1000.0 + 25.0 * i as f64 + if i % 2 == 0 { 80.0 } else { -60.0 };
            csv.push_str(&format!("{},{year}-{month:02}-15,{sales}\n", i + 1));
        }
        csv
    }

    #[test]
    fn full_run_renders_both_charts_and_forecasts_twelve_months() {
        let path = write_fixture(monthly_csv(24).as_bytes());
        let mut sink = RecordingSink::default();
        let mut out = Vec::new();

        let run = run_pipeline(&config_for(path), &mut sink, &mut out).unwrap();

        assert_eq!(sink.charts.len(), 2);
        assert_eq!(sink.charts[0].title, "Monthly Sales Trend");
        assert_eq!(sink.charts[1].title, "Sales Forecast (Next 12 Months)");

        assert_eq!(run.monthly.len(), 24);
        assert_eq!(run.forecast.len(), 12);
        assert_eq!(run.forecast.points[0].month_end, d(2023, 1, 31));
        assert_eq!(run.forecast.points[11].month_end, d(2023, 12, 31));
        assert!(run.forecast.points.iter().all(|p| p.sales.is_finite()));

        assert_eq!(
            run.stages,
            vec![
                Stage::Start,
                Stage::Loaded,
                Stage::Cleaned,
                Stage::Aggregated,
                Stage::PlottedHistorical,
                Stage::Fitted,
                Stage::Forecasted,
                Stage::PlottedCombined,
                Stage::Done,
            ]
        );

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Dataset loaded successfully\n"));
        assert!(text.contains("Monthly data prepared: 24 months"));
        assert!(text.contains("Forecast (next 12 months):"));
    }

    #[test]
    fn scenario_rows_aggregate_to_two_months() {
        let path = write_fixture(SCENARIO_CSV.as_bytes());
        let monthly = load_clean_aggregate(&config_for(path)).unwrap();

        assert_eq!(month_ends(&monthly), vec![d(2023, 1, 31), d(2023, 2, 28)]);
        assert_eq!(monthly.values(), vec![150.0, 75.0]);
    }

    #[test]
    fn blank_date_row_is_dropped_before_aggregation() {
        let path = write_fixture(BLANK_DATE_CSV.as_bytes());
        let monthly = load_clean_aggregate(&config_for(path)).unwrap();

        assert_eq!(month_ends(&monthly), vec![d(2023, 1, 31), d(2023, 2, 28)]);
        assert_eq!(monthly.values(), vec![100.0, 75.0]);
    }

    #[test]
    fn no_valid_sales_fails_before_any_chart() {
        let path = write_fixture(b"Order Date,Sales\n2023-01-05,n/a\n2023-02-05,\n");
        let mut sink = RecordingSink::default();
        let mut out = Vec::new();

        let err = run_pipeline(&config_for(path), &mut sink, &mut out).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert!(sink.charts.is_empty());
    }

    #[test]
    fn short_series_fails_at_fit_after_history_chart() {
        let path = write_fixture(monthly_csv(3).as_bytes());
        let mut sink = RecordingSink::default();
        let mut out = Vec::new();

        let mut tracker = StageTracker::new();

        let config = config_for(path);
        let err = run_pipeline_tracked(&config, &mut sink, &mut out, &mut tracker).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientData);
        assert_eq!(sink.charts.len(), 1);
        assert_eq!(sink.charts[0].title, "Monthly Sales Trend");
        assert_eq!(
            tracker.visited(),
            [
                Stage::Start,
                Stage::Loaded,
                Stage::Cleaned,
                Stage::Aggregated,
                Stage::PlottedHistorical,
                Stage::Failed,
            ]
        );
    }

    #[test]
    fn missing_input_is_reported_without_output() {
        let path = std::env::temp_dir().join("sales_forecast_definitely_missing.csv");
        let mut sink = RecordingSink::default();
        let mut out = Vec::new();
        let mut tracker = StageTracker::new();

        let config = config_for(path);
        let err = run_pipeline_tracked(&config, &mut sink, &mut out, &mut tracker).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingInput);
        assert_eq!(tracker.visited(), [Stage::Start, Stage::Failed]);
        assert_eq!(tracker.current(), Stage::Failed);
        assert!(out.is_empty());
        assert!(sink.charts.is_empty());
    }

    #[test]
    fn load_clean_aggregate_is_bit_identical_across_runs() {
        let path = write_fixture(monthly_csv(18).as_bytes());
        let config = config_for(path);

        let first = load_clean_aggregate(&config).unwrap();
        let second = load_clean_aggregate(&config).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.points.iter().zip(&second.points) {
            assert_eq!(a.month_end, b.month_end);
            assert_eq!(a.sales.to_bits(), b.sales.to_bits());
        }
    }
}
