//! Formatted terminal output for the pipeline checkpoints.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays focused on data flow
//! - output changes are localized (and easy to assert on in tests)

use crate::domain::{CleanReport, ForecastSeries, MonthlySeries, SalesTable};
use crate::fit::ArimaModel;

/// Post-load checkpoint: success line, column list, first rows of date + sales.
pub fn format_load_summary(table: &SalesTable, head: usize) -> String {
    let mut out = String::new();
    out.push_str("Dataset loaded successfully\n");
    out.push_str(&format!("Columns: {}\n", quoted_list(&table.columns)));

    let date_w = table.date_column.len().max(10);
    let (date_col, sales_col) = (&table.date_column, &table.sales_column);
    out.push_str(&format!("{:>5}  {date_col:<date_w$}  {sales_col}\n", ""));
    for (idx, record) in table.records.iter().take(head).enumerate() {
        let date = match record.date {
            Some(d) => d.to_string(),
            None => "NaT".to_string(),
        };
        out.push_str(&format!("{idx:>5}  {date:<date_w$}  {}\n", record.sales));
    }
    out
}

/// Post-clean checkpoint: kept and dropped counts, with the first dropped rows.
pub fn format_clean_summary(report: &CleanReport, head: usize) -> String {
    let (kept, rows_in, dropped) = (report.rows_kept, report.rows_in, report.dropped.len());
    let mut out = format!("Cleaned sales: kept {kept} of {rows_in} rows ({dropped} dropped)\n");
    for row in report.dropped.iter().take(head) {
        out.push_str(&format!("  line {:>6}: {} {:?}\n", row.line, row.reason, row.value));
    }
    if dropped > head {
        out.push_str(&format!("  ... and {} more\n", dropped - head));
    }
    out
}

/// Post-aggregation checkpoint: first monthly rows.
pub fn format_monthly_head(monthly: &MonthlySeries, head: usize) -> String {
    let mut out = format!("Monthly data prepared: {} months\n", monthly.len());
    out.push_str(&format!("{:>5}  {:<10}  {:>14}\n", "", "Month End", "Sales"));
    for (idx, p) in monthly.points.iter().take(head).enumerate() {
        let month = p.month_end.to_string();
        out.push_str(&format!("{idx:>5}  {month:<10}  {:>14.4}\n", p.sales));
    }
    out
}

/// Fitted model parameters and fit statistics.
pub fn format_fit_summary(model: &ArimaModel) -> String {
    let mut out = format!("Fitted {}\n", model.order);
    for (i, a) in model.ar.iter().enumerate() {
        out.push_str(&format!("- ar.L{}   : {a:.6}\n", i + 1));
    }
    for (i, b) in model.ma.iter().enumerate() {
        out.push_str(&format!("- ma.L{}   : {b:.6}\n", i + 1));
    }
    out.push_str(&format!("- sigma2  : {:.4}\n", model.quality.sigma2));
    let q = &model.quality;
    out.push_str(&format!("- SSE={:.4} n_eff={} BIC={:.3}\n", q.sse, q.n_eff, q.bic));
    out
}

/// Forecast table, one row per month.
pub fn format_forecast_table(forecast: &ForecastSeries) -> String {
    let mut out = format!("Forecast (next {} months):\n", forecast.len());
    for p in &forecast.points {
        out.push_str(&format!("  {}  {:>14.4}\n", p.month_end, p.sales));
    }
    out
}

fn quoted_list(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|c| format!("'{c}'")).collect();
    format!("[{}]", inner.join(", "))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{DropReason, DroppedRow, MonthPoint, SalesRecord};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn load_summary_lists_columns_and_head() {
        let table = SalesTable {
            columns: vec!["Order Date".into(), "Sales".into(), "Region".into()],
            date_column: "Order Date".into(),
            sales_column: "Sales".into(),
            records: (1..=7)
                .map(|i| SalesRecord {
                    line: i + 1,
                    date: Some(d(2023, 1, i as u32)),
                    sales: format!("{i}0"),
                })
                .collect(),
        };

        let txt = format_load_summary(&table, 5);
        assert!(txt.starts_with("Dataset loaded successfully\n"));
        assert!(txt.contains("Columns: ['Order Date', 'Sales', 'Region']\n"));
        assert!(txt.contains("2023-01-05"));
        assert!(!txt.contains("2023-01-06"));
    }

    #[test]
    fn load_summary_marks_blank_dates() {
        let table = SalesTable {
            columns: vec!["Order Date".into(), "Sales".into()],
            date_column: "Order Date".into(),
            sales_column: "Sales".into(),
            records: vec![SalesRecord {
                line: 2,
                date: None,
                sales: "50".into(),
            }],
        };
        assert!(format_load_summary(&table, 5).contains("NaT"));
    }

    #[test]
    fn clean_summary_truncates_dropped_rows() {
        let report = CleanReport {
            rows_in: 10,
            rows_kept: 7,
            dropped: (0..3)
                .map(|i| DroppedRow {
                    line: i + 2,
                    reason: DropReason::NonNumericSales,
                    value: "bad".into(),
                })
                .collect(),
        };
        let txt = format_clean_summary(&report, 2);
        assert!(txt.starts_with("Cleaned sales: kept 7 of 10 rows (3 dropped)\n"));
        assert!(txt.contains("line      2: non-numeric sales \"bad\"\n"));
        assert!(txt.ends_with("  ... and 1 more\n"));
    }

    #[test]
    fn monthly_head_shows_first_rows() {
        let monthly = MonthlySeries {
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
        };
        let txt = format_monthly_head(&monthly, 1);
        assert!(txt.starts_with("Monthly data prepared: 2 months\n"));
        assert!(txt.contains("2023-01-31"));
        assert!(txt.contains("150.0000"));
        assert!(!txt.contains("2023-02-28"));
    }
}
