//! Monthly aggregation of cleaned observations.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{ForecastSeries, MonthPoint, MonthlySeries, SalesObservation};
use crate::error::AppError;
use crate::series::calendar::{month_end, month_ends_after, next_month_end};

/// Group observations by calendar month (stamped at month end) and sum sales.
///
/// Output is chronological with one entry per month present in `observations`.
/// With `fill_gaps`, months between the first and last month that have no
/// observations are inserted with a zero sum.
pub fn aggregate_monthly(
    observations: &[SalesObservation],
    fill_gaps: bool,
) -> Result<MonthlySeries, AppError> {
    // BTreeMap keeps months ordered and unique; sums accumulate in input order.
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for obs in observations {
        *sums.entry(month_end(obs.date)?).or_insert(0.0) += obs.sales;
    }

    if fill_gaps {
        fill_missing_months(&mut sums)?;
    }

    Ok(MonthlySeries {
        points: sums
            .into_iter()
            .map(|(month_end, sales)| MonthPoint { month_end, sales })
            .collect(),
    })
}

fn fill_missing_months(sums: &mut BTreeMap<NaiveDate, f64>) -> Result<(), AppError> {
    let (Some(&first), Some(&last)) = (sums.keys().next(), sums.keys().next_back()) else {
        return Ok(());
    };
    let mut cursor = first;
    while cursor < last {
        cursor = next_month_end(cursor)?;
        sums.entry(cursor).or_insert(0.0);
    }
    Ok(())
}

/// Stamp forecast values onto the month ends following the monthly series.
pub fn forecast_series(
    history: &MonthlySeries,
    values: &[f64],
) -> Result<ForecastSeries, AppError> {
    let last = history
        .last_month_end()
        .ok_or_else(|| AppError::insufficient_data(1, 0))?;
    let axis = month_ends_after(last, values.len())?;

    Ok(ForecastSeries {
        points: axis
            .into_iter()
            .zip(values.iter().copied())
            .map(|(month_end, sales)| MonthPoint { month_end, sales })
            .collect(),
    })
}
