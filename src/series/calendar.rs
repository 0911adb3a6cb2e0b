//! Month-end calendar arithmetic.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::AppError;

/// Last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .ok_or_else(|| out_of_range(date))
}

/// Last day of the month following the month containing `date`.
pub fn next_month_end(date: NaiveDate) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .ok_or_else(|| out_of_range(date))
        .and_then(month_end)
}

/// `count` consecutive month ends starting the month after `last`.
pub fn month_ends_after(last: NaiveDate, count: usize) -> Result<Vec<NaiveDate>, AppError> {
    let mut out = Vec::with_capacity(count);
    let mut cursor = last;
    for _ in 0..count {
        cursor = next_month_end(cursor)?;
        out.push(cursor);
    }
    Ok(out)
}

fn out_of_range(date: NaiveDate) -> AppError {
    AppError::date_range(format!("Date {date} is outside the supported calendar range."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_end_handles_leap_years() {
        assert_eq!(month_end(d(2024, 2, 3)).unwrap(), d(2024, 2, 29));
        assert_eq!(month_end(d(2023, 2, 28)).unwrap(), d(2023, 2, 28));
        assert_eq!(month_end(d(2023, 12, 1)).unwrap(), d(2023, 12, 31));
    }

    #[test]
    fn next_month_end_rolls_year() {
        assert_eq!(next_month_end(d(2023, 12, 31)).unwrap(), d(2024, 1, 31));
        assert_eq!(next_month_end(d(2023, 1, 31)).unwrap(), d(2023, 2, 28));
    }

    #[test]
    fn twelve_month_ends_after_february() {
        let axis = month_ends_after(d(2023, 2, 28), 12).unwrap();
        let expected = vec![
            d(2023, 3, 31),
            d(2023, 4, 30),
            d(2023, 5, 31),
            d(2023, 6, 30),
            d(2023, 7, 31),
            d(2023, 8, 31),
            d(2023, 9, 30),
            d(2023, 10, 31),
            d(2023, 11, 30),
            d(2023, 12, 31),
            d(2024, 1, 31),
            d(2024, 2, 29),
        ];
        assert_eq!(axis, expected);
    }

    #[test]
    fn axis_past_the_last_representable_month_is_a_date_range_error() {
        let err = month_ends_after(NaiveDate::MAX, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DateRange);
        assert!(err.message().contains("outside the supported calendar range"));
    }
}
