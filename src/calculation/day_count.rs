//! Leave day counting and leave-year arithmetic.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Half a day, the fixed length of a half-day request.
pub const HALF_DAY: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Returns the weekday index of a date, 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always < 7
    date.weekday().num_days_from_sunday() as u8
}

/// Counts the leave days a date range consumes.
///
/// # Arguments
///
/// * `start_date` - First day of leave
/// * `end_date` - Last day of leave, inclusive
/// * `is_half_day` - Whether only half a day is requested
/// * `week_off` - Weekly off days (0 = Sunday) that are not counted
///
/// # Returns
///
/// - `0.5` for a half-day request; the week-off status of that day is not checked
/// - otherwise the number of days in the inclusive range not falling on a week-off
/// - `0` if `end_date` is before `start_date` (the range is not swapped)
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] for a half-day request whose start
/// and end dates differ.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::count_days;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeSet;
///
/// // Monday 2024-01-01 to Sunday 2024-01-07 with Saturday and Sunday off
/// let days = count_days(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
///     false,
///     &BTreeSet::from([0, 6]),
/// )
/// .unwrap();
/// assert_eq!(days, Decimal::from(5));
/// ```
pub fn count_days(
    start_date: NaiveDate,
    end_date: NaiveDate,
    is_half_day: bool,
    week_off: &BTreeSet<u8>,
) -> EngineResult<Decimal> {
    if is_half_day {
        if start_date != end_date {
            return Err(EngineError::invalid_input(
                "end_date",
                format!(
                    "half-day leave must start and end on the same date, got {} to {}",
                    start_date, end_date
                ),
            ));
        }
        return Ok(HALF_DAY);
    }

    if end_date < start_date {
        return Ok(Decimal::ZERO);
    }

    let working_days = start_date
        .iter_days()
        .take_while(|date| *date <= end_date)
        .filter(|date| !week_off.contains(&weekday_index(*date)))
        .count();

    Ok(Decimal::from(working_days))
}

/// Returns the first and last day of the leave year containing `date`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidYearStartMonth`] if `year_start_month` is
/// outside 1..=12.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::leave_year_bounds;
/// use chrono::NaiveDate;
///
/// // An April-to-March leave year
/// let (start, end) = leave_year_bounds(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(), 4).unwrap();
/// assert_eq!(start, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
/// assert_eq!(end, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
/// ```
pub fn leave_year_bounds(
    date: NaiveDate,
    year_start_month: u32,
) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidYearStartMonth {
        month: year_start_month,
    };

    let start_year = if date.month() >= year_start_month {
        date.year()
    } else {
        date.year() - 1
    };

    let start = NaiveDate::from_ymd_opt(start_year, year_start_month, 1).ok_or_else(invalid)?;
    let end = NaiveDate::from_ymd_opt(start_year + 1, year_start_month, 1)
        .and_then(|next_start| next_start.pred_opt())
        .ok_or_else(invalid)?;

    Ok((start, end))
}
