//! Service-date resolution.
//!
//! Given a target (year, month), yields the ordered sequence of calendar
//! dates on which services take place. Sundays by default; the weekday is
//! a parameter for congregations that gather on another day.
//!
//! Pure and deterministic: no clock access, no I/O.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::GenerateError;

/// Earliest year accepted by a generation request.
pub const MIN_YEAR: i32 = 1970;
/// Latest year accepted by a generation request.
pub const MAX_YEAR: i32 = 2100;

/// All Sundays of the given month, in ascending order.
pub fn sundays_of_month(year: i32, month: u32) -> Result<Vec<NaiveDate>, GenerateError> {
    dates_on(year, month, Weekday::Sun)
}

/// All dates of the given month falling on `weekday`, in ascending order.
pub fn dates_on(year: i32, month: u32, weekday: Weekday) -> Result<Vec<NaiveDate>, GenerateError> {
    if !(1..=12).contains(&month) {
        return Err(GenerateError::MonthOutOfRange(month));
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(GenerateError::YearOutOfRange(year));
    }

    let mut dates = Vec::new();
    let mut date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(GenerateError::MonthOutOfRange(month))?;
    while date.month() == month {
        if date.weekday() == weekday {
            dates.push(date);
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(dates)
}

/// The calendar month immediately preceding (year, month), wrapping
/// January back to the previous December.
pub fn prior_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// English month name for default schedule titles.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
