//! Unavailability windows.
//!
//! A date D is blocked for a person when any record covers it: either
//! `start <= D <= end` for an absolute record, or, for a recurring
//! record, when D's (month, day) falls inside the record's (month, day)
//! envelope rolled onto D's year. Recurring windows whose start tuple
//! exceeds their end tuple wrap the year boundary (e.g. Dec 20 - Jan 05).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A blocked date range for one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unavailability {
    pub person_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    /// Re-applies every year on the same (month, day) window.
    pub recurring: bool,
}

impl Unavailability {
    pub fn new(person_id: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            person_id: person_id.into(),
            start_date,
            end_date,
            reason: None,
            recurring: false,
        }
    }

    pub fn recurring(mut self) -> Self {
        self.recurring = true;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether this record blocks the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        if self.recurring {
            let day = (date.month(), date.day());
            let start = (self.start_date.month(), self.start_date.day());
            let end = (self.end_date.month(), self.end_date.day());
            if start <= end {
                start <= day && day <= end
            } else {
                // Window wraps the year boundary
                day >= start || day <= end
            }
        } else {
            self.start_date <= date && date <= self.end_date
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_absolute_range() {
        let u = Unavailability::new("p1", date(2026, 2, 10), date(2026, 2, 20));
        assert!(!u.covers(date(2026, 2, 9)));
        assert!(u.covers(date(2026, 2, 10)));
        assert!(u.covers(date(2026, 2, 15)));
        assert!(u.covers(date(2026, 2, 20)));
        assert!(!u.covers(date(2026, 2, 21)));
        assert!(!u.covers(date(2027, 2, 15))); // other years unaffected
    }

    #[test]
    fn test_recurring_same_year_window() {
        let u = Unavailability::new("p1", date(2020, 7, 1), date(2020, 7, 31)).recurring();
        assert!(u.covers(date(2026, 7, 15)));
        assert!(u.covers(date(2031, 7, 1)));
        assert!(!u.covers(date(2026, 8, 1)));
    }

    #[test]
    fn test_recurring_wraps_year_boundary() {
        let u = Unavailability::new("p1", date(2020, 12, 20), date(2021, 1, 5)).recurring();
        assert!(u.covers(date(2026, 12, 25)));
        assert!(u.covers(date(2026, 1, 3)));
        assert!(!u.covers(date(2026, 6, 1)));
        assert!(!u.covers(date(2026, 1, 6)));
        assert!(!u.covers(date(2026, 12, 19)));
    }
}
