use crate::error::{GitweekError, Result};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date range with a display label.
///
/// `end` is inclusive through its final instant: history queries use
/// `since_arg`/`until_arg` so same-day commits are never excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(GitweekError::InvalidDate(format!(
                "start ({start}) is after end ({end})"
            )));
        }
        let label = format!("{start} ~ {end}");
        Ok(Self { start, end, label })
    }

    /// Query start boundary, midnight of the first day.
    pub fn since_arg(&self) -> String {
        format!("{} 00:00:00", self.start)
    }

    /// Query end boundary, last second of the final day.
    pub fn until_arg(&self) -> String {
        format!("{} 23:59:59", self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date - Days::new(back)
}

/// Monday..=Sunday of the week containing `today`.
pub fn current_week(today: NaiveDate) -> DateRange {
    let monday = monday_of(today);
    let sunday = monday + Days::new(6);
    DateRange::new(monday, sunday).expect("monday precedes sunday")
}

/// The calendar week immediately preceding the one containing `today`.
pub fn last_week(today: NaiveDate) -> DateRange {
    current_week(today - Days::new(7))
}

/// `[today - 6 months, today]`.
pub fn half_year(today: NaiveDate) -> DateRange {
    let start = today
        .checked_sub_months(Months::new(6))
        .unwrap_or(NaiveDate::MIN);
    DateRange::new(start, today).expect("start precedes today")
}

/// The full week starting at `monday`; fails unless `monday` is a Monday.
pub fn custom_week(monday: NaiveDate) -> Result<DateRange> {
    if monday.weekday() != Weekday::Mon {
        return Err(GitweekError::InvalidDate(format!(
            "{monday} is a {}, not a Monday",
            monday.weekday()
        )));
    }
    DateRange::new(monday, monday + Days::new(6))
}

/// `[start, today]`; fails if `start` is in the future.
pub fn custom_period(start: NaiveDate, today: NaiveDate) -> Result<DateRange> {
    if start > today {
        return Err(GitweekError::InvalidDate(format!(
            "start ({start}) is in the future"
        )));
    }
    DateRange::new(start, today)
}
