use crate::config::ConfigError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// `strftime` pattern of the `month_period` column produced by monthly aggregations.
pub const MONTH_PERIOD_FORMAT: &str = "%Y-%m";

/// A concrete calendar month within a concrete year, e.g. March 2013.
///
/// Unlike the 1-12 `month` column, a month period does not repeat across years,
/// which keeps multi-year monthly series continuous. Displays as `YYYY-MM`, the
/// same text stored in the `month_period` column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct MonthPeriod(pub i32, pub u32);

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self(year, month))
    }
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }

    pub fn from_datetime(datetime: &NaiveDateTime) -> Self {
        Self(datetime.year(), datetime.month())
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, days_in_month(self.0, self.1)?)
    }

    /// First and last representable instant of the month, both inclusive.
    pub fn datetime_bounds(self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = self.first_day()?.and_hms_opt(0, 0, 0)?;
        let end = self.last_day()?.and_hms_micro_opt(23, 59, 59, 999_999)?;
        Some((start, end))
    }
}

impl Display for MonthPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

impl FromStr for MonthPeriod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidDateTime(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        MonthPeriod::new(year, month).ok_or_else(invalid)
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}
