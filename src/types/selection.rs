use crate::config::ConfigError;
use crate::loader::normalize::parse_timestamp;
use crate::types::month_period::MonthPeriod;
use crate::types::season::Season;
use bon::Builder;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

/// A user selection applied by [`crate::apply_selection`].
///
/// Every dimension is an explicit allow-list. An empty set selects nothing for
/// that dimension, so a selection meaning "no filter" must list the full observed
/// domain. [`crate::observed_selection`] builds exactly that from a table, and the
/// `with_*` methods narrow it down.
///
/// The datetime range is inclusive on both ends.
///
/// # Examples
///
/// ```rust
/// use air_quality::{Season, Selection};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2013, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2013, 5, 31).unwrap().and_hms_opt(23, 0, 0).unwrap();
///
/// let selection = Selection::builder()
///     .stations(["Changping".to_string()].into())
///     .years([2013].into())
///     .seasons([Season::Spring].into())
///     .start(start)
///     .end(end)
///     .build();
/// assert!(selection.stations.contains("Changping"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Selection {
    pub stations: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub seasons: BTreeSet<Season>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Selection {
    pub fn with_stations<I, S>(mut self, stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stations = stations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_years(mut self, years: impl IntoIterator<Item = i32>) -> Self {
        self.years = years.into_iter().collect();
        self
    }

    pub fn with_seasons(mut self, seasons: impl IntoIterator<Item = Season>) -> Self {
        self.seasons = seasons.into_iter().collect();
        self
    }

    pub fn with_range(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Restricts the datetime range to whole months, from the first instant of
    /// `from` to the last instant of `to`.
    ///
    /// Returns `None` if either month cannot be represented.
    pub fn with_month_range(self, from: MonthPeriod, to: MonthPeriod) -> Option<Self> {
        let (start, _) = from.datetime_bounds()?;
        let (_, end) = to.datetime_bounds()?;
        Some(self.with_range(start, end))
    }
}

/// Which end of an inclusive range a user-typed bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    Start,
    End,
}

/// Parses a user-typed range bound.
///
/// Accepts a full timestamp (`2014-01-31 18:00`), a date (`2014-01-31`) or a
/// month period (`2014-01`). Dates and months are widened to their first instant
/// for [`RangeEnd::Start`] and their last instant for [`RangeEnd::End`].
pub fn parse_range_bound(value: &str, end: RangeEnd) -> Result<NaiveDateTime, ConfigError> {
    let invalid = || ConfigError::InvalidDateTime(value.to_string());
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return match end {
            RangeEnd::Start => date.and_hms_opt(0, 0, 0),
            RangeEnd::End => date.and_hms_micro_opt(23, 59, 59, 999_999),
        }
        .ok_or_else(invalid);
    }
    if let Some(datetime) = parse_timestamp(trimmed) {
        return Ok(datetime);
    }
    let (start, stop) = trimmed
        .parse::<MonthPeriod>()
        .ok()
        .and_then(MonthPeriod::datetime_bounds)
        .ok_or_else(invalid)?;
    Ok(match end {
        RangeEnd::Start => start,
        RangeEnd::End => stop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn sample() -> Selection {
        Selection::builder()
            .stations(["A".to_string(), "B".to_string()].into())
            .years([2013, 2014].into())
            .seasons(Season::ALL.into_iter().collect())
            .start(at(2013, 3, 1, 0))
            .end(at(2014, 2, 28, 23))
            .build()
    }

    #[test]
    fn test_with_methods_replace_dimensions() {
        let narrowed = sample()
            .with_stations(["B"])
            .with_years([2014])
            .with_seasons([Season::Winter]);
        assert_eq!(narrowed.stations, BTreeSet::from(["B".to_string()]));
        assert_eq!(narrowed.years, BTreeSet::from([2014]));
        assert_eq!(narrowed.seasons, BTreeSet::from([Season::Winter]));
        assert_eq!(narrowed.start, at(2013, 3, 1, 0));
    }

    #[test]
    fn test_with_month_range_spans_whole_months() {
        let narrowed = sample()
            .with_month_range(MonthPeriod(2013, 6), MonthPeriod(2013, 8))
            .unwrap();
        assert_eq!(narrowed.start, at(2013, 6, 1, 0));
        assert_eq!(narrowed.end.date(), NaiveDate::from_ymd_opt(2013, 8, 31).unwrap());
        assert_eq!(narrowed.end.hour(), 23);
    }

    #[test]
    fn test_parse_range_bound_forms() {
        assert_eq!(
            parse_range_bound("2014-01-31 18:00", RangeEnd::Start).unwrap(),
            at(2014, 1, 31, 18)
        );
        assert_eq!(
            parse_range_bound("2014-01-31", RangeEnd::Start).unwrap(),
            at(2014, 1, 31, 0)
        );
        let end_of_day = parse_range_bound("2014-01-31", RangeEnd::End).unwrap();
        assert_eq!(end_of_day.date(), NaiveDate::from_ymd_opt(2014, 1, 31).unwrap());
        assert_eq!(end_of_day.hour(), 23);
        let end_of_month = parse_range_bound("2014-02", RangeEnd::End).unwrap();
        assert_eq!(end_of_month.date(), NaiveDate::from_ymd_opt(2014, 2, 28).unwrap());
        assert!(parse_range_bound("yesterday", RangeEnd::Start).is_err());
    }
}
