use crate::types::columns::{COL_DATETIME, COL_SEASON, COL_STATION, COL_YEAR};
use crate::types::season::Season;
use crate::types::selection::Selection;
use crate::utils::{datetime_values, require_columns};
use crate::views::error::ViewError;
use chrono::NaiveDateTime;
use log::debug;
use polars::prelude::{col, lit, DataFrame, Expr, IntoLazy, LazyFrame, Literal};
use std::collections::BTreeSet;

pub trait AirQualityFrameFilterExt {
    /// Keeps rows whose `station` is one of `stations`. An empty set keeps nothing.
    fn filter_stations<'a>(self, stations: impl IntoIterator<Item = &'a String>) -> LazyFrame;

    /// Keeps rows whose `year` is one of `years`. An empty set keeps nothing.
    fn filter_years(self, years: impl IntoIterator<Item = i32>) -> LazyFrame;

    /// Keeps rows whose `season` is one of `seasons`. An empty set keeps nothing.
    fn filter_seasons(self, seasons: impl IntoIterator<Item = Season>) -> LazyFrame;

    /// Keeps rows whose `datetime` lies in `[start, end]` (inclusive).
    fn filter_datetime_range(self, start: NaiveDateTime, end: NaiveDateTime) -> LazyFrame;
}

/// `column == v1 || column == v2 || ...`, false for no values.
fn any_of<L: Literal>(column: &str, values: impl IntoIterator<Item = L>) -> Expr {
    values
        .into_iter()
        .fold(lit(false), |acc, value| acc.or(col(column).eq(lit(value))))
}

impl AirQualityFrameFilterExt for LazyFrame {
    fn filter_stations<'a>(self, stations: impl IntoIterator<Item = &'a String>) -> LazyFrame {
        self.filter(any_of(
            COL_STATION,
            stations.into_iter().map(|station| station.as_str()),
        ))
    }

    fn filter_years(self, years: impl IntoIterator<Item = i32>) -> LazyFrame {
        self.filter(any_of(COL_YEAR, years))
    }

    fn filter_seasons(self, seasons: impl IntoIterator<Item = Season>) -> LazyFrame {
        self.filter(any_of(
            COL_SEASON,
            seasons.into_iter().map(|season| season.as_str()),
        ))
    }

    fn filter_datetime_range(self, start: NaiveDateTime, end: NaiveDateTime) -> LazyFrame {
        self.filter(
            col(COL_DATETIME)
                .gt_eq(lit(start))
                .and(col(COL_DATETIME).lt_eq(lit(end))),
        )
    }
}

/// Earliest and latest `datetime` in `df`.
///
/// Fails with [`ViewError::InvalidTemporalRange`] when the column holds nulls or
/// the table is empty.
pub(crate) fn temporal_bounds(df: &DataFrame) -> Result<(NaiveDateTime, NaiveDateTime), ViewError> {
    require_columns(df, "temporal bounds", &[COL_DATETIME])?;
    let values = datetime_values(df)?;
    let nulls = values.iter().filter(|value| value.is_none()).count();
    if nulls > 0 {
        return Err(ViewError::InvalidTemporalRange(format!(
            "{} rows have no datetime",
            nulls
        )));
    }
    let observed = values.into_iter().flatten();
    let (min, max) = observed
        .fold(None, |bounds: Option<(NaiveDateTime, NaiveDateTime)>, value| {
            Some(match bounds {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            })
        })
        .ok_or_else(|| ViewError::InvalidTemporalRange("table has no rows".to_string()))?;
    Ok((min, max))
}

/// A selection covering the full observed domain of `df`: every station, year
/// and season present, from the earliest to the latest timestamp.
///
/// Applying it with [`apply_selection`] returns the table unchanged.
pub fn observed_selection(df: &DataFrame) -> Result<Selection, ViewError> {
    require_columns(
        df,
        "filter",
        &[COL_STATION, COL_YEAR, COL_SEASON, COL_DATETIME],
    )?;
    let (start, end) = temporal_bounds(df)?;

    let stations: BTreeSet<String> = df
        .column(COL_STATION)?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    let years: BTreeSet<i32> = df.column(COL_YEAR)?.i32()?.into_iter().flatten().collect();
    let seasons: BTreeSet<Season> = df
        .column(COL_SEASON)?
        .str()?
        .into_iter()
        .flatten()
        .filter_map(|label| label.parse().ok())
        .collect();

    Ok(Selection {
        stations,
        years,
        seasons,
        start,
        end,
    })
}

/// Returns the rows of `df` matching every dimension of `selection`, in input order.
pub fn apply_selection(df: &DataFrame, selection: &Selection) -> Result<DataFrame, ViewError> {
    require_columns(
        df,
        "filter",
        &[COL_STATION, COL_YEAR, COL_SEASON, COL_DATETIME],
    )?;
    // Validates the timestamp domain before filtering on it
    temporal_bounds(df)?;
    debug!(
        "Filtering {} rows: {} stations, {} years, {} seasons, {} to {}",
        df.height(),
        selection.stations.len(),
        selection.years.len(),
        selection.seasons.len(),
        selection.start,
        selection.end
    );

    Ok(df
        .clone()
        .lazy()
        .filter_stations(&selection.stations)
        .filter_years(selection.years.iter().copied())
        .filter_seasons(selection.seasons.iter().copied())
        .filter_datetime_range(selection.start, selection.end)
        .collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derived_fields::add_derived_fields;
    use crate::types::columns::COL_PM25;
    use chrono::NaiveDate;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample() -> DataFrame {
        let datetimes = vec![
            at(2013, 3, 1, 0),
            at(2013, 3, 1, 0),
            at(2013, 7, 15, 12),
            at(2013, 12, 31, 23),
            at(2014, 1, 1, 0),
            at(2014, 10, 2, 6),
        ];
        let df = DataFrame::new(vec![
            Series::new(COL_DATETIME.into(), datetimes).into_column(),
            Column::new(COL_STATION.into(), ["A", "B", "A", "B", "A", "B"]),
            Column::new(COL_PM25.into(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        ])
        .unwrap();
        add_derived_fields(df).unwrap()
    }

    fn pm25(df: &DataFrame) -> Vec<f64> {
        df.column(COL_PM25)
            .unwrap()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_full_domain_returns_input() -> Result<(), Box<dyn std::error::Error>> {
        let df = sample();
        let selection = observed_selection(&df)?;
        assert_eq!(selection.stations.len(), 2);
        assert_eq!(selection.years, [2013, 2014].into());
        assert_eq!(selection.seasons, Season::ALL.into_iter().collect());
        assert_eq!(selection.start, at(2013, 3, 1, 0));
        assert_eq!(selection.end, at(2014, 10, 2, 6));

        let filtered = apply_selection(&df, &selection)?;
        assert!(filtered.equals_missing(&df));
        Ok(())
    }

    #[test]
    fn test_empty_station_set_selects_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let df = sample();
        let selection = observed_selection(&df)?.with_stations(Vec::<String>::new());
        let filtered = apply_selection(&df, &selection)?;
        assert_eq!(filtered.height(), 0);
        assert_eq!(filtered.schema(), df.schema());
        Ok(())
    }

    #[test]
    fn test_dimensions_combine_with_and() -> Result<(), Box<dyn std::error::Error>> {
        let df = sample();
        let selection = observed_selection(&df)?
            .with_stations(["A"])
            .with_seasons([Season::Winter, Season::Summer]);
        assert_eq!(pm25(&apply_selection(&df, &selection)?), vec![3.0, 5.0]);

        let selection = observed_selection(&df)?.with_years([2013]);
        assert_eq!(pm25(&apply_selection(&df, &selection)?), vec![1.0, 2.0, 3.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_range_is_inclusive() -> Result<(), Box<dyn std::error::Error>> {
        let df = sample();
        let selection =
            observed_selection(&df)?.with_range(at(2013, 7, 15, 12), at(2014, 1, 1, 0));
        assert_eq!(pm25(&apply_selection(&df, &selection)?), vec![3.0, 4.0, 5.0]);
        Ok(())
    }

    #[test]
    fn test_null_timestamp_is_invalid_range() -> Result<(), Box<dyn std::error::Error>> {
        let df = DataFrame::new(vec![
            Series::new(COL_DATETIME.into(), vec![Some(at(2013, 3, 1, 0)), None]).into_column(),
            Column::new(COL_STATION.into(), ["A", "A"]),
            Column::new(COL_YEAR.into(), [2013, 2013]),
            Column::new(COL_SEASON.into(), ["Spring", "Spring"]),
        ])?;
        assert!(matches!(
            observed_selection(&df),
            Err(ViewError::InvalidTemporalRange(_))
        ));
        Ok(())
    }

    #[test]
    fn test_empty_table_is_invalid_range() -> Result<(), Box<dyn std::error::Error>> {
        let df = sample().head(Some(0));
        assert!(matches!(
            temporal_bounds(&df),
            Err(ViewError::InvalidTemporalRange(_))
        ));
        Ok(())
    }
}
