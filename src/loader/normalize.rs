//! Turns a raw parsed table into a [`NormalizedTable`].
//!
//! Steps, in order:
//!
//! 1. coerce the station column to text and every known measurement column to `Float64`,
//!    counting values that could not be read as numbers;
//! 2. build one timestamp per row, from `year`/`month`/`day`/`hour` when all four exist,
//!    otherwise by parsing a `datetime` (or `date`) column;
//! 3. drop rows without a timestamp and stable-sort the rest chronologically;
//! 4. derive `year`, `month` and `season` from the timestamp.

use crate::derived_fields::add_derived_fields;
use crate::loader::error::LoadError;
use crate::types::columns::{
    CALENDAR_COLUMNS, COL_DATETIME, COL_DAY, COL_HOUR, COL_MONTH, COL_STATION, COL_YEAR,
    MEASUREMENTS, TIMESTAMP_COLUMNS,
};
use crate::types::normalized_table::{LoadWarning, NormalizedTable};
use crate::utils::{has_column, timestamp_to_datetime};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};
use polars::prelude::*;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Validates and normalizes a raw table.
///
/// # Errors
///
/// Returns [`LoadError::MissingTemporalColumns`] when the table has neither all four
/// calendar columns nor a `datetime`/`date` column. Rows whose timestamp cannot be
/// built are not an error: they are dropped and reported as a [`LoadWarning`].
///
/// # Examples
///
/// ```rust
/// use air_quality::normalize;
/// use polars::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let raw = df!(
///     "station" => ["A", "A"],
///     "datetime" => ["2013-03-01 01:00:00", "2013-03-01 00:00:00"],
///     "PM2.5" => [Some(4.0), None],
/// )?;
/// let table = normalize(raw)?;
/// assert_eq!(table.height(), 2);
/// assert_eq!(table.frame().column("season")?.str()?.get(0), Some("Spring"));
/// # Ok(())
/// # }
/// ```
pub fn normalize(raw: DataFrame) -> Result<NormalizedTable, LoadError> {
    let mut warnings = Vec::new();
    let mut df = coerce_columns(raw, &mut warnings)?;

    let timestamps = build_timestamps(&df)?;

    // Stable sort of the surviving row indices by timestamp
    let mut order: Vec<(IdxSize, NaiveDateTime)> = timestamps
        .iter()
        .enumerate()
        .filter_map(|(idx, ts)| ts.map(|ts| (idx as IdxSize, ts)))
        .collect();
    order.sort_by_key(|(_, ts)| *ts);

    let dropped = timestamps.len() - order.len();
    if dropped > 0 {
        warn!(
            "Removing {} rows whose timestamp could not be built or parsed",
            dropped
        );
        warnings.push(LoadWarning::DroppedRows { count: dropped });
    }

    let (indices, sorted): (Vec<IdxSize>, Vec<NaiveDateTime>) = order.into_iter().unzip();
    df = df.take(&IdxCa::from_vec("idx".into(), indices))?;
    df.with_column(Series::new(COL_DATETIME.into(), sorted))?;

    let df = add_derived_fields(df)?;
    debug!("Normalized table has {} rows", df.height());
    Ok(NormalizedTable::new(df, warnings))
}

/// Coerces the station column to `String` and measurement columns to `Float64`.
///
/// Non-strict casts turn unreadable values into nulls; any increase in a column's
/// null count is reported as a [`LoadWarning::CoercedValues`]. `NaN` cells are
/// nulled too and reported as [`LoadWarning::NotANumber`], so every view treats
/// them as missing. Rows with no station are removed.
fn coerce_columns(
    mut df: DataFrame,
    warnings: &mut Vec<LoadWarning>,
) -> Result<DataFrame, LoadError> {
    if has_column(&df, COL_STATION) {
        df = drop_missing_stations(df, warnings)?;
    }

    for name in MEASUREMENTS {
        if !has_column(&df, name) {
            continue;
        }
        let column = df.column(name)?;
        let before = column.null_count();
        let coerced = column.cast(&DataType::Float64)?;
        let count = coerced.null_count().saturating_sub(before);
        if count > 0 {
            warn!(
                "{} values in column '{}' are not numeric and are treated as missing",
                count, name
            );
            warnings.push(LoadWarning::CoercedValues {
                column: name.to_string(),
                count,
            });
        }

        let values = coerced.f64()?;
        let nans = values
            .into_iter()
            .filter(|value| value.is_some_and(f64::is_nan))
            .count();
        if nans > 0 {
            warn!(
                "{} NaN values in column '{}' are treated as missing",
                nans, name
            );
            warnings.push(LoadWarning::NotANumber {
                column: name.to_string(),
                count: nans,
            });
            let cleaned: Float64Chunked = values
                .into_iter()
                .map(|value| value.filter(|v| !v.is_nan()))
                .collect();
            df.with_column(cleaned.with_name(name.into()).into_series())?;
        } else {
            df.with_column(coerced)?;
        }
    }
    Ok(df)
}

/// Casts `station` to text and removes rows where it is null or blank.
fn drop_missing_stations(
    mut df: DataFrame,
    warnings: &mut Vec<LoadWarning>,
) -> Result<DataFrame, LoadError> {
    let station = df.column(COL_STATION)?.cast(&DataType::String)?;
    let keep: Vec<bool> = station
        .str()?
        .into_iter()
        .map(|value| value.is_some_and(|name| !name.trim().is_empty()))
        .collect();
    df.with_column(station)?;

    let missing = keep.iter().filter(|kept| !**kept).count();
    if missing == 0 {
        return Ok(df);
    }
    warn!("Removing {} rows without a station", missing);
    warnings.push(LoadWarning::MissingStation { count: missing });
    Ok(df.filter(&BooleanChunked::from_slice("keep".into(), &keep))?)
}

fn build_timestamps(df: &DataFrame) -> Result<Vec<Option<NaiveDateTime>>, LoadError> {
    if CALENDAR_COLUMNS.iter().all(|name| has_column(df, name)) {
        debug!("Combining calendar columns into '{}'", COL_DATETIME);
        return Ok(calendar_timestamps(df)?);
    }
    if let Some(name) = TIMESTAMP_COLUMNS.iter().find(|name| has_column(df, name)) {
        debug!("Parsing timestamps from column '{}'", name);
        return Ok(parsed_timestamps(df.column(name)?)?);
    }
    Err(LoadError::MissingTemporalColumns {
        found: df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect(),
    })
}

fn calendar_timestamps(df: &DataFrame) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    let years = int_values(df, COL_YEAR)?;
    let months = int_values(df, COL_MONTH)?;
    let days = int_values(df, COL_DAY)?;
    let hours = int_values(df, COL_HOUR)?;

    Ok(years
        .into_iter()
        .zip(months)
        .zip(days)
        .zip(hours)
        .map(|(((year, month), day), hour)| combine_calendar(year, month, day, hour))
        .collect())
}

fn int_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    let values = column.i64()?.into_iter().collect();
    Ok(values)
}

/// Builds a timestamp from calendar components; `None` when any is missing or out of range.
pub(crate) fn combine_calendar(
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    hour: Option<i64>,
) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year?).ok()?,
        u32::try_from(month?).ok()?,
        u32::try_from(day?).ok()?,
    )?;
    date.and_hms_opt(u32::try_from(hour?).ok()?, 0, 0)
}

fn parsed_timestamps(column: &Column) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    match column.dtype() {
        DataType::Datetime(_, _) | DataType::Date => {
            let unit = TimeUnit::Milliseconds;
            let cast = column.cast(&DataType::Datetime(unit, None))?;
            let values = cast
                .datetime()?
                .into_iter()
                .map(|value| value.and_then(|ts| timestamp_to_datetime(ts, unit)))
                .collect();
            Ok(values)
        }
        _ => {
            let text = column.cast(&DataType::String)?;
            let values = text
                .str()?
                .into_iter()
                .map(|value| value.and_then(parse_timestamp))
                .collect();
            Ok(values)
        }
    }
}

/// Parses a timestamp string.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` (with optional fractional seconds), the same with a
/// `T` separator, minute precision, or a bare `YYYY-MM-DD` meaning midnight.
pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
