use crate::types::columns::COL_DATETIME;
use crate::views::error::ViewError;
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::{DataFrame, PolarsResult, TimeUnit};

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Fails with [`ViewError::MissingColumns`] naming every required column `df` lacks.
pub(crate) fn require_columns(
    df: &DataFrame,
    view: &'static str,
    required: &[&str],
) -> Result<(), ViewError> {
    let columns: Vec<String> = required
        .iter()
        .filter(|name| !has_column(df, name))
        .map(|name| name.to_string())
        .collect();
    if columns.is_empty() {
        Ok(())
    } else {
        Err(ViewError::MissingColumns { view, columns })
    }
}

pub(crate) fn timestamp_to_datetime(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    }
    .map(|dt| dt.naive_utc())
}

/// Reads the `datetime` column as chrono values, keeping nulls.
pub(crate) fn datetime_values(df: &DataFrame) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    let column = df.column(COL_DATETIME)?.datetime()?;
    let unit = column.time_unit();
    Ok(column
        .into_iter()
        .map(|value| value.and_then(|ts| timestamp_to_datetime(ts, unit)))
        .collect())
}
