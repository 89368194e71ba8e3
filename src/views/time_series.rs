use crate::types::columns::{COL_DATETIME, COL_STATION};
use crate::utils::require_columns;
use crate::views::error::ViewError;
use polars::prelude::*;

/// The raw readings of `values` over time: `datetime`, `station` and the value
/// columns, in the table's timestamp order.
pub fn time_series(df: &DataFrame, values: &[&str]) -> Result<DataFrame, ViewError> {
    let mut columns = vec![COL_DATETIME, COL_STATION];
    columns.extend_from_slice(values);
    require_columns(df, "time series", &columns)?;
    Ok(df.select(columns)?)
}
