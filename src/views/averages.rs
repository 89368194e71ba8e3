//! Grouped means over the normalized table.
//!
//! Every function takes the value columns to average, checks that the grouping
//! and value columns exist, and returns one row per key combination present in
//! the input, sorted by the grouping keys. Nulls are left out of each mean, so a
//! group with no valid value for a column gets null for that column.

use crate::types::columns::{COL_DATETIME, COL_MONTH_PERIOD, COL_SEASON, COL_STATION};
use crate::types::month_period::MONTH_PERIOD_FORMAT;
use crate::utils::require_columns;
use crate::views::error::ViewError;
use log::debug;
use polars::prelude::*;

fn month_period_expr() -> Expr {
    col(COL_DATETIME)
        .dt()
        .strftime(MONTH_PERIOD_FORMAT)
        .alias(COL_MONTH_PERIOD)
}

fn grouped_mean(
    df: &DataFrame,
    view: &'static str,
    sources: &[&str],
    keys: Vec<Expr>,
    key_names: &[&str],
    values: &[&str],
) -> Result<DataFrame, ViewError> {
    let required: Vec<&str> = sources.iter().chain(values).copied().collect();
    require_columns(df, view, &required)?;
    debug!("Averaging {:?} grouped by {:?}", values, key_names);

    let agg_exprs: Vec<Expr> = values.iter().map(|name| col(*name).mean()).collect();
    Ok(df
        .clone()
        .lazy()
        .group_by(keys)
        .agg(agg_exprs)
        .sort(key_names.to_vec(), SortMultipleOptions::default())
        .collect()?)
}

/// Mean of `values` per station and concrete calendar month (`YYYY-MM`).
pub fn monthly_average(df: &DataFrame, values: &[&str]) -> Result<DataFrame, ViewError> {
    grouped_mean(
        df,
        "monthly average",
        &[COL_STATION, COL_DATETIME],
        vec![col(COL_STATION), month_period_expr()],
        &[COL_STATION, COL_MONTH_PERIOD],
        values,
    )
}

/// Mean of `values` per station and season.
pub fn seasonal_average(df: &DataFrame, values: &[&str]) -> Result<DataFrame, ViewError> {
    grouped_mean(
        df,
        "seasonal average",
        &[COL_STATION, COL_SEASON],
        vec![col(COL_STATION), col(COL_SEASON)],
        &[COL_STATION, COL_SEASON],
        values,
    )
}

/// Mean of `values` per station.
pub fn station_average(df: &DataFrame, values: &[&str]) -> Result<DataFrame, ViewError> {
    grouped_mean(
        df,
        "station average",
        &[COL_STATION],
        vec![col(COL_STATION)],
        &[COL_STATION],
        values,
    )
}

/// Mean of `values` per calendar month with all stations pooled.
pub fn monthly_trend(df: &DataFrame, values: &[&str]) -> Result<DataFrame, ViewError> {
    grouped_mean(
        df,
        "monthly trend",
        &[COL_DATETIME],
        vec![month_period_expr()],
        &[COL_MONTH_PERIOD],
        values,
    )
}
