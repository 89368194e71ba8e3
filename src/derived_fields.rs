//! Calendar fields derived from the `datetime` column.

use crate::types::columns::{COL_DATETIME, COL_MONTH, COL_SEASON, COL_YEAR};
use crate::types::season::Season;
use polars::prelude::*;

/// Adds (or overwrites) `year`, `month` (1-12) and `season` from `datetime`.
///
/// All three are recomputed from the timestamp, never taken from the source, so
/// they cannot drift from it.
///
/// # Errors
///
/// Fails with a [`PolarsError`] if `datetime` is missing or is not a temporal column.
pub fn add_derived_fields(df: DataFrame) -> PolarsResult<DataFrame> {
    df.lazy()
        .with_columns([
            col(COL_DATETIME).dt().year().alias(COL_YEAR),
            month_expr().alias(COL_MONTH),
            season_expr().alias(COL_SEASON),
        ])
        .collect()
}

fn month_expr() -> Expr {
    col(COL_DATETIME).dt().month().cast(DataType::Int32)
}

fn in_season(season: Season) -> Expr {
    let [first, second, third] = season.months().map(|month| lit(month as i32));
    let month = month_expr();
    month
        .clone()
        .eq(first)
        .or(month.clone().eq(second))
        .or(month.eq(third))
}

/// The `season` label of each row, following [`Season::from_month`].
pub(crate) fn season_expr() -> Expr {
    when(in_season(Season::Winter))
        .then(lit(Season::Winter.as_str()))
        .when(in_season(Season::Spring))
        .then(lit(Season::Spring.as_str()))
        .when(in_season(Season::Summer))
        .then(lit(Season::Summer.as_str()))
        .otherwise(lit(Season::Fall.as_str()))
}
