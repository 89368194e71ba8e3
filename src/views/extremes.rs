use crate::types::columns::{COL_MAX, COL_MIN, COL_STATION};
use crate::utils::require_columns;
use crate::views::error::ViewError;
use log::debug;
use polars::prelude::*;
use serde::Serialize;

/// A value together with the station that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationValue {
    pub station: String,
    pub value: f64,
}

/// Per-station minimum and maximum of one column, plus the overall extremes.
///
/// `lowest` and `highest` are `None` when the column has no valid value at all.
#[derive(Debug, Clone)]
pub struct StationExtremes {
    pub column: String,
    /// One row per station: `station`, `min`, `max`, sorted by station.
    pub table: DataFrame,
    pub lowest: Option<StationValue>,
    pub highest: Option<StationValue>,
}

/// Computes the minimum and maximum of `column` per station and finds which
/// station holds the overall lowest and highest value.
///
/// On ties the first station in sorted order wins.
pub fn extremes_by_station(df: &DataFrame, column: &str) -> Result<StationExtremes, ViewError> {
    require_columns(df, "extremes by station", &[COL_STATION, column])?;
    debug!("Computing per-station extremes of {}", column);

    let table = df
        .clone()
        .lazy()
        .group_by([col(COL_STATION)])
        .agg([
            col(column).cast(DataType::Float64).min().alias(COL_MIN),
            col(column).cast(DataType::Float64).max().alias(COL_MAX),
        ])
        .sort([COL_STATION], SortMultipleOptions::default())
        .collect()?;

    let stations = table.column(COL_STATION)?.str()?;
    let minima = table.column(COL_MIN)?.f64()?;
    let maxima = table.column(COL_MAX)?.f64()?;

    let lowest = pick(stations, minima, |candidate, best| candidate < best);
    let highest = pick(stations, maxima, |candidate, best| candidate > best);

    Ok(StationExtremes {
        column: column.to_string(),
        table,
        lowest,
        highest,
    })
}

/// Walks the rows in order and keeps the first strictly better value.
/// Rows without a station are skipped.
fn pick(
    stations: &StringChunked,
    values: &Float64Chunked,
    better: impl Fn(f64, f64) -> bool,
) -> Option<StationValue> {
    let mut best: Option<(&str, f64)> = None;
    for (station, value) in stations.into_iter().zip(values) {
        let (Some(station), Some(value)) = (station, value.filter(|v| !v.is_nan())) else {
            continue;
        };
        match best {
            Some((_, current)) if !better(value, current) => {}
            _ => best = Some((station, value)),
        }
    }
    best.map(|(station, value)| StationValue {
        station: station.to_string(),
        value,
    })
}
