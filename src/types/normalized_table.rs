//! Contains the `NormalizedTable`, the validated working dataset every view is computed from.

use crate::filtering::{observed_selection, temporal_bounds};
use crate::types::selection::Selection;
use crate::views::error::ViewError;
use chrono::NaiveDateTime;
use polars::prelude::DataFrame;
use std::fmt;

/// A recoverable problem found while normalizing a raw table.
///
/// Warnings never stop a load. They are logged when they occur and kept on the
/// [`NormalizedTable`] so the presentation layer can show them next to the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// Rows whose timestamp could not be built or parsed were removed.
    DroppedRows { count: usize },
    /// Values in a measurement column could not be read as numbers and are treated as missing.
    CoercedValues { column: String, count: usize },
    /// `NaN` cells in a measurement column are treated as missing.
    NotANumber { column: String, count: usize },
    /// Rows without a station were removed.
    MissingStation { count: usize },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::DroppedRows { count } => {
                write!(f, "{} rows with an invalid timestamp were removed", count)
            }
            LoadWarning::CoercedValues { column, count } => write!(
                f,
                "{} non-numeric values in column '{}' are treated as missing",
                count, column
            ),
            LoadWarning::NotANumber { column, count } => write!(
                f,
                "{} NaN values in column '{}' are treated as missing",
                count, column
            ),
            LoadWarning::MissingStation { count } => {
                write!(f, "{} rows without a station were removed", count)
            }
        }
    }
}

/// The validated, timestamp-sorted dataset with derived calendar fields.
///
/// Invariants upheld by [`crate::normalize`]:
///
/// * the `datetime` column has no nulls;
/// * rows are sorted ascending by `datetime`, ties in source order;
/// * `year`, `month` and `season` are computed from `datetime`.
///
/// The table is immutable once built. Filtering produces a new `DataFrame`
/// (see [`crate::apply_selection`]), and cloning the table is cheap because
/// polars shares column buffers.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    frame: DataFrame,
    warnings: Vec<LoadWarning>,
}

impl NormalizedTable {
    pub(crate) fn new(frame: DataFrame, warnings: Vec<LoadWarning>) -> Self {
        Self { frame, warnings }
    }

    /// The underlying polars frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Earliest and latest timestamp in the table.
    pub fn datetime_bounds(&self) -> Result<(NaiveDateTime, NaiveDateTime), ViewError> {
        temporal_bounds(&self.frame)
    }

    /// A selection covering every station, year and season present, over the full datetime range.
    pub fn full_selection(&self) -> Result<Selection, ViewError> {
        observed_selection(&self.frame)
    }
}
