use polars::error::PolarsError;
use thiserror::Error;

/// Failures scoped to a single view.
///
/// A `ViewError` aborts only the view that produced it; the rest of the dashboard
/// stays usable.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("View '{view}' requires missing columns: {}", .columns.join(", "))]
    MissingColumns {
        view: &'static str,
        columns: Vec<String>,
    },

    #[error("Invalid datetime range: {0}")]
    InvalidTemporalRange(String),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}
