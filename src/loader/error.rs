use polars::error::PolarsError;
use thiserror::Error;

type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Terminal failures while loading a dataset.
///
/// Any of these stops the current render: nothing downstream runs on partial data,
/// and the user has to fix the source and reload.
#[derive(Debug, Error)]
pub enum LoadError {
    // Missing file, unreadable path, network failure or HTTP error status
    #[error("Source '{0}' could not be read")]
    SourceNotFound(String, #[source] BoxedCause),

    #[error("Source '{0}' contains no data rows")]
    EmptySource(String),

    // Malformed encoding, corrupt CSV structure, broken gzip stream
    #[error("Failed to parse source '{0}'")]
    ParseError(String, #[source] BoxedCause),

    #[error("No timestamp columns found: expected all of year/month/day/hour, or one of datetime/date (found columns: {found:?})")]
    MissingTemporalColumns { found: Vec<String> },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

impl LoadError {
    pub(crate) fn not_found(
        location: impl Into<String>,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        LoadError::SourceNotFound(location.into(), cause.into())
    }

    pub(crate) fn parse(location: impl Into<String>, cause: impl Into<BoxedCause>) -> Self {
        LoadError::ParseError(location.into(), cause.into())
    }
}
