//! Dashboard configuration: where the data comes from, how it is parsed and how
//! views are styled by default.

use crate::loader::data_loader::CsvOptions;
use crate::loader::data_source::DataSource;
use crate::types::theme::PlotTheme;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The combined two-station dataset the dashboard was built around.
pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/paizramadhan/analisis-data-dicoding/refs/heads/main/dashboard/combined_data.csv";

/// Rows scanned to infer column types.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}'", .0.display())]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{}'", .0.display())]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Unknown {kind} '{value}'")]
    UnknownOption { kind: &'static str, value: String },

    #[error("Invalid date or time '{0}'")]
    InvalidDateTime(String),
}

/// Settings for a [`crate::Dashboard`].
///
/// Every field has a default, so a config file only needs the keys it changes:
///
/// ```json
/// { "source": "data/combined_data.csv.gz", "theme": { "palette": "muted" } }
/// ```
///
/// # Examples
///
/// ```rust
/// use air_quality::{DashboardConfig, Palette, PlotTheme};
///
/// let config = DashboardConfig::builder()
///     .source("data/combined_data.csv")
///     .theme(PlotTheme { palette: Palette::Muted, ..Default::default() })
///     .build();
/// assert_eq!(config.null_values, vec!["NA".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct DashboardConfig {
    /// Local path or `http(s)://` URL of the dataset. A `.gz` suffix enables gzip decoding.
    #[builder(into, default = DEFAULT_SOURCE.to_string())]
    pub source: String,
    #[builder(default)]
    pub theme: PlotTheme,
    /// Cell values read as missing, in addition to empty cells.
    #[builder(default = vec!["NA".to_string()])]
    pub null_values: Vec<String>,
    #[builder(default = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig::builder().build()
    }
}

impl DashboardConfig {
    /// Reads a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    pub(crate) fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            null_values: self.null_values.clone(),
            infer_schema_length: self.infer_schema_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::theme::{Palette, PlotStyle};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_points_at_remote_dataset() {
        let config = DashboardConfig::default();
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert!(matches!(config.data_source(), DataSource::Url(_)));
        assert_eq!(config.infer_schema_length, DEFAULT_INFER_SCHEMA_LENGTH);
    }

    #[test]
    fn test_from_file_fills_missing_keys() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"{{"source": "local.csv", "theme": {{"style": "ticks", "palette": "bright"}}}}"#
        )?;
        let config = DashboardConfig::from_file(file.path())?;
        assert_eq!(config.source, "local.csv");
        assert_eq!(config.theme.style, PlotStyle::Ticks);
        assert_eq!(config.theme.palette, Palette::Bright);
        assert_eq!(config.null_values, vec!["NA".to_string()]);
        Ok(())
    }

    #[test]
    fn test_from_file_reports_bad_json() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{{ not json")?;
        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_, _)));
        Ok(())
    }
}
