//! Defines where a dataset is read from.

use std::fmt;
use std::path::PathBuf;

/// The location of a dataset, also used as the memoization key of the table cache.
///
/// # Examples
///
/// ```
/// use air_quality::DataSource;
///
/// let remote = DataSource::parse("https://example.org/combined_data.csv.gz");
/// assert!(matches!(remote, DataSource::Url(_)));
/// assert!(remote.is_gzip());
///
/// let local = DataSource::parse("data/combined_data.csv");
/// assert_eq!(local.to_string(), "data/combined_data.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An `http://` or `https://` URL fetched once per load.
    Url(String),
}

impl DataSource {
    /// Classifies a location string: anything starting with `http://` or `https://` is a URL,
    /// everything else a local path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Whether the payload is gzip-compressed, judged by a `.gz` suffix (query strings ignored).
    pub fn is_gzip(&self) -> bool {
        match self {
            DataSource::Path(path) => path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("gz")),
            DataSource::Url(url) => {
                let path = url.split(['?', '#']).next().unwrap_or(url);
                path.to_ascii_lowercase().ends_with(".gz")
            }
        }
    }
}

impl From<&str> for DataSource {
    fn from(location: &str) -> Self {
        DataSource::parse(location)
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Path(path)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_distinguishes_urls() {
        assert_eq!(
            DataSource::parse(" HTTPS://host/data.csv "),
            DataSource::Url("HTTPS://host/data.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("./data.csv"),
            DataSource::Path(PathBuf::from("./data.csv"))
        );
    }

    #[test]
    fn test_gzip_detection_ignores_query() {
        assert!(DataSource::parse("https://host/data.csv.gz?raw=1").is_gzip());
        assert!(DataSource::parse("data.CSV.GZ").is_gzip());
        assert!(!DataSource::parse("data.csv").is_gzip());
        assert!(!DataSource::parse("https://host/gz/data.csv").is_gzip());
    }
}
