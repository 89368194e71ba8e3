use crate::config::DEFAULT_INFER_SCHEMA_LENGTH;
use crate::loader::data_source::DataSource;
use crate::loader::error::LoadError;
use crate::loader::normalize::normalize;
use crate::types::normalized_table::NormalizedTable;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::io::Cursor;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// CSV parsing knobs taken from [`crate::DashboardConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub null_values: Vec<String>,
    pub infer_schema_length: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            null_values: vec!["NA".to_string()],
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

/// Reads a dataset from a [`DataSource`] and turns it into a [`NormalizedTable`].
pub struct DataLoader {
    download_client: Client,
    options: CsvOptions,
}

impl DataLoader {
    pub fn new(options: CsvOptions) -> DataLoader {
        DataLoader {
            download_client: Client::new(),
            options,
        }
    }

    /// Reads, parses and normalizes the dataset at `source`.
    ///
    /// # Errors
    ///
    /// * [`LoadError::SourceNotFound`] if the file or URL cannot be read.
    /// * [`LoadError::EmptySource`] if it holds no data rows.
    /// * [`LoadError::ParseError`] if it is not valid (optionally gzipped) CSV.
    /// * [`LoadError::MissingTemporalColumns`] if no timestamp can be built.
    pub async fn load(&self, source: &DataSource) -> Result<NormalizedTable, LoadError> {
        let raw = self.load_raw(source).await?;
        let location = source.to_string();
        // Normalization is CPU-bound, keep it off the async workers
        task::spawn_blocking(move || normalize(raw))
            .await
            .map_err(|e| LoadError::parse(location, e))?
    }

    /// Reads and parses the dataset at `source` without normalizing it.
    pub async fn load_raw(&self, source: &DataSource) -> Result<DataFrame, LoadError> {
        let location = source.to_string();
        let mut bytes = self.read_bytes(source).await?;
        if source.is_gzip() {
            bytes = gunzip(&bytes, &location).await?;
        }
        info!("Read {} bytes from {}", bytes.len(), location);

        let options = self.options.clone();
        task::spawn_blocking(move || parse_csv(bytes, &location, &options))
            .await
            .map_err(|e| LoadError::parse(source.to_string(), e))?
    }

    async fn read_bytes(&self, source: &DataSource) -> Result<Vec<u8>, LoadError> {
        match source {
            DataSource::Path(path) => fs::read(path).await.map_err(|e| {
                warn!("Failed to read {}: {}", path.display(), e);
                LoadError::not_found(source.to_string(), e)
            }),
            DataSource::Url(url) => self.download(url).await,
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        info!("Downloading data from {}", url);
        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::not_found(url, e))?;

        let response = response.error_for_status().map_err(|e| {
            warn!("HTTP error for {}: {:?}", url, e);
            LoadError::not_found(url, e)
        })?;

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .await
            .map_err(|e| LoadError::not_found(url, e))?;
        Ok(body)
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        DataLoader::new(CsvOptions::default())
    }
}

async fn gunzip(bytes: &[u8], location: &str) -> Result<Vec<u8>, LoadError> {
    let mut decoder = GzipDecoder::new(bytes);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .await
        .map_err(|e| LoadError::parse(location, e))?;
    Ok(decompressed)
}

/// Parses CSV bytes (with a header row) into a raw `DataFrame`.
///
/// Empty cells and any of `options.null_values` become nulls. Zero bytes, a
/// whitespace-only payload or a header without rows all count as an empty source.
pub fn parse_csv(
    bytes: Vec<u8>,
    location: &str,
    options: &CsvOptions,
) -> Result<DataFrame, LoadError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::EmptySource(location.to_string()));
    }

    let null_values = match options.null_values.as_slice() {
        [] => None,
        [single] => Some(NullValues::AllColumnsSingle(single.as_str().into())),
        many => Some(NullValues::AllColumns(
            many.iter().map(|value| value.as_str().into()).collect(),
        )),
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_length))
        .with_parse_options(CsvParseOptions::default().with_null_values(null_values))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| match e {
            PolarsError::NoData(_) => LoadError::EmptySource(location.to_string()),
            other => LoadError::parse(location, other),
        })?;

    if df.height() == 0 {
        return Err(LoadError::EmptySource(location.to_string()));
    }
    info!(
        "Parsed {} rows x {} columns from {}",
        df.height(),
        df.width(),
        location
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::columns::{COL_DATETIME, COL_PM25, COL_STATION};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "year,month,day,hour,PM2.5,TEMP,station\n\
                          2013,3,1,1,8,-1.1,Changping\n\
                          2013,3,1,0,NA,-0.7,Changping\n\
                          2013,3,1,0,4,-0.5,Aotizhongxin\n";

    fn write_temp(contents: &[u8], suffix: &str) -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
        file.write_all(contents)?;
        file.flush()?;
        Ok(file)
    }

    #[tokio::test]
    async fn test_load_normalizes_local_csv() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_temp(SAMPLE.as_bytes(), ".csv")?;
        let table = DataLoader::default()
            .load(&DataSource::Path(file.path().to_path_buf()))
            .await?;

        assert_eq!(table.height(), 3);
        assert!(table.frame().column(COL_DATETIME).is_ok());
        let pm = table.frame().column(COL_PM25)?.f64()?;
        assert_eq!(pm.null_count(), 1, "'NA' should be read as missing");
        Ok(())
    }

    #[tokio::test]
    async fn test_load_decodes_gzip() -> Result<(), Box<dyn std::error::Error>> {
        // Gzip-compress the sample with the same codec used for reading
        let mut encoder =
            async_compression::tokio::bufread::GzipEncoder::new(SAMPLE.as_bytes());
        let mut compressed = Vec::new();
        encoder.read_to_end(&mut compressed).await?;

        let file = write_temp(&compressed, ".csv.gz")?;
        let table = DataLoader::default()
            .load(&DataSource::Path(file.path().to_path_buf()))
            .await?;
        assert_eq!(table.height(), 3);
        let stations = table.frame().column(COL_STATION)?.str()?;
        assert_eq!(stations.get(0), Some("Changping"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_path_is_source_not_found() {
        let source = DataSource::Path(PathBuf::from("/definitely/not/here/data.csv"));
        let result = DataLoader::default().load(&source).await;
        assert!(matches!(result, Err(LoadError::SourceNotFound(_, _))));
    }

    #[tokio::test]
    async fn test_empty_and_header_only_files_are_empty_source(
    ) -> Result<(), Box<dyn std::error::Error>> {
        for contents in ["", "   \n", "year,month,day,hour,station\n"] {
            let file = write_temp(contents.as_bytes(), ".csv")?;
            let result = DataLoader::default()
                .load_raw(&DataSource::Path(file.path().to_path_buf()))
                .await;
            assert!(
                matches!(result, Err(LoadError::EmptySource(_))),
                "contents {:?} gave {:?}",
                contents,
                result.map(|df| df.shape())
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_gzip_is_parse_error() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_temp(b"this is not gzip at all", ".csv.gz")?;
        let result = DataLoader::default()
            .load_raw(&DataSource::Path(file.path().to_path_buf()))
            .await;
        assert!(matches!(result, Err(LoadError::ParseError(_, _))));
        Ok(())
    }

    #[test]
    fn test_parse_csv_honours_custom_null_values() -> Result<(), Box<dyn std::error::Error>> {
        let options = CsvOptions {
            null_values: vec!["NA".to_string(), "-".to_string()],
            ..CsvOptions::default()
        };
        let df = parse_csv(
            b"station,TEMP\nA,-\nA,NA\nA,3.5\n".to_vec(),
            "inline",
            &options,
        )?;
        assert_eq!(df.column("TEMP")?.null_count(), 2);
        Ok(())
    }
}
