use super::csv_table::parse_csv;
use super::xlsx_table::{is_spreadsheet, read_workbook};
use crate::config::{FeeSourceConfig, FeeTableLocation};
use crate::domain::errors::{FeeTableError, truncate_body};
use crate::domain::fees::TabularData;
use crate::domain::ports::FeeTableSource;
use crate::infrastructure::core::HttpClientFactory;
use anyhow::Result;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

// ===== Local CSV file =====

pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeeTableSource for CsvFileSource {
    async fn load_raw_table(&self) -> Result<TabularData, FeeTableError> {
        let origin = self.describe();
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| FeeTableError::SourceUnavailable {
                origin: origin.clone(),
                reason: e.to_string(),
            })?;
        debug!("Read {} bytes from {}", bytes.len(), origin);
        parse_csv(&bytes, &origin)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

// ===== Local spreadsheet (xlsx, xls, ods) =====

pub struct XlsxFileSource {
    path: PathBuf,
}

impl XlsxFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FeeTableSource for XlsxFileSource {
    async fn load_raw_table(&self) -> Result<TabularData, FeeTableError> {
        let origin = self.describe();
        let path = self.path.clone();
        let task_origin = origin.clone();

        let table = tokio::task::spawn_blocking(move || read_workbook(&path, &task_origin))
            .await
            .map_err(|e| FeeTableError::SourceUnavailable {
                origin: origin.clone(),
                reason: e.to_string(),
            })??;
        debug!("Read {} rows from {}", table.len(), origin);
        Ok(table)
    }

    fn describe(&self) -> String {
        format!("spreadsheet {}", self.path.display())
    }
}

// ===== CSV export URL (published Google Sheet) =====

pub struct CsvUrlSource {
    url: Url,
    client: ClientWithMiddleware,
}

impl CsvUrlSource {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: HttpClientFactory::create_client(),
        }
    }
}

#[async_trait]
impl FeeTableSource for CsvUrlSource {
    async fn load_raw_table(&self) -> Result<TabularData, FeeTableError> {
        let origin = self.describe();
        let unavailable = |reason: String| FeeTableError::SourceUnavailable {
            origin: origin.clone(),
            reason,
        };

        let response = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(unavailable(format!("HTTP {}: {}", status.as_u16(), truncate_body(&body))));
        }

        let bytes = response.bytes().await.map_err(|e| unavailable(e.to_string()))?;
        debug!("Downloaded {} bytes from {}", bytes.len(), origin);
        parse_csv(&bytes, &origin)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

/// Pick the fee-table source the configuration points at.
pub fn fee_table_source_from_config(config: &FeeSourceConfig) -> Result<Arc<dyn FeeTableSource>> {
    let source: Arc<dyn FeeTableSource> = match config.location()? {
        FeeTableLocation::Url(url) => Arc::new(CsvUrlSource::new(url)),
        FeeTableLocation::File(path) if is_spreadsheet(&path) => Arc::new(XlsxFileSource::new(path)),
        FeeTableLocation::File(path) => Arc::new(CsvFileSource::new(path)),
    };
    info!("Fee table source: {}", source.describe());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::canned_http::CannedServer;

    #[tokio::test]
    async fn test_url_source_non_success_is_unavailable() {
        let server = CannedServer::start(vec![(404, "sheet not shared".to_string())]).await;
        let url = Url::parse(&format!("{}/export?format=csv", server.base_url)).unwrap();

        match CsvUrlSource::new(url).load_raw_table().await {
            Err(FeeTableError::SourceUnavailable { reason, .. }) => {
                assert!(reason.contains("404"));
                assert!(reason.contains("sheet not shared"));
            }
            other => panic!("unexpected result: {:?}", other.map(|t| t.len())),
        }
    }

    #[tokio::test]
    async fn test_url_source_parses_csv_body() {
        let server = CannedServer::start(vec![(200, "Grupo de Arancel,Tipo de Especie\nStandard,Acciones\n".to_string())]).await;
        let url = Url::parse(&server.base_url).unwrap();

        let table = CsvUrlSource::new(url).load_raw_table().await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.column_index("Tipo de Especie"), Some(1));
    }

    #[test]
    fn test_source_follows_file_extension() {
        let config = |path: &str| FeeSourceConfig {
            csv_path: PathBuf::from(path),
            ..FeeSourceConfig::default()
        };

        let xlsx = fee_table_source_from_config(&config("Aranceles.xlsx")).unwrap();
        assert_eq!(xlsx.describe(), "spreadsheet Aranceles.xlsx");

        let csv = fee_table_source_from_config(&config("Aranceles.csv")).unwrap();
        assert_eq!(csv.describe(), "file Aranceles.csv");
    }
}
