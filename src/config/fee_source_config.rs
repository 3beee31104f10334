//! Fee-table source configuration.
//!
//! A published Google Sheet takes precedence over local files:
//! - `ARANCELES_SHEET_CSV_URL` - full CSV export link
//! - `ARANCELES_SHEET_ID` (+ `ARANCELES_SHEET_GID`, default `0`) - export link is built
//! - `ARANCELES_XLSX` - local spreadsheet (xlsx, xls, ods)
//! - `ARANCELES_CSV` - local file, default `Aranceles.csv`
//!
//! Local files ending in a spreadsheet extension are read as workbooks.

use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_FEE_TABLE_PATH: &str = "Aranceles.csv";

#[derive(Debug, Clone)]
pub struct FeeSourceConfig {
    pub csv_path: PathBuf,
    pub xlsx_path: Option<PathBuf>,
    pub sheet_id: String,
    pub sheet_gid: String,
    pub sheet_csv_url: String,
}

/// The concrete location the fee table is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeTableLocation {
    Url(Url),
    File(PathBuf),
}

impl Default for FeeSourceConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_FEE_TABLE_PATH),
            xlsx_path: None,
            sheet_id: String::new(),
            sheet_gid: "0".to_string(),
            sheet_csv_url: String::new(),
        }
    }
}

impl FeeSourceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let trimmed = |key: &str| var(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let sheet_gid = trimmed("ARANCELES_SHEET_GID");
        let csv_path = trimmed("ARANCELES_CSV");
        let xlsx_path = trimmed("ARANCELES_XLSX");

        Self {
            csv_path: if csv_path.is_empty() {
                PathBuf::from(DEFAULT_FEE_TABLE_PATH)
            } else {
                PathBuf::from(csv_path)
            },
            xlsx_path: Some(xlsx_path).filter(|p| !p.is_empty()).map(PathBuf::from),
            sheet_id: trimmed("ARANCELES_SHEET_ID"),
            sheet_gid: if sheet_gid.is_empty() {
                "0".to_string()
            } else {
                sheet_gid
            },
            sheet_csv_url: trimmed("ARANCELES_SHEET_CSV_URL"),
        }
    }

    /// CSV export URL of the published sheet, if one is configured.
    pub fn sheet_export_url(&self) -> Result<Option<Url>> {
        if !self.sheet_csv_url.is_empty() {
            let url = Url::parse(&self.sheet_csv_url)
                .with_context(|| format!("Invalid ARANCELES_SHEET_CSV_URL: {}", self.sheet_csv_url))?;
            return Ok(Some(url));
        }
        if self.sheet_id.is_empty() {
            return Ok(None);
        }

        // Only works for sheets shared as "anyone with the link can view"
        let base = format!(
            "https://docs.google.com/spreadsheets/d/{}/export",
            self.sheet_id
        );
        let url = Url::parse_with_params(&base, &[("format", "csv"), ("gid", self.sheet_gid.as_str())])
            .with_context(|| format!("Invalid ARANCELES_SHEET_ID: {}", self.sheet_id))?;
        Ok(Some(url))
    }

    pub fn location(&self) -> Result<FeeTableLocation> {
        Ok(match self.sheet_export_url()? {
            Some(url) => FeeTableLocation::Url(url),
            None => FeeTableLocation::File(self.xlsx_path.clone().unwrap_or_else(|| self.csv_path.clone())),
        })
    }
}
