use crate::domain::errors::FeeTableError;
use crate::domain::fees::TabularData;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

/// File extensions read as spreadsheets rather than CSV.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Read the first worksheet of a workbook. The first row is the header row.
///
/// Blocking; callers on the runtime go through `spawn_blocking`.
pub fn read_workbook(path: &Path, origin: &str) -> Result<TabularData, FeeTableError> {
    let unavailable = |reason: String| FeeTableError::SourceUnavailable {
        origin: origin.to_string(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unavailable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unavailable("workbook has no worksheets".to_string()))?
        .map_err(|e| unavailable(e.to_string()))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows
        .next()
        .filter(|h| h.iter().any(|c| !c.is_empty()))
        .ok_or_else(|| unavailable("no header row".to_string()))?;

    Ok(TabularData::new(headers, rows.collect()))
}

/// Cell as the text a CSV export of the sheet would hold. Date cells become
/// `YYYY-MM-DD HH:MM:SS`, booleans `1`/`0`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Bool(b) => i64::from(*b).to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Error(CellErrorType::NA)), "");
        assert_eq!(cell_text(&Data::String("Acciones".to_string())), "Acciones");
        assert_eq!(cell_text(&Data::Float(0.25)), "0.25");
        assert_eq!(cell_text(&Data::Float(100.0)), "100");
        assert_eq!(cell_text(&Data::Int(1)), "1");
        assert_eq!(cell_text(&Data::Bool(true)), "1");
    }

    #[test]
    fn test_date_cells_become_iso_text() {
        let serial = ExcelDateTime::new(45458.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_text(&Data::DateTime(serial)), "2024-06-15 00:00:00");
        assert_eq!(cell_text(&Data::DateTimeIso("2024-06-15".to_string())), "2024-06-15");
    }

    #[test]
    fn test_spreadsheet_extensions() {
        assert!(is_spreadsheet(Path::new("Aranceles.xlsx")));
        assert!(is_spreadsheet(Path::new("data/ARANCELES.XLSX")));
        assert!(is_spreadsheet(Path::new("aranceles.ods")));
        assert!(!is_spreadsheet(Path::new("Aranceles.csv")));
        assert!(!is_spreadsheet(Path::new("Aranceles")));
    }

    #[test]
    fn test_missing_workbook_is_unavailable() {
        let err = read_workbook(Path::new("/nonexistent/Aranceles.xlsx"), "missing").unwrap_err();
        assert!(matches!(err, FeeTableError::SourceUnavailable { .. }));
    }
}
