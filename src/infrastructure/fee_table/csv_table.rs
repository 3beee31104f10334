use crate::domain::errors::FeeTableError;
use crate::domain::fees::TabularData;

const UTF8_BOM: char = '\u{feff}';

/// Parse CSV bytes into raw rows. The first record is the header row.
pub fn parse_csv(bytes: &[u8], origin: &str) -> Result<TabularData, FeeTableError> {
    let unavailable = |reason: String| FeeTableError::SourceUnavailable {
        origin: origin.to_string(),
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| unavailable(format!("invalid CSV header: {}", e)))?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(UTF8_BOM).to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(unavailable("no header row".to_string()));
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| unavailable(format!("invalid CSV record {}: {}", line + 1, e)))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(TabularData::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bom_is_stripped_from_first_header() {
        let data = "\u{feff}Grupo de Arancel,Tipo de Especie\nStandard,Acciones\n";
        let table = parse_csv(data.as_bytes(), "test").unwrap();

        assert_eq!(table.column_index("Grupo de Arancel"), Some(0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let data = "a,b,c\n1,2\n1,2,3\n";
        let table = parse_csv(data.as_bytes(), "test").unwrap();

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cell(2), "");
        assert_eq!(rows[1].cell(2), "3");
    }

    #[test]
    fn test_quoted_cells_keep_commas() {
        let data = "Arancel (Porcentaje),Moneda (Símbolo)\n\"0,25\",ARS\n";
        let table = parse_csv(data.as_bytes(), "test").unwrap();
        assert_eq!(table.rows().next().unwrap().cell(0), "0,25");
    }

    #[test]
    fn test_empty_input_is_unavailable() {
        let err = parse_csv(b"", "empty.csv").unwrap_err();
        assert!(matches!(err, FeeTableError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("empty.csv"));
    }
}
