/// Raw tabular data as read from the fee-table source.
///
/// Cells are kept as the strings the source produced; no type coercion happens
/// here. Rows may be shorter than the header row, missing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TabularData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of the first column with exactly this (case-sensitive) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(|cells| TableRow { cells })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    cells: &'a [String],
}

impl<'a> TableRow<'a> {
    pub fn cell(&self, index: usize) -> &'a str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_rows_read_as_empty_cells() {
        let table = TabularData::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string()]],
        );

        let row = table.rows().next().unwrap();
        assert_eq!(row.cell(0), "1");
        assert_eq!(row.cell(1), "");
    }

    #[test]
    fn test_column_lookup_is_case_sensitive() {
        let table = TabularData::new(vec!["Tipo de Especie".to_string()], vec![]);
        assert_eq!(table.column_index("Tipo de Especie"), Some(0));
        assert_eq!(table.column_index("tipo de especie"), None);
        assert!(table.is_empty());
    }
}
