pub mod csv_table;
pub mod sources;
pub mod xlsx_table;

pub use csv_table::parse_csv;
pub use sources::{CsvFileSource, CsvUrlSource, XlsxFileSource, fee_table_source_from_config};
