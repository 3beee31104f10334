#[cfg(test)]
pub(crate) mod canned_http;
pub mod core;
pub mod esco;
pub mod fee_table;
pub mod mock;

pub use esco::EscoClient;
pub use fee_table::{CsvFileSource, CsvUrlSource, XlsxFileSource, fee_table_source_from_config};
