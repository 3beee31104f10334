// Fee schedule: raw table, row parsing and the latest-effective view
pub mod fee_row;
pub mod latest_view;
pub mod table;

pub use fee_row::{FeeKey, FeeRow, REQUIRED_COLUMNS};
pub use latest_view::{LatestFeeView, Operation};
pub use table::TabularData;
