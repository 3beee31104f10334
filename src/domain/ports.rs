use crate::domain::errors::{EscoError, FeeTableError};
use crate::domain::fees::TabularData;
use async_trait::async_trait;
use serde_json::Value;

/// Where the raw fee schedule comes from (CSV file, CSV export URL, memory).
#[async_trait]
pub trait FeeTableSource: Send + Sync {
    /// One read of the source per call; nothing is cached.
    async fn load_raw_table(&self) -> Result<TabularData, FeeTableError>;

    /// Human-readable origin, used in logs and errors.
    fn describe(&self) -> String;
}

#[async_trait]
pub trait AccountDetailService: Send + Sync {
    /// Account detail record as returned by the upstream service.
    async fn get_account_detail(&self, account: i64) -> Result<Value, EscoError>;
}
