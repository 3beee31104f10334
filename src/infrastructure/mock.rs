use crate::domain::errors::{EscoError, FeeTableError};
use crate::domain::fees::TabularData;
use crate::domain::ports::{AccountDetailService, FeeTableSource};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::info;

/// Fee-table source backed by memory; the table can be replaced or broken
/// between reloads.
#[derive(Clone)]
pub struct InMemoryFeeTableSource {
    table: Arc<RwLock<Result<TabularData, String>>>,
    loads: Arc<AtomicUsize>,
}

impl InMemoryFeeTableSource {
    pub fn new(table: TabularData) -> Self {
        Self {
            table: Arc::new(RwLock::new(Ok(table))),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn set_table(&self, table: TabularData) {
        *self.table.write().await = Ok(table);
    }

    /// Make the next loads fail as an unreachable source would.
    pub async fn set_unavailable(&self, reason: &str) {
        *self.table.write().await = Err(reason.to_string());
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeeTableSource for InMemoryFeeTableSource {
    async fn load_raw_table(&self) -> Result<TabularData, FeeTableError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &*self.table.read().await {
            Ok(table) => Ok(table.clone()),
            Err(reason) => Err(FeeTableError::SourceUnavailable {
                origin: self.describe(),
                reason: reason.clone(),
            }),
        }
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Account-detail service answering from a fixed set of records.
/// Unknown accounts answer like an upstream 404.
#[derive(Clone, Default)]
pub struct MockAccountDetailService {
    records: Arc<RwLock<HashMap<i64, Value>>>,
    calls: Arc<AtomicUsize>,
}

impl MockAccountDetailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, account: i64, record: Value) {
        self.records.write().await.insert(account, record);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountDetailService for MockAccountDetailService {
    async fn get_account_detail(&self, account: i64) -> Result<Value, EscoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.records.read().await.get(&account) {
            Some(record) => {
                info!("MockAccountDetailService: serving account {}", account);
                Ok(record.clone())
            }
            None => Err(EscoError::UpstreamCallFailed {
                endpoint: "get-detalle-cuenta".to_string(),
                status: 404,
                body: format!("cuenta {} inexistente", account),
            }),
        }
    }
}
