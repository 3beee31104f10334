use crate::domain::errors::{FeeTableError, LookupError};
use crate::domain::fees::LatestFeeView;
use crate::domain::ports::FeeTableSource;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Process-wide holder of the current [`LatestFeeView`].
///
/// A reload builds the new view completely before swapping the shared `Arc`,
/// so readers always get either the old view or the new one in full. A failed
/// reload keeps the previous view in memory but disables lookups until the
/// next successful reload.
pub struct FeeCatalog {
    source: Arc<dyn FeeTableSource>,
    state: RwLock<CatalogState>,
}

#[derive(Default)]
struct CatalogState {
    view: Option<Arc<LatestFeeView>>,
    last_error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
}

/// Snapshot of the catalog for status displays.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStatus {
    pub origin: String,
    pub available: bool,
    pub fee_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl FeeCatalog {
    pub fn new(source: Arc<dyn FeeTableSource>) -> Self {
        Self {
            source,
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// Fetch the source, rebuild the view and swap it in.
    pub async fn reload(&self) -> Result<Arc<LatestFeeView>, FeeTableError> {
        let origin = self.source.describe();
        info!("Loading fee table from {}", origin);

        let built = match self.source.load_raw_table().await {
            Ok(raw) => LatestFeeView::build(&raw),
            Err(e) => Err(e),
        };

        let mut state = self.state.write().await;
        match built {
            Ok(view) => {
                let view = Arc::new(view);
                state.view = Some(view.clone());
                state.last_error = None;
                state.loaded_at = Some(Utc::now());
                info!("Fee table loaded from {}: {} current fees", origin, view.len());
                Ok(view)
            }
            Err(e) => {
                error!("Fee table reload from {} failed: {}", origin, e);
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The view lookups should run against, or why there is none.
    pub async fn current(&self) -> Result<Arc<LatestFeeView>, LookupError> {
        let state = self.state.read().await;
        if let Some(reason) = &state.last_error {
            return Err(LookupError::CatalogUnavailable {
                reason: reason.clone(),
            });
        }
        state.view.clone().ok_or_else(|| LookupError::CatalogUnavailable {
            reason: "fee table not loaded yet".to_string(),
        })
    }

    pub async fn status(&self) -> CatalogStatus {
        let state = self.state.read().await;
        CatalogStatus {
            origin: self.source.describe(),
            available: state.last_error.is_none() && state.view.is_some(),
            fee_count: state.view.as_ref().map(|v| v.len()).unwrap_or(0),
            loaded_at: state.loaded_at,
            last_error: state.last_error.clone(),
        }
    }
}
