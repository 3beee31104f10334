use crate::application::fee_catalog::FeeCatalog;
use crate::application::group_resolver::locate_group_code;
use crate::domain::errors::LookupError;
use crate::domain::fee_groups::describe_fee_group;
use crate::domain::fees::{FeeRow, Operation};
use crate::domain::ports::AccountDetailService;
use std::sync::Arc;
use tracing::{info, warn};

/// User input for an account lookup. Operation and currency narrow the
/// result step by step; either may be left empty.
#[derive(Debug, Clone, Default)]
pub struct AccountFeeRequest {
    pub account: String,
    pub operation: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountFeeReport {
    pub account: i64,
    pub group_code: i64,
    pub group_name: String,
    pub operations: Vec<Operation>,
    /// Currencies of the chosen operation; empty when no operation was given.
    pub currencies: Vec<String>,
    /// Current fee per instrument type; empty when operation or currency is missing
    /// or when nothing matches.
    pub fees: Vec<FeeRow>,
}

/// Drives account → fee group → operation → currency → fees.
pub struct FeeLookupService {
    catalog: Arc<FeeCatalog>,
    accounts: Arc<dyn AccountDetailService>,
}

impl FeeLookupService {
    pub fn new(catalog: Arc<FeeCatalog>, accounts: Arc<dyn AccountDetailService>) -> Self {
        Self { catalog, accounts }
    }

    pub async fn lookup(&self, request: &AccountFeeRequest) -> Result<AccountFeeReport, LookupError> {
        let view = self.catalog.current().await?;

        let input = request.account.trim();
        let account = input.parse::<i64>().map_err(|_| LookupError::InvalidAccount {
            input: input.to_string(),
        })?;

        let record = self.accounts.get_account_detail(account).await?;
        let (group_code, source) =
            locate_group_code(&record).ok_or(LookupError::GroupCodeNotFound { account })?;
        let group_name = describe_fee_group(group_code).into_owned();
        info!(
            "Account {} -> group code {} ({:?}) '{}'",
            account, group_code, source, group_name
        );

        if !view.has_group(&group_name) {
            warn!("Fee group '{}' not present in fee table", group_name);
            return Err(LookupError::GroupNotInTable { group: group_name });
        }

        let operation = non_blank(request.operation.as_deref());
        let currency = non_blank(request.currency.as_deref());

        let operations = view.list_operations(&group_name);
        let currencies = match operation {
            Some(op) => view.list_currencies_for_operation(&group_name, op),
            None => Vec::new(),
        };
        let fees: Vec<FeeRow> = match (operation, currency) {
            (Some(op), Some(cur)) => view
                .list_fees_by_currency(&group_name, op, cur)
                .into_iter()
                .cloned()
                .collect(),
            _ => Vec::new(),
        };

        if operation.is_some() && currency.is_some() && fees.is_empty() {
            info!(
                "No current fees for group '{}' operation {:?} currency {:?}",
                group_name, operation, currency
            );
        }

        Ok(AccountFeeReport {
            account,
            group_code,
            group_name,
            operations,
            currencies,
            fees,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
