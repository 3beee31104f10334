pub mod fee_catalog;
pub mod fee_lookup;
pub mod group_resolver;

pub use fee_catalog::{CatalogStatus, FeeCatalog};
pub use fee_lookup::{AccountFeeReport, AccountFeeRequest, FeeLookupService};
