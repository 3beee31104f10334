//! Configuration module for the fee resolver.
//!
//! Configuration is read from environment variables (a `.env` file is loaded by
//! the binary first), organized by concern: ESCO service and fee-table source.

mod esco_config;
mod fee_source_config;

pub use esco_config::{DEFAULT_ESCO_API_VERSION, DEFAULT_ESCO_BASE_URL, EscoConfig};
pub use fee_source_config::{DEFAULT_FEE_TABLE_PATH, FeeSourceConfig, FeeTableLocation};

use anyhow::Result;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub esco: EscoConfig,
    pub fee_source: FeeSourceConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            esco: EscoConfig::from_env()?,
            fee_source: FeeSourceConfig::from_env(),
        })
    }
}
