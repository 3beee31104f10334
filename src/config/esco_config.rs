//! ESCO account-information service configuration.

use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_ESCO_BASE_URL: &str = "http://190.210.249.97:8003";
pub const DEFAULT_ESCO_API_VERSION: &str = "9";

/// Connection settings and (optional) credentials for the ESCO API
#[derive(Debug, Clone)]
pub struct EscoConfig {
    pub base_url: String,
    pub api_version: String,
    /// Send OData `accept` / `Content-Type` variants, as the ESCO swagger does
    pub odata_headers: bool,
    pub username: String,
    pub password: String,
    pub client_id: String,
}

impl Default for EscoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ESCO_BASE_URL.to_string(),
            api_version: DEFAULT_ESCO_API_VERSION.to_string(),
            odata_headers: true,
            username: String::new(),
            password: String::new(),
            client_id: String::new(),
        }
    }
}

impl EscoConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = var("ESCO_BASE_URL")
            .unwrap_or_else(|| DEFAULT_ESCO_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base_url).with_context(|| format!("Invalid ESCO_BASE_URL: {}", base_url))?;

        Ok(Self {
            base_url,
            api_version: var("ESCO_API_VERSION")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_ESCO_API_VERSION.to_string()),
            odata_headers: var("ESCO_ODATA_HEADERS")
                .unwrap_or_else(|| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
            username: var("ESCO_USERNAME").unwrap_or_default().trim().to_string(),
            password: var("ESCO_PASSWORD").unwrap_or_default(),
            client_id: var("ESCO_CLIENT_ID").unwrap_or_default().trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_esco_config_defaults() {
        let config = EscoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_ESCO_BASE_URL);
        assert_eq!(config.api_version, "9");
        assert!(config.odata_headers);
        assert!(config.username.is_empty());
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = EscoConfig::from_lookup(lookup(&[
            ("ESCO_BASE_URL", "https://esco.example.com/"),
            ("ESCO_API_VERSION", "10"),
            ("ESCO_ODATA_HEADERS", "false"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://esco.example.com");
        assert_eq!(config.api_version, "10");
        assert!(!config.odata_headers);
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = EscoConfig::from_lookup(lookup(&[("ESCO_BASE_URL", "not a url")]));
        assert!(result.is_err());
    }
}
