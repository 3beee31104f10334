use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

/// Per-call timeout for ESCO and fee-table requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Retries for idempotent downloads (the fee sheet export).
pub const DOWNLOAD_MAX_RETRIES: u32 = 3;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Client for GET downloads: retried with exponential backoff on
    /// transient failures (5xx, timeouts, connection resets).
    pub fn create_client() -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(DOWNLOAD_MAX_RETRIES);

        ClientBuilder::new(Self::base_client())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }

    /// Client for ESCO calls. Login and account-detail are POSTs, so a failed
    /// call is reported once and never re-submitted.
    pub fn create_client_without_retry() -> ClientWithMiddleware {
        ClientBuilder::new(Self::base_client()).build()
    }

    fn base_client() -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}
