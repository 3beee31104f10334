use super::token::{TokenState, extract_token};
use crate::config::EscoConfig;
use crate::domain::errors::{EscoError, truncate_body};
use crate::domain::ports::AccountDetailService;
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use chrono::Utc;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

const ODATA_JSON: &str = "application/json;odata.metadata=minimal;odata.streaming=true";
const PLAIN_JSON: &str = "application/json";

#[derive(Debug, Clone, Default)]
struct Credentials {
    username: String,
    password: String,
    client_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_name: &'a str,
    password: &'a str,
    client_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountDetailRequest {
    cuenta: i64,
    time_stamp: i64,
    param_pagination: Pagination,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    page_number: u32,
    page_size: u32,
}

/// Authenticated client for the ESCO account-information API.
///
/// One token is shared by every request made through this client. It is
/// checked before each authenticated call and renewed once stale.
pub struct EscoClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_version: String,
    odata_headers: bool,
    credentials: RwLock<Credentials>,
    token: Mutex<TokenState>,
}

impl EscoClient {
    pub fn new(config: &EscoConfig) -> Self {
        Self {
            client: HttpClientFactory::create_client_without_retry(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            odata_headers: config.odata_headers,
            credentials: RwLock::new(Credentials {
                username: config.username.clone(),
                password: config.password.clone(),
                client_id: config.client_id.clone(),
            }),
            token: Mutex::new(TokenState::default()),
        }
    }

    pub async fn set_credentials(&self, username: &str, password: &str, client_id: &str) {
        let mut creds = self.credentials.write().await;
        *creds = Credentials {
            username: username.trim().to_string(),
            password: password.to_string(),
            client_id: client_id.trim().to_string(),
        };
    }

    /// Force a fresh login, replacing any current token.
    pub async fn login(&self) -> Result<(), EscoError> {
        let mut state = self.token.lock().await;
        state.clear();
        self.authenticate(&mut state).await.map(|_| ())
    }

    pub async fn logout(&self) {
        self.token.lock().await.clear();
        info!("ESCO token discarded");
    }

    /// Current token, logging in first when it is missing or stale.
    pub async fn ensure_token(&self) -> Result<String, EscoError> {
        let mut state = self.token.lock().await;
        if state.is_valid() {
            if let Some(token) = state.token() {
                return Ok(token.to_string());
            }
        }
        self.authenticate(&mut state).await
    }

    pub async fn get_account_detail(&self, account: i64) -> Result<Value, EscoError> {
        let token = self.ensure_token().await?;
        let endpoint = "get-detalle-cuenta";

        let payload = AccountDetailRequest {
            cuenta: account,
            time_stamp: 0,
            param_pagination: Pagination {
                page_number: 0,
                page_size: 0,
            },
        };

        let (status, body) = self.post(endpoint, Some(&token), serde_json::to_string(&payload)?, true).await?;
        read_json_response(endpoint, status, &body).inspect_err(|_| {
            warn!("{} for account {} failed with status {}", endpoint, account, status);
        })
    }

    async fn authenticate(&self, state: &mut TokenState) -> Result<String, EscoError> {
        let creds = self.credentials.read().await.clone();
        if creds.username.is_empty() || creds.password.is_empty() {
            return Err(EscoError::MissingCredentials);
        }

        let payload = LoginRequest {
            user_name: &creds.username,
            password: &creds.password,
            client_id: &creds.client_id,
        };

        debug!("Logging in to ESCO as {}", creds.username);
        let (status, body) = self.post("login", None, serde_json::to_string(&payload)?, false).await?;
        let token = read_login_response(status, &body).inspect_err(|_| {
            warn!("ESCO login rejected with status {}", status);
        })?;

        *state = TokenState::issue(token.clone(), Utc::now());
        info!(
            "ESCO login OK, token valid until {:?}",
            state.expires_at()
        );
        Ok(token)
    }

    async fn post(
        &self,
        endpoint: &str,
        token: Option<&str>,
        body: String,
        accept_json: bool,
    ) -> Result<(u16, String), EscoError> {
        let url = self.endpoint_url(endpoint);

        let mut request = self.client.post(&url);
        for (name, value) in self.headers(token, accept_json, true) {
            request = request.header(name, value);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| EscoError::Transport {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| EscoError::Transport {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        Ok((status, text))
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/api/v{}/{}", self.base_url, self.api_version, endpoint)
    }

    fn headers(&self, token: Option<&str>, accept_json: bool, send_json: bool) -> Vec<(&'static str, String)> {
        let json = if self.odata_headers { ODATA_JSON } else { PLAIN_JSON };

        let mut headers = vec![("api-version", self.api_version.clone())];
        if let Some(token) = token {
            headers.push(("Authorization", format!("Bearer {}", token)));
        }
        if accept_json {
            headers.push(("accept", json.to_string()));
        }
        if send_json {
            headers.push(("Content-Type", json.to_string()));
        }
        headers
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Token from a login response; a non-2xx status or a body without a token
/// field is an authentication failure.
fn read_login_response(status: u16, body: &str) -> Result<String, EscoError> {
    if !is_success(status) {
        return Err(EscoError::AuthenticationFailed {
            status,
            body: truncate_body(body),
        });
    }

    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| extract_token(&v))
        .ok_or_else(|| EscoError::AuthenticationFailed {
            status,
            body: format!("no token in login response: {}", truncate_body(body)),
        })
}

fn read_json_response(endpoint: &str, status: u16, body: &str) -> Result<Value, EscoError> {
    if !is_success(status) {
        return Err(EscoError::UpstreamCallFailed {
            endpoint: endpoint.to_string(),
            status,
            body: truncate_body(body),
        });
    }

    serde_json::from_str(body).map_err(|_| EscoError::UpstreamNotJson {
        endpoint: endpoint.to_string(),
        status,
        body: truncate_body(body),
    })
}

#[async_trait]
impl AccountDetailService for EscoClient {
    async fn get_account_detail(&self, account: i64) -> Result<Value, EscoError> {
        EscoClient::get_account_detail(self, account).await
    }
}
