use thiserror::Error;

/// Upstream bodies are cut to this many characters before they reach a message.
pub const MAX_ERROR_BODY_CHARS: usize = 300;

/// Errors raised while fetching or normalising the fee table
#[derive(Debug, Error)]
pub enum FeeTableError {
    #[error("Fee table source unavailable ({origin}): {reason}")]
    SourceUnavailable { origin: String, reason: String },

    #[error("Fee table is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
}

/// Errors related to the ESCO account-information service
#[derive(Debug, Error)]
pub enum EscoError {
    #[error("Missing username/password for ESCO login")]
    MissingCredentials,

    #[error("ESCO login failed ({status}): {body}")]
    AuthenticationFailed { status: u16, body: String },

    #[error("{endpoint} failed ({status}): {body}")]
    UpstreamCallFailed {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{endpoint} returned a non-JSON response ({status}): {body}")]
    UpstreamNotJson {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Request to {endpoint} could not be sent: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced by an account fee lookup
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Fee table not available: {reason}")]
    CatalogUnavailable { reason: String },

    #[error("Account must be numeric, got '{input}'")]
    InvalidAccount { input: String },

    #[error("No fee-group code (codGrupoArOperBurs / codGrupoArAcr) in the detail of account {account}")]
    GroupCodeNotFound { account: i64 },

    #[error("Fee group '{group}' does not appear in the fee table")]
    GroupNotInTable { group: String },

    #[error(transparent)]
    Esco(#[from] EscoError),
}

/// Truncate an upstream payload to [`MAX_ERROR_BODY_CHARS`] characters.
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => body[..cut].to_string(),
        None => body.to_string(),
    }
}
