use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// A token is treated as stale this many seconds before its claimed expiry.
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// Assumed validity when the token carries no readable `exp` claim.
pub const FALLBACK_VALIDITY_SECS: i64 = 25 * 60;

/// Field names the login response may carry the token under, in priority order.
pub const TOKEN_FIELDS: &[&str] = &["token", "access_token", "jwt", "bearer", "Token", "AccessToken"];

#[derive(Debug, Clone, Default)]
pub struct TokenState {
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    /// Store a freshly issued token; expiry comes from its `exp` claim when readable.
    pub fn issue(token: String, now: DateTime<Utc>) -> Self {
        let expires_at = extract_expiry(&token).unwrap_or(now + Duration::seconds(FALLBACK_VALIDITY_SECS));
        Self {
            token: Some(token),
            expires_at: Some(expires_at),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.expires_at) {
            (Some(token), Some(exp)) => !token.is_empty() && now < exp - Duration::seconds(EXPIRY_MARGIN_SECS),
            _ => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.expires_at = None;
    }
}

/// First non-blank string under one of [`TOKEN_FIELDS`].
pub fn extract_token(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    TOKEN_FIELDS
        .iter()
        .filter_map(|field| object.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// Read the `exp` claim of a JWT without verifying its signature.
/// Anything unreadable yields `None`.
pub fn extract_expiry(token: &str) -> Option<DateTime<Utc>> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_str(&String::from_utf8_lossy(&payload)).ok()?;

    let exp = match claims.as_object()?.get("exp")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !exp.is_finite() {
        return None;
    }

    let secs = exp.trunc() as i64;
    let nanos = ((exp - exp.trunc()) * 1e9) as u32;
    DateTime::from_timestamp(secs, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jwt(claims: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn test_expiry_from_exp_claim() {
        let token = jwt(&json!({"sub": "operador", "exp": 1_900_000_000}));
        assert_eq!(
            extract_expiry(&token),
            DateTime::from_timestamp(1_900_000_000, 0)
        );

        let token = jwt(&json!({"exp": "1900000000"}));
        assert_eq!(
            extract_expiry(&token),
            DateTime::from_timestamp(1_900_000_000, 0)
        );
    }

    #[test]
    fn test_expiry_is_best_effort() {
        assert_eq!(extract_expiry("opaque-token"), None);
        assert_eq!(extract_expiry("a.b"), None);
        assert_eq!(extract_expiry("a.!!!.c"), None);
        assert_eq!(extract_expiry(&jwt(&json!({"sub": "x"}))), None);
        assert_eq!(extract_expiry(&jwt(&json!(["exp"]))), None);
        assert_eq!(extract_expiry(&jwt(&json!({"exp": null}))), None);
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let payload = base64::engine::general_purpose::URL_SAFE.encode(br#"{"exp":1900000000}"#);
        let token = format!("{}.{}.sig", header, payload);
        assert!(extract_expiry(&token).is_some());
    }

    #[test]
    fn test_token_goes_stale_before_expiry() {
        let now = Utc::now();
        let exp = now + Duration::seconds(60);
        let token = jwt(&json!({"exp": exp.timestamp()}));
        let state = TokenState::issue(token, now);

        assert!(state.is_valid_at(now));
        assert!(!state.is_valid_at(now + Duration::seconds(31)));
    }

    #[test]
    fn test_opaque_token_uses_fallback_window() {
        let now = Utc::now();
        let state = TokenState::issue("opaque".to_string(), now);

        assert_eq!(state.expires_at(), Some(now + Duration::seconds(FALLBACK_VALIDITY_SECS)));
        assert!(state.is_valid_at(now + Duration::minutes(24)));
        assert!(!state.is_valid_at(now + Duration::minutes(25)));
    }

    #[test]
    fn test_empty_state_is_never_valid() {
        let mut state = TokenState::default();
        assert!(!state.is_valid());

        state = TokenState::issue("opaque".to_string(), Utc::now());
        state.clear();
        assert!(!state.is_valid());
        assert_eq!(state.token(), None);
    }

    #[test]
    fn test_token_field_aliases() {
        assert_eq!(extract_token(&json!({"token": " abc "})), Some("abc".to_string()));
        assert_eq!(
            extract_token(&json!({"token": "  ", "AccessToken": "xyz"})),
            Some("xyz".to_string())
        );
        assert_eq!(extract_token(&json!({"access_token": 42})), None);
        assert_eq!(extract_token(&json!(["token"])), None);
    }
}
