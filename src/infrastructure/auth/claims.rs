//! Reads the `exp` claim out of a JWT without verifying its signature.
//!
//! The adapter only needs to know when to refresh; the remote API remains the
//! authority on whether the token is acceptable.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Extract the expiration instant from a JWT's payload segment.
pub fn decode_expiry(token: &str) -> Result<DateTime<Utc>, String> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| "token has no payload segment".to_string())?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| format!("payload is not base64url: {}", e))?;

    let claims: Value =
        serde_json::from_slice(&bytes).map_err(|e| format!("payload is not JSON: {}", e))?;

    let exp = claims
        .get("exp")
        .and_then(Value::as_f64)
        .ok_or_else(|| "missing numeric exp claim".to_string())?;

    DateTime::from_timestamp(exp.trunc() as i64, 0)
        .ok_or_else(|| format!("exp claim {} out of range", exp))
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{body}.signature")
}
