use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use adala_core::{TenantId, UserId};

use crate::Role;

/// Claims carried in the backend's access token payload.
///
/// The client never verifies the signature: it only reads the payload to
/// decide whether a stored session is still worth presenting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    #[serde(default)]
    pub id: Option<UserId>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub tenant_id: Option<TenantId>,

    #[serde(default)]
    pub role: Option<Role>,

    /// Issued-at, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: Option<i64>,

    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Still valid at the `exp` instant itself; expired strictly after it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(exp) => now > exp,
            None => true,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Shape,

    #[error("token payload is not base64url: {0}")]
    Encoding(String),

    #[error("token payload is not valid claims JSON: {0}")]
    Payload(String),
}

/// Decode the payload segment of a JWT without checking its signature.
pub fn decode_unverified(token: &str) -> Result<TokenClaims, TokenError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Shape);
    };

    // Some issuers keep the padding; the no-pad engine rejects it.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| TokenError::Payload(e.to_string()))
}

/// Whether `token` should be treated as expired at `now`.
///
/// Any token that cannot be decoded counts as expired.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    match decode_unverified(token) {
        Ok(claims) => claims.is_expired_at(now),
        Err(err) => {
            tracing::debug!(error = %err, "undecodable token treated as expired");
            true
        }
    }
}

#[cfg(test)]
pub(crate) fn test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.c2lnbmF0dXJl")
}
