//! API key request/response bodies.
//!
//! The stored record itself lives in [`crate::keys::ApiKey`]; these types are
//! only what crosses the HTTP boundary. None of them carry a key hash.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::KeyInfo;

/// Request body for `POST /api/v1/admin/keys`.
///
/// # JSON Example
///
/// ```json
/// {
///   "owner_name": "alice",
///   "description": "OwnTracks on Alice's phone"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct GenerateKeyRequest {
    #[serde(alias = "user_name")]
    pub owner_name: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for `POST /api/v1/admin/keys/revoke`.
///
/// Revocation is by plaintext key, never by id.
#[derive(Deserialize)]
pub struct RevokeKeyRequest {
    pub api_key: String,
}

impl fmt::Debug for RevokeKeyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevokeKeyRequest")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct RevokeKeyResponse {
    pub revoked: bool,
}

/// Query parameters for `GET /api/v1/admin/keys`.
#[derive(Debug, Deserialize)]
pub struct ListKeysQuery {
    pub owner_name: String,
}

/// Response body for `GET /api/v1/keys/me`.
///
/// # JSON Example
///
/// ```json
/// {
///   "owner_name": "alice",
///   "created_at": "2025-12-20T10:00:00Z",
///   "expires_at": "2026-12-20T10:00:00Z",
///   "last_used_at": "2025-12-21T08:12:44Z",
///   "expires_in_days": 364
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct KeyInfoResponse {
    #[serde(flatten)]
    pub key: KeyInfo,

    /// Whole days left; `null` for keys that never expire
    pub expires_in_days: Option<i64>,
}

impl KeyInfoResponse {
    pub fn new(key: KeyInfo, now: DateTime<Utc>) -> Self {
        let expires_in_days = key.expires_in_days(now);
        Self {
            key,
            expires_in_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_request_debug_hides_key() {
        let request: RevokeKeyRequest =
            serde_json::from_str(r#"{"api_key": "Zx3v9Qp1LmN0aBcDeFgHiJkLmNoPqRsTuVwXyZ01234"}"#)
                .unwrap();

        let debug = format!("{request:?}");
        assert!(!debug.contains("Zx3v9Qp1"));
        assert_eq!(request.api_key.len(), 43);
    }
}
