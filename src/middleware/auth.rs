//! Authentication middleware.
//!
//! Two guards protect the router:
//! - `auth_middleware`: API key holders (OwnTracks clients, read-back consumers)
//! - `admin_middleware`: the operator managing keys, via `ADMIN_TOKEN`

use crate::{
    error::AppError,
    keys::KeyInfo,
    state::{AppState, token_digest},
};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};

/// Header accepted as an alternative to `Authorization`.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; handlers extract it with
/// `Extension<AuthContext>`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Metadata of the key that authenticated the request
    pub key: KeyInfo,
}

impl AuthContext {
    pub fn owner_name(&self) -> &str {
        &self.key.owner_name
    }
}

/// Pull a presented API key out of the request headers.
///
/// # Accepted Forms
///
/// ```text
/// Authorization: Bearer <key>
/// Authorization: Basic base64(<user>:<key>)   (OwnTracks HTTP mode)
/// X-API-Key: <key>
/// ```
pub fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(key) = auth.strip_prefix("Bearer ") {
            return Some(key.trim().to_string());
        }
        if let Some(key) = auth.strip_prefix("Basic ").and_then(basic_password) {
            return Some(key);
        }
    }

    headers
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|key| key.trim().to_string())
}

/// Password half of a Basic credential; `None` when it does not decode.
fn basic_password(encoded: &str) -> Option<String> {
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (_user, key) = credentials.split_once(':')?;
    Some(key.to_string())
}

/// API key authentication middleware.
///
/// # Flow
///
/// 1. Extract the key from the request headers
/// 2. Verify it (prefix lookup, hash check, revocation and expiry)
/// 3. On success inject `AuthContext` and call the next handler
/// 4. Otherwise return 401; a store outage returns 500 instead
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = extract_api_key(request.headers()).ok_or(AppError::InvalidApiKey)?;

    let key = state.keys.verify(&api_key).await?;

    request.extensions_mut().insert(AuthContext { key });

    Ok(next.run(request).await)
}

/// Admin token middleware for key management routes.
///
/// Expects `Authorization: Bearer <ADMIN_TOKEN>`. Tokens are compared as
/// SHA-256 digests so the comparison time does not depend on the token.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::InvalidAdminToken)?;

    if token_digest(token) != state.admin_token_digest {
        tracing::warn!(target: "audit", "rejected admin request with wrong token");
        return Err(AppError::InvalidAdminToken);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_bearer_key() {
        assert_eq!(
            extract_api_key(&headers("authorization", "Bearer abc123xyz")),
            Some("abc123xyz".to_string())
        );
    }

    #[test]
    fn test_basic_auth_password_is_the_key() {
        let encoded = STANDARD.encode("phone:abc:123");
        assert_eq!(
            extract_api_key(&headers("authorization", &format!("Basic {encoded}"))),
            Some("abc:123".to_string())
        );
    }

    #[test]
    fn test_x_api_key_header() {
        assert_eq!(
            extract_api_key(&headers("x-api-key", "abc123xyz")),
            Some("abc123xyz".to_string())
        );
    }

    #[test]
    fn test_missing_or_garbled_credentials() {
        assert_eq!(extract_api_key(&HeaderMap::new()), None);
        assert_eq!(extract_api_key(&headers("authorization", "Basic !!!")), None);
        let no_colon = format!("Basic {}", STANDARD.encode("nocolon"));
        assert_eq!(extract_api_key(&headers("authorization", &no_colon)), None);
    }

    #[test]
    fn test_garbled_basic_falls_back_to_x_api_key() {
        let mut map = headers("authorization", "Basic !!!");
        map.insert(API_KEY_HEADER, HeaderValue::from_static("abc123xyz"));

        assert_eq!(extract_api_key(&map), Some("abc123xyz".to_string()));
    }
}
