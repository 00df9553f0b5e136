//! API key HTTP handlers.
//!
//! Administrative endpoints (admin token required):
//! - POST /api/v1/admin/keys - Generate a key
//! - GET /api/v1/admin/keys?owner_name= - List an owner's active keys
//! - POST /api/v1/admin/keys/revoke - Revoke a key by its plaintext
//!
//! Key holder endpoint (API key required):
//! - GET /api/v1/keys/me - Metadata of the presented key

use crate::{
    error::AppError,
    keys::{GeneratedKey, KeyManager, KeySummary},
    middleware::auth::AuthContext,
    models::api_key::{
        GenerateKeyRequest, KeyInfoResponse, ListKeysQuery, RevokeKeyRequest, RevokeKeyResponse,
    },
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;

/// Generate a new API key.
///
/// # Response (201 Created)
///
/// ```json
/// {
///   "api_key": "Zx3v9Qp1LmN0aBcDeFgHiJkLmNoPqRsTuVwXyZ01234",
///   "owner_name": "alice",
///   "created_at": "2025-12-20T10:00:00Z",
///   "expires_at": "2026-12-20T10:00:00Z",
///   "warning": "Save this key now. You will not be able to view it again."
/// }
/// ```
///
/// The plaintext is returned here and nowhere else.
///
/// # Errors
///
/// - **400** `validation_error`: bad owner name or description
/// - **401**: missing or wrong admin token
pub async fn generate_key(
    State(keys): State<KeyManager>,
    Json(request): Json<GenerateKeyRequest>,
) -> Result<(StatusCode, Json<GeneratedKey>), AppError> {
    let generated = keys
        .generate(&request.owner_name, request.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(generated)))
}

/// List active keys for an owner. No secret material is returned.
pub async fn list_keys(
    State(keys): State<KeyManager>,
    Query(query): Query<ListKeysQuery>,
) -> Result<Json<Vec<KeySummary>>, AppError> {
    let summaries = keys.list_for_owner(&query.owner_name).await?;

    Ok(Json(summaries))
}

/// Revoke a key.
///
/// # Request Body
///
/// ```json
/// { "api_key": "Zx3v9Qp1LmN0aBcDeFgHiJkLmNoPqRsTuVwXyZ01234" }
/// ```
///
/// # Response
///
/// - **200** `{"revoked": true}`: the key is (now or already) revoked
/// - **404**: no key matches the plaintext
pub async fn revoke_key(
    State(keys): State<KeyManager>,
    Json(request): Json<RevokeKeyRequest>,
) -> Result<Json<RevokeKeyResponse>, AppError> {
    if !keys.revoke(&request.api_key).await? {
        return Err(AppError::ApiKeyNotFound);
    }

    Ok(Json(RevokeKeyResponse { revoked: true }))
}

/// Describe the key that authenticated this request.
pub async fn current_key(Extension(auth): Extension<AuthContext>) -> Json<KeyInfoResponse> {
    Json(KeyInfoResponse::new(auth.key, Utc::now()))
}
