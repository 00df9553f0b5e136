//! API key persistence.
//!
//! The [`KeyStore`] trait is the only way the key subsystem touches storage.
//! Every operation is a single-row read or write, so row-level atomicity in the
//! backing database is all the subsystem relies on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table. The plaintext key is never stored; only
/// `key_prefix` (its first 8 characters) and `key_hash` (an Argon2id PHC string).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    /// Unique identifier, assigned by the store
    pub id: Uuid,

    /// First 8 characters of the plaintext key
    ///
    /// Several records may share a prefix. It narrows the candidate set for hash
    /// verification and is never an authorization decision on its own.
    pub key_prefix: String,

    /// Salted one-way hash of the full plaintext key
    pub key_hash: String,

    /// Principal this key authenticates as
    pub owner_name: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    /// `None` means the key never expires
    pub expires_at: Option<DateTime<Utc>>,

    pub last_used_at: Option<DateTime<Utc>>,

    /// Set to false by revocation, never back to true
    pub is_active: bool,
}

impl ApiKey {
    /// Whether the key is past its expiration at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }
}

/// Fields supplied by the caller when inserting a key.
#[derive(Debug, Clone)]
pub struct NewApiKey {
    pub owner_name: String,
    pub description: Option<String>,
    pub key_hash: String,
    pub key_prefix: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// The key store could not be reached or rejected the operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("key store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Persist a new key and return the stored record, including its id and
    /// `created_at`.
    async fn insert(&self, key: NewApiKey) -> Result<ApiKey, StoreError>;

    /// Every active key (any owner) with the given prefix.
    async fn find_active_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, StoreError>;

    /// Every key with the given prefix, revoked ones included.
    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, StoreError>;

    /// Record a successful verification. Idempotent.
    async fn touch_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Mark a key inactive. Returns whether the key exists; revoking an already
    /// revoked key returns `true`.
    async fn revoke(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Active keys belonging to `owner_name`, newest first.
    async fn find_by_owner(&self, owner_name: &str) -> Result<Vec<ApiKey>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expires_at: Option<DateTime<Utc>>) -> ApiKey {
        ApiKey {
            id: Uuid::new_v4(),
            key_prefix: "abcdefgh".to_string(),
            key_hash: "$argon2id$fake".to_string(),
            owner_name: "alice".to_string(),
            description: None,
            created_at: Utc::now(),
            expires_at,
            last_used_at: None,
            is_active: true,
        }
    }

    #[test]
    fn test_expiry_boundaries() {
        let now = Utc::now();

        assert!(!record(None).is_expired_at(now));
        assert!(!record(Some(now)).is_expired_at(now));
        assert!(!record(Some(now + Duration::seconds(1))).is_expired_at(now));
        assert!(record(Some(now - Duration::seconds(1))).is_expired_at(now));
    }
}
