//! API key verification.
//!
//! Verification is a two-step lookup:
//!
//! 1. Fetch the active records sharing the presented key's 8-character prefix
//!    (an indexed query, usually returning one row)
//! 2. Confirm identity by checking the presented key against each candidate's
//!    Argon2 hash
//!
//! Prefix equality alone never authenticates a request, and the store is never
//! scanned for hashes without a prefix.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::generator::prefix_of;
use super::hasher::KeyHasher;
use super::store::{ApiKey, KeyStore};
use super::KeyError;

/// Public metadata of a verified key.
///
/// Carries nothing derived from the secret: no hash, no prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    /// Last successful verification before this one
    pub last_used_at: Option<DateTime<Utc>>,
}

impl KeyInfo {
    /// Whole days until expiry, negative once expired. `None` for keys that
    /// never expire.
    pub fn expires_in_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - now).num_days())
    }
}

impl From<&ApiKey> for KeyInfo {
    fn from(key: &ApiKey) -> Self {
        Self {
            owner_name: key.owner_name.clone(),
            created_at: key.created_at,
            expires_at: key.expires_at,
            last_used_at: key.last_used_at,
        }
    }
}

/// Which records a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup {
    ActiveOnly,
    /// Revoked records too; used by revocation so repeating it is idempotent
    AnyState,
}

#[derive(Clone)]
pub struct KeyVerifier {
    store: Arc<dyn KeyStore>,
    hasher: KeyHasher,
}

impl KeyVerifier {
    pub fn new(store: Arc<dyn KeyStore>, hasher: KeyHasher) -> Self {
        Self { store, hasher }
    }

    /// Verify a presented key against the current wall clock.
    pub async fn verify(&self, plaintext: &str) -> Result<KeyInfo, KeyError> {
        self.verify_at(plaintext, Utc::now()).await
    }

    /// Verify a presented key as of `now`.
    ///
    /// # Errors
    ///
    /// - `KeyError::Invalid` for every rejection: malformed input, no matching
    ///   hash, revoked or expired key. Callers cannot tell these apart.
    /// - `KeyError::Storage` when the store cannot be read.
    pub async fn verify_at(
        &self,
        plaintext: &str,
        now: DateTime<Utc>,
    ) -> Result<KeyInfo, KeyError> {
        let key = self
            .locate(plaintext, Lookup::ActiveOnly)
            .await?
            .ok_or(KeyError::Invalid)?;

        if !key.is_active {
            return Err(KeyError::Invalid);
        }

        if key.is_expired_at(now) {
            tracing::warn!(
                target: "audit",
                key_id = %key.id,
                owner = %key.owner_name,
                "expired API key presented"
            );
            return Err(KeyError::Invalid);
        }

        self.spawn_touch(&key, now);

        Ok(KeyInfo::from(&key))
    }

    /// Find the record whose hash matches `plaintext`.
    ///
    /// Returns `Ok(None)` without touching the store when the input cannot carry
    /// a valid prefix.
    pub(crate) async fn locate(
        &self,
        plaintext: &str,
        lookup: Lookup,
    ) -> Result<Option<ApiKey>, KeyError> {
        let Some(prefix) = prefix_of(plaintext) else {
            return Ok(None);
        };

        let mut candidates = match lookup {
            Lookup::ActiveOnly => self.store.find_active_by_prefix(prefix).await?,
            Lookup::AnyState => self.store.find_by_prefix(prefix).await?,
        };

        if candidates.is_empty() {
            return Ok(None);
        }

        let hashes = candidates.iter().map(|c| c.key_hash.clone()).collect();
        let matched = self
            .hasher
            .first_match_blocking(plaintext.to_string(), hashes)
            .await?;

        Ok(matched.map(|index| candidates.swap_remove(index)))
    }

    /// Update `last_used_at` without holding up the caller.
    fn spawn_touch(&self, key: &ApiKey, now: DateTime<Utc>) {
        let store = Arc::clone(&self.store);
        let key_id = key.id;

        tokio::spawn(async move {
            if let Err(e) = store.touch_last_used(key_id, now).await {
                tracing::warn!(%key_id, error = %e, "failed to record API key usage");
            }
        });
    }
}
