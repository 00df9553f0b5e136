//! API key lifecycle: generation, verification, revocation.
//!
//! `KeyManager` is the entry point the HTTP layer uses. It validates input,
//! drives the generator, hasher and store, and emits `audit` log events for
//! every administrative action. Plaintext keys and hashes never appear in logs.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::generator::{generate_plaintext, prefix_of};
use super::hasher::KeyHasher;
use super::store::{ApiKey, KeyStore, NewApiKey};
use super::validation::{validate_description, validate_owner_name};
use super::verifier::{KeyInfo, KeyVerifier, Lookup};
use super::KeyError;

/// Shown alongside every freshly generated key.
pub const SAVE_KEY_WARNING: &str = "Save this key now. You will not be able to view it again.";

/// Result of a successful generate call.
///
/// This is the only place the plaintext key is ever returned.
#[derive(Clone, Serialize)]
pub struct GeneratedKey {
    pub api_key: String,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub warning: &'static str,
}

impl fmt::Debug for GeneratedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedKey")
            .field("api_key", &"<redacted>")
            .field("owner_name", &self.owner_name)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Key metadata safe to list for administrators.
#[derive(Debug, Clone, Serialize)]
pub struct KeySummary {
    pub id: Uuid,
    pub owner_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<ApiKey> for KeySummary {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            owner_name: key.owner_name,
            description: key.description,
            created_at: key.created_at,
            expires_at: key.expires_at,
            last_used_at: key.last_used_at,
        }
    }
}

#[derive(Clone)]
pub struct KeyManager {
    store: Arc<dyn KeyStore>,
    hasher: KeyHasher,
    verifier: KeyVerifier,
    /// Key lifetime in days; 0 means keys never expire
    expiration_days: u32,
}

impl KeyManager {
    pub fn new(store: Arc<dyn KeyStore>, hasher: KeyHasher, expiration_days: u32) -> Self {
        let verifier = KeyVerifier::new(Arc::clone(&store), hasher.clone());

        Self {
            store,
            hasher,
            verifier,
            expiration_days,
        }
    }

    /// Generate and persist a new key for `owner_name`.
    pub async fn generate(
        &self,
        owner_name: &str,
        description: Option<&str>,
    ) -> Result<GeneratedKey, KeyError> {
        self.generate_at(owner_name, description, Utc::now()).await
    }

    /// Generate a key as of `now`, which anchors its expiration.
    ///
    /// # Process
    ///
    /// 1. Validate owner name and description
    /// 2. Generate plaintext and take its 8-character prefix
    /// 3. Hash the plaintext
    /// 4. Persist hash, prefix and expiration
    /// 5. Return the plaintext (only time it leaves this process)
    ///
    /// # Errors
    ///
    /// - `KeyError::Validation` with the specific reason; nothing is persisted
    /// - `KeyError::Entropy` / `KeyError::Hashing` if key material cannot be produced
    /// - `KeyError::Storage` if the store rejects the insert
    pub async fn generate_at(
        &self,
        owner_name: &str,
        description: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<GeneratedKey, KeyError> {
        validate_owner_name(owner_name)?;
        validate_description(description)?;

        let plaintext = generate_plaintext()?;
        let key_prefix = prefix_of(&plaintext)
            .ok_or_else(|| KeyError::Entropy("generated key has no usable prefix".to_string()))?
            .to_string();
        let key_hash = self.hasher.hash_blocking(plaintext.clone()).await?;

        let expires_at = (self.expiration_days > 0)
            .then(|| now + Duration::days(i64::from(self.expiration_days)));

        let stored = self
            .store
            .insert(NewApiKey {
                owner_name: owner_name.to_string(),
                description: description.map(str::to_string),
                key_hash,
                key_prefix,
                expires_at,
            })
            .await?;

        tracing::info!(
            target: "audit",
            key_id = %stored.id,
            owner = %stored.owner_name,
            expires_at = ?stored.expires_at,
            "API key generated"
        );

        Ok(GeneratedKey {
            api_key: plaintext,
            owner_name: stored.owner_name,
            created_at: stored.created_at,
            expires_at: stored.expires_at,
            warning: SAVE_KEY_WARNING,
        })
    }

    /// Verify a presented key. See [`KeyVerifier::verify_at`].
    pub async fn verify(&self, plaintext: &str) -> Result<KeyInfo, KeyError> {
        self.verifier.verify(plaintext).await
    }

    pub async fn verify_at(
        &self,
        plaintext: &str,
        now: DateTime<Utc>,
    ) -> Result<KeyInfo, KeyError> {
        self.verifier.verify_at(plaintext, now).await
    }

    /// Revoke the key matching `plaintext`.
    ///
    /// The record is located by prefix and hash, never by id, so only a holder of
    /// the key can revoke it. Revoked records are still matched, which makes a
    /// repeated revoke return `true` while the key stays unusable.
    ///
    /// Returns `false` when no record matches.
    pub async fn revoke(&self, plaintext: &str) -> Result<bool, KeyError> {
        let Some(key) = self.verifier.locate(plaintext, Lookup::AnyState).await? else {
            tracing::warn!(target: "audit", "revocation requested for unknown API key");
            return Ok(false);
        };

        let revoked = self.store.revoke(key.id).await?;
        if revoked {
            tracing::info!(
                target: "audit",
                key_id = %key.id,
                owner = %key.owner_name,
                already_revoked = !key.is_active,
                "API key revoked"
            );
        }

        Ok(revoked)
    }

    /// Active keys of an owner, without any secret material.
    pub async fn list_for_owner(&self, owner_name: &str) -> Result<Vec<KeySummary>, KeyError> {
        validate_owner_name(owner_name)?;

        let keys = self.store.find_by_owner(owner_name).await?;
        Ok(keys.into_iter().map(KeySummary::from).collect())
    }
}
