//! API key authentication.
//!
//! Keys are random 43-character URL-safe strings. The database only ever sees
//! the first 8 characters (the lookup prefix) and a salted Argon2id hash of the
//! whole key, so a leaked `api_keys` table does not yield usable credentials.
//!
//! # Components
//!
//! - [`generator`]: plaintext key generation
//! - [`hasher`]: Argon2id hashing and verification
//! - [`store`]: the [`KeyStore`] persistence trait; [`postgres`] implements it
//! - [`verifier`]: prefix lookup followed by hash confirmation
//! - [`manager`]: generate / verify / revoke orchestration

pub mod generator;
pub mod hasher;
pub mod manager;
pub mod postgres;
pub mod store;
pub mod validation;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use hasher::{HasherError, KeyHasher};
pub use manager::{GeneratedKey, KeyManager, KeySummary};
pub use postgres::PgKeyStore;
pub use store::{ApiKey, KeyStore, NewApiKey, StoreError};
pub use validation::ValidationError;
pub use verifier::{KeyInfo, KeyVerifier};

/// Length of the clear-text lookup prefix, in characters.
pub const PREFIX_LEN: usize = 8;

/// Errors from the key subsystem.
///
/// `Invalid` is deliberately a single outcome: callers learn that a key was
/// rejected, never why.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid API key")]
    Invalid,

    #[error("key storage failed: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Hashing(#[from] HasherError),

    #[error("secure random source unavailable: {0}")]
    Entropy(String),
}
