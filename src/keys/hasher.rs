//! One-way hashing of API keys with Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so every hash carries its own salt and work factor. Verification always uses the
//! parameters embedded in the stored hash, which means raising the configured cost
//! only affects keys generated afterwards.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Lowest number of Argon2 passes accepted.
pub const MIN_ITERATIONS: u32 = 2;

/// Default memory cost in KiB (OWASP recommendation for Argon2id).
pub const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;

/// Default number of Argon2 passes.
pub const DEFAULT_ITERATIONS: u32 = 2;

/// Smallest memory cost, in KiB, accepted for the given number of passes.
///
/// Follows the OWASP Argon2id minimum profiles: 19 MiB x 2, 12 MiB x 3,
/// 9 MiB x 4 and 7 MiB x 5 or more. Extra passes only buy back memory down to
/// the last profile.
pub const fn min_memory_kib(iterations: u32) -> u32 {
    match iterations {
        0..=2 => 19 * 1024,
        3 => 12 * 1024,
        4 => 9 * 1024,
        _ => 7 * 1024,
    }
}

/// Errors raised while configuring the hasher or producing a hash.
#[derive(Debug, thiserror::Error)]
pub enum HasherError {
    #[error("key hash memory cost {memory_kib} KiB is below {min} KiB for {iterations} passes")]
    MemoryTooLow {
        memory_kib: u32,
        iterations: u32,
        min: u32,
    },

    #[error("key hash iterations {0} is below the minimum of {min}", min = MIN_ITERATIONS)]
    IterationsTooLow(u32),

    #[error("invalid key hash parameters: {0}")]
    InvalidParams(String),

    #[error("failed to hash API key: {0}")]
    Hash(String),

    #[error("hashing task failed: {0}")]
    Task(String),
}

/// Argon2id hasher with a fixed work factor.
#[derive(Debug, Clone)]
pub struct KeyHasher {
    params: Params,
}

impl KeyHasher {
    /// Build a hasher with the given memory cost (KiB) and iteration count.
    ///
    /// # Errors
    ///
    /// Rejects fewer than `MIN_ITERATIONS` passes, memory below
    /// [`min_memory_kib`] for the pass count, and anything the argon2 crate
    /// itself refuses.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, HasherError> {
        if iterations < MIN_ITERATIONS {
            return Err(HasherError::IterationsTooLow(iterations));
        }
        let min = min_memory_kib(iterations);
        if memory_kib < min {
            return Err(HasherError::MemoryTooLow {
                memory_kib,
                iterations,
                min,
            });
        }

        Self::with_params(memory_kib, iterations)
    }

    fn with_params(memory_kib: u32, iterations: u32) -> Result<Self, HasherError> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| HasherError::InvalidParams(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext key with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, HasherError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HasherError::Hash(e.to_string()))
    }

    /// Check a plaintext key against a stored hash.
    ///
    /// A stored value that does not parse as a PHC string is treated as a
    /// mismatch rather than an error.
    pub fn matches(&self, plaintext: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };

        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Run [`KeyHasher::hash`] on the blocking thread pool.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, HasherError> {
        let hasher = self.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| HasherError::Task(e.to_string()))?
    }

    /// Return the index of the first stored hash matching `plaintext`.
    ///
    /// Runs on the blocking thread pool; stops at the first match.
    pub async fn first_match_blocking(
        &self,
        plaintext: String,
        stored_hashes: Vec<String>,
    ) -> Result<Option<usize>, HasherError> {
        let hasher = self.clone();

        tokio::task::spawn_blocking(move || {
            stored_hashes
                .iter()
                .position(|stored| hasher.matches(&plaintext, stored))
        })
        .await
        .map_err(|e| HasherError::Task(e.to_string()))
    }
}

/// Cheap hasher for unit tests; skips the cost floor.
#[cfg(test)]
pub(crate) fn test_hasher() -> KeyHasher {
    KeyHasher::with_params(1024, 1).unwrap()
}
