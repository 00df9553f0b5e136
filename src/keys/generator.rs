//! Plaintext API key generation.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};

use super::{KeyError, PREFIX_LEN};

/// Number of random bytes behind every key (256 bits of entropy).
pub const KEY_BYTES: usize = 32;

/// Generate a new plaintext API key.
///
/// The key is 32 bytes from the operating system's CSPRNG, encoded as URL-safe
/// base64 without padding, which yields 43 characters.
///
/// # Errors
///
/// Returns `KeyError::Entropy` if the OS random source cannot be read.
pub fn generate_plaintext() -> Result<String, KeyError> {
    let mut bytes = [0u8; KEY_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| KeyError::Entropy(e.to_string()))?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Lookup prefix of a plaintext key.
///
/// Returns `None` when the input is too short to carry a prefix, or when the
/// prefix holds characters the generator never emits.
pub fn prefix_of(plaintext: &str) -> Option<&str> {
    let prefix = plaintext.get(..PREFIX_LEN)?;

    prefix
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        .then_some(prefix)
}
