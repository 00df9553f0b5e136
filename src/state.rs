//! Shared application state handed to every handler.

use axum::extract::FromRef;
use sha2::{Digest, Sha256};

use crate::{db::DbPool, keys::KeyManager};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub keys: KeyManager,
    /// SHA-256 of the admin token; the token itself is not kept
    pub admin_token_digest: [u8; 32],
}

impl AppState {
    pub fn new(pool: DbPool, keys: KeyManager, admin_token: &str) -> Self {
        Self {
            pool,
            keys,
            admin_token_digest: token_digest(admin_token),
        }
    }
}

pub fn token_digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for KeyManager {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}
