//! PostgreSQL-backed [`KeyStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::store::{ApiKey, KeyStore, NewApiKey, StoreError};
use crate::db::DbPool;

const API_KEY_COLUMNS: &str = "id, key_prefix, key_hash, owner_name, description, \
     created_at, expires_at, last_used_at, is_active";

/// Key store over the `api_keys` table.
///
/// Each method is a single SQL statement; PostgreSQL row locking gives the
/// per-record atomicity concurrent revocations and usage updates need.
#[derive(Debug, Clone)]
pub struct PgKeyStore {
    pool: DbPool,
}

impl PgKeyStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyStore for PgKeyStore {
    async fn insert(&self, key: NewApiKey) -> Result<ApiKey, StoreError> {
        let stored = sqlx::query_as::<_, ApiKey>(&format!(
            r#"
            INSERT INTO api_keys (key_prefix, key_hash, owner_name, description, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {API_KEY_COLUMNS}
            "#
        ))
        .bind(&key.key_prefix)
        .bind(&key.key_hash)
        .bind(&key.owner_name)
        .bind(&key.description)
        .bind(key.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn find_active_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, StoreError> {
        // Served by the (key_prefix, is_active) index
        let keys = sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE key_prefix = $1 AND is_active = true"
        ))
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, StoreError> {
        let keys = sqlx::query_as::<_, ApiKey>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE key_prefix = $1"
        ))
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    async fn touch_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query("UPDATE api_keys SET last_used_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn revoke(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE api_keys SET is_active = false WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_owner(&self, owner_name: &str) -> Result<Vec<ApiKey>, StoreError> {
        let keys = sqlx::query_as::<_, ApiKey>(&format!(
            r#"
            SELECT {API_KEY_COLUMNS}
            FROM api_keys
            WHERE owner_name = $1 AND is_active = true
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_name)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }
}
