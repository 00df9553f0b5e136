//! In-memory [`KeyStore`] for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::store::{ApiKey, KeyStore, NewApiKey, StoreError};

#[derive(Default)]
pub struct MemoryKeyStore {
    keys: Mutex<Vec<ApiKey>>,
    prefix_queries: AtomicUsize,
    fail_touches: AtomicBool,
    offline: AtomicBool,
}

impl MemoryKeyStore {
    /// Number of prefix lookups served so far.
    pub fn prefix_queries(&self) -> usize {
        self.prefix_queries.load(Ordering::SeqCst)
    }

    pub fn get(&self, id: Uuid) -> Option<ApiKey> {
        self.keys
            .lock()
            .unwrap()
            .iter()
            .find(|k| k.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.keys.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<ApiKey> {
        self.keys.lock().unwrap().clone()
    }

    /// Make every `touch_last_used` call fail.
    pub fn fail_touches(&self) {
        self.fail_touches.store(true, Ordering::SeqCst);
    }

    /// Make every operation fail as if the database were unreachable.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Yield until a background touch for `id` has landed.
    pub async fn wait_for_touch(&self, id: Uuid) {
        for _ in 0..100 {
            if self.get(id).is_some_and(|k| k.last_used_at.is_some()) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("last_used_at was never updated for {id}");
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn filter(&self, pred: impl Fn(&ApiKey) -> bool) -> Vec<ApiKey> {
        self.keys
            .lock()
            .unwrap()
            .iter()
            .filter(|k| pred(k))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn insert(&self, key: NewApiKey) -> Result<ApiKey, StoreError> {
        self.check_online()?;

        let mut keys = self.keys.lock().unwrap();
        if keys.iter().any(|k| k.key_hash == key.key_hash) {
            return Err(StoreError::Unavailable("duplicate key_hash".to_string()));
        }

        let stored = ApiKey {
            id: Uuid::new_v4(),
            key_prefix: key.key_prefix,
            key_hash: key.key_hash,
            owner_name: key.owner_name,
            description: key.description,
            created_at: Utc::now(),
            expires_at: key.expires_at,
            last_used_at: None,
            is_active: true,
        };
        keys.push(stored.clone());

        Ok(stored)
    }

    async fn find_active_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, StoreError> {
        self.check_online()?;
        self.prefix_queries.fetch_add(1, Ordering::SeqCst);

        Ok(self.filter(|k| k.key_prefix == prefix && k.is_active))
    }

    async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<ApiKey>, StoreError> {
        self.check_online()?;
        self.prefix_queries.fetch_add(1, Ordering::SeqCst);

        Ok(self.filter(|k| k.key_prefix == prefix))
    }

    async fn touch_last_used(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.check_online()?;
        if self.fail_touches.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("touch rejected".to_string()));
        }

        if let Some(key) = self.keys.lock().unwrap().iter_mut().find(|k| k.id == id) {
            key.last_used_at = Some(at);
        }
        Ok(())
    }

    async fn revoke(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check_online()?;

        match self.keys.lock().unwrap().iter_mut().find(|k| k.id == id) {
            Some(key) => {
                key.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_owner(&self, owner_name: &str) -> Result<Vec<ApiKey>, StoreError> {
        self.check_online()?;

        let mut keys = self.filter(|k| k.owner_name == owner_name && k.is_active);
        keys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(keys)
    }
}
