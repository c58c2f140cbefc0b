use std::{collections::HashMap, time::Duration as StdDuration};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

/// Failure of the store backend itself. The in-memory backend never produces
/// one; an external expiring cache surfaces connectivity problems here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Expiring key-value store backing session tokens. Backends may expire
/// entries lazily: the only requirement is that an expired entry reads back
/// exactly like an absent one.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts or overwrites `key`. The value becomes unreadable once `ttl`
    /// has elapsed from this call.
    async fn put(&self, key: &str, value: &str, ttl: StdDuration) -> Result<(), StoreError>;

    /// Returns the value only if present and not expired. Must not renew or
    /// otherwise touch the entry.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Removes the entry if present. Deleting an absent or already-expired
    /// key is a no-op, never an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Process-local expiring map. Reads check the deadline; writes sweep out
/// whatever has already lapsed, so there is no background eviction task.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn put(&self, key: &str, value: &str, ttl: StdDuration) -> Result<(), StoreError> {
        let now = Utc::now();
        let ttl = Duration::from_std(ttl)
            .map_err(|err| StoreError::Unavailable(format!("ttl out of range: {err}")))?;
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(Utc::now()))
            .map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
