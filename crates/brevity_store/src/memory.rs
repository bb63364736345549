//! Process-local store backend.

use crate::KeyValueStore;
use brevity_error::BrevityResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// In-memory [`KeyValueStore`] for development and tests.
///
/// Expired entries are dropped lazily on access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Whether the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, key: &str, value: &str, expires_at: Option<Instant>) {
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> BrevityResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> BrevityResult<()> {
        self.insert(key, value, None);
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> BrevityResult<()> {
        self.insert(key, value, Some(Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> BrevityResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn keys_matching(&self, prefix: &str, suffix: &str) -> BrevityResult<Vec<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, e| !e.is_expired(now));
        Ok(entries
            .keys()
            .filter(|k| {
                k.len() >= prefix.len() + suffix.len()
                    && k.starts_with(prefix)
                    && k.ends_with(suffix)
            })
            .cloned()
            .collect())
    }
}
