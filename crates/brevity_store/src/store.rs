//! Store trait definition.

use crate::{MemoryStore, RedisStore};
use brevity_error::{BrevityResult, ConfigError};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// String-keyed dictionary with optional per-key expiry.
///
/// Implementations must be safe to share between the background scheduler
/// and interactive command handlers.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a value, `None` when absent or expired.
    async fn get(&self, key: &str) -> BrevityResult<Option<String>>;

    /// Store a value with no expiry.
    async fn set(&self, key: &str, value: &str) -> BrevityResult<()>;

    /// Store a value that disappears after `ttl`.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> BrevityResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> BrevityResult<()>;

    /// All live keys starting with `prefix` and ending with `suffix`, in no
    /// particular order.
    async fn keys_matching(&self, prefix: &str, suffix: &str) -> BrevityResult<Vec<String>>;

    /// All live keys starting with `prefix`, in no particular order.
    async fn keys_with_prefix(&self, prefix: &str) -> BrevityResult<Vec<String>> {
        self.keys_matching(prefix, "").await
    }
}

/// Opens the store named by a connection string.
///
/// `memory://` selects a process-local [`MemoryStore`]; `redis://` and
/// `rediss://` connect a [`RedisStore`].
pub async fn connect(url: &str) -> BrevityResult<Arc<dyn KeyValueStore>> {
    if url.starts_with("memory://") {
        info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    if url.starts_with("redis://") || url.starts_with("rediss://") {
        let store = RedisStore::connect(url).await?;
        return Ok(Arc::new(store));
    }
    Err(ConfigError::new(format!(
        "Unsupported store URL scheme in '{}': expected redis://, rediss:// or memory://",
        redact(url)
    )))?
}

fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
