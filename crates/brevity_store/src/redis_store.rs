//! Redis store backend.

use crate::KeyValueStore;
use brevity_error::{BrevityResult, StoreError, StoreErrorKind};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::{info, instrument};

/// [`KeyValueStore`] over a Redis connection manager.
///
/// The manager reconnects on its own; a failed command surfaces as
/// [`StoreErrorKind::Unavailable`] so callers can retry.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connects to the Redis server at `url`.
    #[instrument(skip(url))]
    pub async fn connect(url: &str) -> BrevityResult<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            StoreError::new(StoreErrorKind::Unavailable(format!(
                "Invalid Redis URL: {}",
                e
            )))
        })?;
        let connection = client
            .get_connection_manager()
            .await
            .map_err(store_error)?;
        info!("Connected to Redis");
        Ok(Self { connection })
    }
}

fn store_error(err: redis::RedisError) -> StoreError {
    let kind = if err.is_io_error() || err.is_connection_dropped() || err.is_timeout() {
        StoreErrorKind::Unavailable(err.to_string())
    } else {
        StoreErrorKind::Command(err.to_string())
    };
    StoreError::new(kind)
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> BrevityResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(store_error)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> BrevityResult<()> {
        let mut conn = self.connection.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> BrevityResult<()> {
        let mut conn = self.connection.clone();
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> BrevityResult<()> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn keys_matching(&self, prefix: &str, suffix: &str) -> BrevityResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let pattern = scan_pattern(prefix, suffix);
        let mut iter: redis::AsyncIter<String> = conn
            .scan_match(pattern)
            .await
            .map_err(store_error)?;
        let mut keys = Vec::new();
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }
}

fn scan_pattern(prefix: &str, suffix: &str) -> String {
    format!("{}*{}", escape_glob(prefix), escape_glob(suffix))
}

fn escape_glob(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
