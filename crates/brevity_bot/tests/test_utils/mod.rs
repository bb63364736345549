//! Test utilities for brevity_bot tests.
//!
//! Fakes for the chat channel and helpers that wire the bot over a
//! [`MemoryStore`].

#![allow(dead_code)]

use async_trait::async_trait;
use brevity_bot::{BotConfig, BotService, RotationTracker, Scheduler, TermPoster};
use brevity_core::{ChannelId, Term, TermId};
use brevity_error::{BrevityResult, DeliveryError, StoreError, StoreErrorKind};
use brevity_store::{GuildRepository, Keys, KeyValueStore, MemoryStore};
use brevity_terms::{StaticSource, TermCache};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Poster that records every delivery instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingPoster {
    posts: Mutex<Vec<(ChannelId, TermId)>>,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    attempts: AtomicUsize,
}

impl RecordingPoster {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn posts(&self) -> Vec<(ChannelId, TermId)> {
        self.posts.lock().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TermPoster for RecordingPoster {
    async fn post_term(&self, channel: ChannelId, term: &Term) -> BrevityResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::new(format!("channel {} unreachable", channel)).into());
        }
        self.posts.lock().push((channel, term.id().clone()));
        Ok(())
    }
}

/// Store over a [`MemoryStore`] that can fail writes and slow down reads.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing_suffix: Mutex<Option<(String, usize)>>,
    yield_on_get: AtomicBool,
    failed_writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The next `count` writes to keys ending in `suffix` fail as unavailable.
    pub fn fail_writes(&self, suffix: &str, count: usize) {
        *self.failing_suffix.lock() = Some((suffix.to_string(), count));
    }

    /// Reads give up the task once after reading, before answering.
    pub fn set_yield_on_get(&self, enabled: bool) {
        self.yield_on_get.store(enabled, Ordering::SeqCst);
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes.load(Ordering::SeqCst)
    }

    fn should_fail(&self, key: &str) -> bool {
        let mut failing = self.failing_suffix.lock();
        match failing.as_mut() {
            Some((suffix, remaining)) if *remaining > 0 && key.ends_with(suffix.as_str()) => {
                *remaining -= 1;
                self.failed_writes.fetch_add(1, Ordering::SeqCst);
                true
            }
            _ => false,
        }
    }

    fn unavailable(key: &str) -> brevity_error::BrevityError {
        StoreError::new(StoreErrorKind::Unavailable(format!("write to {} dropped", key))).into()
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> BrevityResult<Option<String>> {
        let value = self.inner.get(key).await?;
        if self.yield_on_get.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> BrevityResult<()> {
        if self.should_fail(key) {
            return Err(Self::unavailable(key));
        }
        self.inner.set(key, value).await
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> BrevityResult<()> {
        if self.should_fail(key) {
            return Err(Self::unavailable(key));
        }
        self.inner.set_with_expiry(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> BrevityResult<()> {
        self.inner.delete(key).await
    }

    async fn keys_matching(&self, prefix: &str, suffix: &str) -> BrevityResult<Vec<String>> {
        self.inner.keys_matching(prefix, suffix).await
    }
}

/// Bogey, Winchester and Joker.
pub fn sample_terms() -> Vec<Term> {
    vec![
        Term::new("Bogey", "A radar or visual air contact whose identity is unknown."),
        Term::new("Winchester", "No ordnance remaining."),
        Term::new("Joker", "Fuel state above bingo at which separation, bugout, or event termination should begin."),
    ]
}

/// A larger pool for quiz tests.
pub fn quiz_terms() -> Vec<Term> {
    vec![
        Term::new("Aborting/Abort/Aborted", "Directive to cease an action or attack. Aborted events may be resumed."),
        Term::new("Bandit", "An identified enemy aircraft. Bandits are hostile by definition."),
        Term::new("Bingo", "Fuel state needed for recovery."),
        Term::new("Bogey", "A radar or visual air contact whose identity is unknown. Bogeys may become bandits."),
        Term::new("Bugout", "Separation from that particular engagement, attack, or operation."),
        Term::new("Cleared hot", "Ordnance release is authorized."),
        Term::new("Joker", "Fuel state above bingo."),
        Term::new("Winchester", "No ordnance remaining."),
    ]
}

/// Everything a scheduler test needs, over a memory store.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub repo: GuildRepository,
    pub cache: Arc<TermCache>,
    pub source: Arc<StaticSource>,
    pub poster: Arc<RecordingPoster>,
    pub scheduler: Arc<Scheduler>,
    pub config: BotConfig,
}

impl Fixture {
    pub fn new(terms: Vec<Term>) -> Self {
        Self::with_config(terms, fast_config())
    }

    pub fn with_config(terms: Vec<Term>, config: BotConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn KeyValueStore> = store.clone();
        Self::over_store(terms, config, store, shared)
    }

    /// Wires the bot over `flaky`. `store` then stays empty.
    pub fn with_flaky_store(terms: Vec<Term>, flaky: Arc<FlakyStore>) -> Self {
        let shared: Arc<dyn KeyValueStore> = flaky;
        Self::over_store(terms, fast_config(), Arc::new(MemoryStore::new()), shared)
    }

    fn over_store(
        terms: Vec<Term>,
        config: BotConfig,
        store: Arc<MemoryStore>,
        shared: Arc<dyn KeyValueStore>,
    ) -> Self {
        let keys = Keys::new(config.key_prefix.clone());
        let repo = GuildRepository::new(Arc::clone(&shared), keys.clone())
            .with_default_frequency(config.default_frequency_hours)
            .with_results_retained(config.results_retained);

        let source = Arc::new(StaticSource::new(terms.clone()));
        let cache = Arc::new(TermCache::new(
            shared,
            &keys,
            source.clone(),
            config.term_refresh_interval(),
        ));
        cache.replace(terms);

        let poster = RecordingPoster::new();
        let rotation = RotationTracker::new(repo.clone(), Arc::clone(&cache));
        let scheduler = Arc::new(Scheduler::new(
            repo.clone(),
            rotation,
            poster.clone(),
            &config,
        ));

        Self {
            store,
            repo,
            cache,
            source,
            poster,
            scheduler,
            config,
        }
    }

    pub fn service(&self) -> BotService {
        BotService::new(
            self.repo.clone(),
            Arc::clone(&self.cache),
            Arc::clone(&self.scheduler),
            self.config.quiz.clone(),
        )
    }
}

/// Settings with short timeouts and retries suited to tests.
pub fn fast_config() -> BotConfig {
    let mut config = BotConfig::default();
    config.post_timeout_secs = 1;
    config.store_retry.initial_delay_ms = 1;
    config.store_retry.max_delay_secs = 1;
    config.store_retry.attempts = 1;
    config
}
