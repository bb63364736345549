//! Metrics collection for scheduler activity.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters shared between the scheduler and whoever reports on it.
#[derive(Debug, Clone)]
pub struct BotMetrics {
    inner: Arc<BotMetricsInner>,
}

#[derive(Debug)]
struct BotMetricsInner {
    ticks: AtomicU64,
    scheduled_posts: AtomicU64,
    manual_posts: AtomicU64,
    post_failures: AtomicU64,
    last_tick_millis: AtomicU64,
    last_post_success: parking_lot::Mutex<Option<Instant>>,
}

impl Default for BotMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl BotMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BotMetricsInner {
                ticks: AtomicU64::new(0),
                scheduled_posts: AtomicU64::new(0),
                manual_posts: AtomicU64::new(0),
                post_failures: AtomicU64::new(0),
                last_tick_millis: AtomicU64::new(0),
                last_post_success: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Records a completed scan and how long it took.
    pub fn record_tick(&self, elapsed: Duration) {
        self.inner.ticks.fetch_add(1, Ordering::Relaxed);
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.inner.last_tick_millis.store(millis, Ordering::Relaxed);
    }

    /// Records a scheduled post that reached its channel.
    pub fn record_post_success(&self) {
        self.inner.scheduled_posts.fetch_add(1, Ordering::Relaxed);
        *self.inner.last_post_success.lock() = Some(Instant::now());
    }

    /// Records a scheduled post that failed or timed out.
    pub fn record_post_failure(&self) {
        self.inner.post_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a `/nextterm` post.
    pub fn record_manual_post(&self) {
        self.inner.manual_posts.fetch_add(1, Ordering::Relaxed);
    }

    /// Completed scans.
    pub fn ticks(&self) -> u64 {
        self.inner.ticks.load(Ordering::Relaxed)
    }

    /// Scheduled posts delivered.
    pub fn scheduled_posts(&self) -> u64 {
        self.inner.scheduled_posts.load(Ordering::Relaxed)
    }

    /// Manual posts served.
    pub fn manual_posts(&self) -> u64 {
        self.inner.manual_posts.load(Ordering::Relaxed)
    }

    /// Scheduled posts that failed.
    pub fn post_failures(&self) -> u64 {
        self.inner.post_failures.load(Ordering::Relaxed)
    }

    /// Gets time since the last delivered scheduled post.
    pub fn time_since_post(&self) -> Option<Duration> {
        self.inner
            .last_post_success
            .lock()
            .map(|instant| instant.elapsed())
    }

    /// Share of scheduled posts that were delivered (0.0 - 1.0).
    pub fn post_success_rate(&self) -> f64 {
        let successes = self.scheduled_posts();
        let attempts = successes + self.post_failures();
        if attempts == 0 {
            return 1.0;
        }
        successes as f64 / attempts as f64
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks(),
            scheduled_posts: self.scheduled_posts(),
            manual_posts: self.manual_posts(),
            post_failures: self.post_failures(),
            last_tick_millis: self.inner.last_tick_millis.load(Ordering::Relaxed),
            seconds_since_post: self.time_since_post().map(|d| d.as_secs()),
            post_success_rate: self.post_success_rate(),
        }
    }
}

/// Serializable snapshot of scheduler metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Completed scans
    pub ticks: u64,
    /// Scheduled posts delivered
    pub scheduled_posts: u64,
    /// Manual posts served
    pub manual_posts: u64,
    /// Scheduled posts that failed
    pub post_failures: u64,
    /// Duration of the most recent scan
    pub last_tick_millis: u64,
    /// Seconds since the last delivered scheduled post
    pub seconds_since_post: Option<u64>,
    /// Share of scheduled posts delivered
    pub post_success_rate: f64,
}
