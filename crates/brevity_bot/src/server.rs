//! Background loop driving scheduled posts and term refreshes.

use crate::{BotConfig, Scheduler};
use brevity_terms::TermCache;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tracing::{error, info, instrument, warn};

/// Control messages for the background loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessage {
    /// Run a scheduler scan now
    Tick,
    /// Refresh the term list now
    RefreshTerms,
    /// Stop the loop
    Shutdown,
}

/// Runs scheduler scans and term refreshes on one task.
///
/// Every branch is awaited to completion before the loop polls again, so
/// scans never overlap and a refresh never runs during a scan. Timers are
/// polled ahead of control messages.
pub struct BotServer {
    scheduler: Arc<Scheduler>,
    cache: Arc<TermCache>,
    tick_interval: Duration,
    refresh_interval: Duration,
}

impl BotServer {
    /// Creates a server with the configured intervals.
    pub fn new(scheduler: Arc<Scheduler>, cache: Arc<TermCache>, config: &BotConfig) -> Self {
        Self {
            scheduler,
            cache,
            tick_interval: config.tick_interval(),
            refresh_interval: config.term_refresh_interval(),
        }
    }

    /// Spawns the loop onto the runtime.
    pub fn spawn(self) -> ServerHandle {
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(self.run(rx));
        ServerHandle { tx, task }
    }

    /// Runs until a `Shutdown` message arrives or every sender is dropped.
    ///
    /// The first scan starts immediately; the first refresh waits one full
    /// refresh interval since the cache was just warmed at startup.
    #[instrument(skip_all, fields(tick_secs = self.tick_interval.as_secs()))]
    pub async fn run(self, mut rx: mpsc::Receiver<ServerMessage>) {
        info!("Bot server started");

        let mut ticks = interval(self.tick_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut refreshes = interval_at(Instant::now() + self.refresh_interval, self.refresh_interval);
        refreshes.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = ticks.tick() => self.scan().await,
                _ = refreshes.tick() => self.refresh().await,
                message = rx.recv() => match message {
                    Some(ServerMessage::Tick) => self.scan().await,
                    Some(ServerMessage::RefreshTerms) => self.refresh().await,
                    Some(ServerMessage::Shutdown) | None => {
                        info!("Bot server shutting down");
                        break;
                    }
                },
            }
        }
    }

    async fn scan(&self) {
        self.scheduler.tick(Utc::now()).await;
    }

    async fn refresh(&self) {
        match self.cache.refresh().await {
            Ok(count) => info!(count, "Scheduled term refresh complete"),
            Err(e) => warn!(error = %e, kept = self.cache.len(), "Scheduled term refresh failed"),
        }
    }
}

/// Handle to a spawned [`BotServer`].
pub struct ServerHandle {
    tx: mpsc::Sender<ServerMessage>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Sender for control messages.
    pub fn sender(&self) -> mpsc::Sender<ServerMessage> {
        self.tx.clone()
    }

    /// Queues a message. Returns `false` when the loop has already stopped.
    pub async fn send(&self, message: ServerMessage) -> bool {
        self.tx.send(message).await.is_ok()
    }

    /// Stops the loop and waits for the current scan to finish.
    pub async fn shutdown(self) {
        if self.tx.send(ServerMessage::Shutdown).await.is_err() {
            warn!("Bot server already stopped");
        }
        if let Err(e) = self.task.await {
            error!(error = %e, "Bot server task failed");
        }
    }
}
