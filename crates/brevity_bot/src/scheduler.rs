//! Periodic per-guild posting.

use crate::{BotConfig, BotMetrics, RetryConfig, RotationTracker, with_retry};
use async_trait::async_trait;
use brevity_core::{ChannelId, GuildConfig, GuildId, ScheduleState, Term};
use brevity_error::{BrevityResult, DeliveryError};
use brevity_store::GuildRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Delivers a term to a chat channel.
#[async_trait]
pub trait TermPoster: Send + Sync {
    /// Posts `term` as the scheduled term of the day in `channel`.
    async fn post_term(&self, channel: ChannelId, term: &Term) -> BrevityResult<()>;
}

/// What one scan did with each known guild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Guilds that received a term
    pub posted: Vec<GuildId>,
    /// Guilds whose frequency has not elapsed
    pub idle: Vec<GuildId>,
    /// Guilds with posting disabled or no configuration
    pub skipped: Vec<GuildId>,
    /// Guilds that were due but could not be served; they stay due
    pub failed: Vec<GuildId>,
}

impl TickReport {
    /// Guilds looked at in total.
    pub fn total(&self) -> usize {
        self.posted.len() + self.idle.len() + self.skipped.len() + self.failed.len()
    }
}

enum GuildOutcome {
    Posted,
    Idle,
    Skipped,
}

/// Drives scheduled posting for every configured guild.
pub struct Scheduler {
    repo: GuildRepository,
    rotation: RotationTracker,
    poster: Arc<dyn TermPoster>,
    metrics: BotMetrics,
    post_timeout: Duration,
    retry: RetryConfig,
}

impl Scheduler {
    /// Creates a scheduler posting through `poster`.
    pub fn new(
        repo: GuildRepository,
        rotation: RotationTracker,
        poster: Arc<dyn TermPoster>,
        config: &BotConfig,
    ) -> Self {
        Self {
            repo,
            rotation: rotation.with_store_retry(config.store_retry.clone()),
            poster,
            metrics: BotMetrics::new(),
            post_timeout: config.post_timeout(),
            retry: config.store_retry.clone(),
        }
    }

    /// Shared scheduler metrics.
    pub fn metrics(&self) -> &BotMetrics {
        &self.metrics
    }

    /// Rotation used for both scheduled and manual posts.
    pub fn rotation(&self) -> &RotationTracker {
        &self.rotation
    }

    /// Scans every known guild once and posts to those that are due.
    ///
    /// Failures are logged per guild and never abort the scan. A guild is
    /// only stamped after its post went through, so a failed guild is
    /// retried on the next scan.
    #[instrument(skip(self))]
    pub async fn tick(&self, now: DateTime<Utc>) -> TickReport {
        let started = Instant::now();
        let mut report = TickReport::default();

        let guilds = match with_retry(&self.retry, || self.repo.known_guilds()).await {
            Ok(guilds) => guilds,
            Err(e) => {
                error!(error = %e, "Could not list guilds, skipping scan");
                self.metrics.record_tick(started.elapsed());
                return report;
            }
        };

        for guild in guilds {
            match self.check_guild(guild, now).await {
                Ok(GuildOutcome::Posted) => report.posted.push(guild),
                Ok(GuildOutcome::Idle) => report.idle.push(guild),
                Ok(GuildOutcome::Skipped) => report.skipped.push(guild),
                Err(e) => {
                    warn!(guild_id = %guild, error = %e, "Scheduled post failed, will retry next scan");
                    report.failed.push(guild);
                }
            }
        }

        self.metrics.record_tick(started.elapsed());
        info!(
            posted = report.posted.len(),
            idle = report.idle.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            metrics = ?self.metrics.snapshot(),
            "Scheduler scan complete"
        );
        report
    }

    async fn check_guild(&self, guild: GuildId, now: DateTime<Utc>) -> BrevityResult<GuildOutcome> {
        let Some(config) = with_retry(&self.retry, || self.repo.guild_config(guild)).await? else {
            debug!(guild_id = %guild, "Guild has no configuration");
            return Ok(GuildOutcome::Skipped);
        };

        match config.schedule_state(now) {
            ScheduleState::Disabled => {
                warn!(guild_id = %guild, "Posting disabled, skipping guild");
                Ok(GuildOutcome::Skipped)
            }
            ScheduleState::Idle => {
                debug!(guild_id = %guild, next_due = ?config.next_due(), "Guild not due");
                Ok(GuildOutcome::Idle)
            }
            ScheduleState::Due => {
                self.emit(&config, now).await?;
                Ok(GuildOutcome::Posted)
            }
        }
    }

    #[instrument(skip(self, config), fields(guild_id = %config.guild_id(), channel_id = %config.channel_id()))]
    async fn emit(&self, config: &GuildConfig, now: DateTime<Utc>) -> BrevityResult<Term> {
        let guild = *config.guild_id();
        let channel = *config.channel_id();
        let term = self.rotation.next_term(guild).await?;

        match tokio::time::timeout(self.post_timeout, self.poster.post_term(channel, &term)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.metrics.record_post_failure();
                return Err(e);
            }
            Err(_) => {
                self.metrics.record_post_failure();
                return Err(DeliveryError::new(format!(
                    "Timed out after {}s posting to channel {}",
                    self.post_timeout.as_secs(),
                    channel
                ))
                .into());
            }
        }

        // The term is already out, so a lost stamp would repeat it next scan.
        with_retry(&self.retry, || self.repo.set_last_posted(guild, now)).await?;
        self.metrics.record_post_success();
        info!(term = %term.name(), "Posted scheduled term");
        Ok(term)
    }

    /// Picks the guild's next term for an immediate reply.
    ///
    /// Runs regardless of the enabled flag or the due time. The guild's
    /// `last_posted` is stamped when it is configured, so the scheduled cycle
    /// restarts from this post.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn post_now(&self, guild: GuildId, now: DateTime<Utc>) -> BrevityResult<Term> {
        let term = self.rotation.next_term(guild).await?;
        if self.repo.guild_config(guild).await?.is_some() {
            with_retry(&self.retry, || self.repo.set_last_posted(guild, now)).await?;
        }
        self.metrics.record_manual_post();
        info!(term = %term.name(), "Served manual term");
        Ok(term)
    }
}
