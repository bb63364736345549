//! Command logic behind the slash commands, independent of the chat platform.

use crate::{QuizConfig, QuizSession, QuizSettings, Scheduler};
use brevity_core::{ChannelId, GreenieBoard, GuildConfig, GuildId, QuizResult, Term, UserId};
use brevity_error::{BrevityResult, InputError, InputErrorKind, TermsError, TermsErrorKind};
use brevity_store::GuildRepository;
use brevity_terms::TermCache;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

/// Operations behind each slash command.
#[derive(Clone)]
pub struct BotService {
    repo: GuildRepository,
    cache: Arc<TermCache>,
    scheduler: Arc<Scheduler>,
    quiz: QuizConfig,
}

impl BotService {
    /// Creates the service.
    pub fn new(
        repo: GuildRepository,
        cache: Arc<TermCache>,
        scheduler: Arc<Scheduler>,
        quiz: QuizConfig,
    ) -> Self {
        Self {
            repo,
            cache,
            scheduler,
            quiz,
        }
    }

    /// Guild state access.
    pub fn repo(&self) -> &GuildRepository {
        &self.repo
    }

    /// Shared term cache.
    pub fn cache(&self) -> &Arc<TermCache> {
        &self.cache
    }

    /// Scheduler shared with the background loop.
    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    /// Quiz limits.
    pub fn quiz_config(&self) -> &QuizConfig {
        &self.quiz
    }

    /// `/setup`: directs scheduled posts to `channel`.
    ///
    /// A guild set up for the first time starts enabled with the default
    /// frequency; running it again only moves the channel.
    #[instrument(skip(self), fields(guild_id = %guild, channel_id = %channel))]
    pub async fn setup(&self, guild: GuildId, channel: ChannelId) -> BrevityResult<GuildConfig> {
        self.repo.save_channel(guild, channel).await?;
        if self.repo.posting_enabled(guild).await?.is_none() {
            self.repo.set_posting_enabled(guild, true).await?;
        }
        if self.repo.frequency_hours(guild).await?.is_none() {
            self.repo
                .set_frequency_hours(guild, self.repo.default_frequency_hours())
                .await?;
        }
        info!("Guild set up");
        self.require_config(guild).await
    }

    /// `/nextterm`: the guild's next term, outside the schedule.
    pub async fn next_term(&self, guild: GuildId, now: DateTime<Utc>) -> BrevityResult<Term> {
        self.scheduler.post_now(guild, now).await
    }

    /// `/define`: looks a term up by id or name.
    pub fn define(&self, query: &str) -> BrevityResult<Term> {
        if self.cache.is_empty() {
            return Err(TermsError::new(TermsErrorKind::NoTermsAvailable).into());
        }
        self.cache.find(query).ok_or_else(|| {
            TermsError::new(TermsErrorKind::NotFound(query.trim().to_string())).into()
        })
    }

    /// `/reloadterms`: scrapes the source again. Returns the new term count.
    pub async fn reload_terms(&self) -> BrevityResult<usize> {
        self.cache.refresh().await
    }

    /// `/setfrequency`: hours between scheduled posts, at least one.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_frequency(&self, guild: GuildId, hours: i64) -> BrevityResult<GuildConfig> {
        let hours = u32::try_from(hours)
            .ok()
            .filter(|h| *h >= 1)
            .ok_or_else(|| {
                InputError::new(InputErrorKind::OutOfRange {
                    field: "hours".to_string(),
                    reason: "a whole number of at least 1".to_string(),
                })
            })?;
        self.require_config(guild).await?;
        self.repo.set_frequency_hours(guild, hours).await?;
        info!(hours, "Posting frequency changed");
        self.require_config(guild).await
    }

    /// `/enableposting` and `/disableposting`.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_posting(&self, guild: GuildId, enabled: bool) -> BrevityResult<GuildConfig> {
        self.require_config(guild).await?;
        self.repo.set_posting_enabled(guild, enabled).await?;
        info!(enabled, "Posting toggled");
        self.require_config(guild).await
    }

    /// Schedule state for `/checkperms`, `None` before `/setup`.
    pub async fn status(&self, guild: GuildId) -> BrevityResult<Option<GuildConfig>> {
        self.repo.guild_config(guild).await
    }

    /// Validates `/quiz` options against the configured limits.
    pub fn quiz_settings(
        &self,
        questions: Option<i64>,
        mode: Option<&str>,
        duration_secs: Option<i64>,
    ) -> BrevityResult<QuizSettings> {
        QuizSettings::from_request(questions, mode, duration_secs, &self.quiz)
    }

    /// `/quiz`: builds a session from the current term list.
    pub fn start_quiz(
        &self,
        guild: GuildId,
        user: UserId,
        settings: QuizSettings,
    ) -> BrevityResult<QuizSession> {
        let terms = self.cache.terms();
        let mut rng = rand::thread_rng();
        QuizSession::new(guild, user, settings, &terms, &mut rng)
    }

    /// Stores the outcome of a finished session.
    #[instrument(skip(self, session), fields(guild_id = %session.guild_id(), user_id = %session.user_id()))]
    pub async fn record_quiz(
        &self,
        session: &QuizSession,
        now: DateTime<Utc>,
    ) -> BrevityResult<QuizResult> {
        let result = session.finish(now);
        self.repo.record_quiz_result(&result).await?;
        info!(score = result.score(), total = result.total(), "Quiz recorded");
        Ok(result)
    }

    /// `/greenieboard`: the user's recent results in this guild.
    pub async fn greenie_board(&self, guild: GuildId, user: UserId) -> BrevityResult<GreenieBoard> {
        let results = self.repo.quiz_results(guild, user).await?;
        Ok(GreenieBoard::from_results(results))
    }

    async fn require_config(&self, guild: GuildId) -> BrevityResult<GuildConfig> {
        self.repo
            .guild_config(guild)
            .await?
            .ok_or_else(|| InputError::new(InputErrorKind::NotConfigured).into())
    }
}
