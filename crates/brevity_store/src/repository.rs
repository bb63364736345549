//! Typed, guild-scoped access to the key-value store.

use crate::{KeyValueStore, Keys};
use brevity_core::{ChannelId, GuildConfig, GuildId, QuizResult, TermId, UserId};
use brevity_error::{BrevityResult, StoreError, StoreErrorKind};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Quiz results kept per member before the oldest are dropped.
pub const DEFAULT_RESULTS_RETAINED: usize = 50;

/// Frequency used when a guild has never set one.
const DEFAULT_FREQUENCY_HOURS: u32 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct ConfigBlob {
    channel_id: ChannelId,
}

/// Repository for per-guild state.
///
/// This is the only code that knows how guild state is laid out in the
/// store. Each field lives under its own key so that configuration commands
/// and the scheduler never overwrite each other's writes.
#[derive(Clone)]
pub struct GuildRepository {
    store: Arc<dyn KeyValueStore>,
    keys: Keys,
    default_frequency_hours: u32,
    results_retained: usize,
}

impl GuildRepository {
    /// Creates a repository over `store` using `keys`.
    pub fn new(store: Arc<dyn KeyValueStore>, keys: Keys) -> Self {
        Self {
            store,
            keys,
            default_frequency_hours: DEFAULT_FREQUENCY_HOURS,
            results_retained: DEFAULT_RESULTS_RETAINED,
        }
    }

    /// Sets the frequency reported for guilds that never chose one.
    pub fn with_default_frequency(mut self, hours: u32) -> Self {
        self.default_frequency_hours = hours.max(1);
        self
    }

    /// Sets how many quiz results are kept per member.
    pub fn with_results_retained(mut self, count: usize) -> Self {
        self.results_retained = count.max(1);
        self
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Key layout.
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Frequency applied to guilds without an explicit one.
    pub fn default_frequency_hours(&self) -> u32 {
        self.default_frequency_hours
    }

    /// Full configuration for a guild, `None` until `/setup` has run.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn guild_config(&self, guild: GuildId) -> BrevityResult<Option<GuildConfig>> {
        let Some(blob) = self
            .get_json::<ConfigBlob>(&self.keys.guild_config(guild))
            .await?
        else {
            return Ok(None);
        };
        let enabled = self.posting_enabled(guild).await?.unwrap_or(true);
        let frequency = self
            .frequency_hours(guild)
            .await?
            .unwrap_or(self.default_frequency_hours);
        let last_posted = self.last_posted(guild).await?;
        Ok(Some(GuildConfig::new(
            guild,
            blob.channel_id,
            enabled,
            frequency,
            last_posted,
        )))
    }

    /// Points the guild's scheduled posts at `channel`.
    #[instrument(skip(self), fields(guild_id = %guild, channel_id = %channel))]
    pub async fn save_channel(&self, guild: GuildId, channel: ChannelId) -> BrevityResult<()> {
        self.set_json(
            &self.keys.guild_config(guild),
            &ConfigBlob {
                channel_id: channel,
            },
        )
        .await
    }

    /// Stored enabled flag.
    pub async fn posting_enabled(&self, guild: GuildId) -> BrevityResult<Option<bool>> {
        self.get_parsed(&self.keys.posting_enabled(guild)).await
    }

    /// Switches scheduled posting on or off.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_posting_enabled(&self, guild: GuildId, enabled: bool) -> BrevityResult<()> {
        self.store
            .set(&self.keys.posting_enabled(guild), &enabled.to_string())
            .await
    }

    /// Stored frequency in hours.
    pub async fn frequency_hours(&self, guild: GuildId) -> BrevityResult<Option<u32>> {
        self.get_parsed(&self.keys.frequency_hours(guild)).await
    }

    /// Changes the hours between scheduled posts.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_frequency_hours(&self, guild: GuildId, hours: u32) -> BrevityResult<()> {
        self.store
            .set(&self.keys.frequency_hours(guild), &hours.max(1).to_string())
            .await
    }

    /// Time of the last post, if any.
    pub async fn last_posted(&self, guild: GuildId) -> BrevityResult<Option<DateTime<Utc>>> {
        let key = self.keys.last_posted(guild);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| malformed(&key, e))
    }

    /// Records that the guild was just posted to.
    #[instrument(skip(self), fields(guild_id = %guild))]
    pub async fn set_last_posted(&self, guild: GuildId, at: DateTime<Utc>) -> BrevityResult<()> {
        self.store
            .set(&self.keys.last_posted(guild), &at.to_rfc3339())
            .await
    }

    /// Identifiers posted so far in the current rotation.
    pub async fn used_terms(&self, guild: GuildId) -> BrevityResult<HashSet<TermId>> {
        Ok(self
            .get_json::<Vec<TermId>>(&self.keys.used_terms(guild))
            .await?
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default())
    }

    /// Replaces the rotation set.
    #[instrument(skip(self, used), fields(guild_id = %guild, used = used.len()))]
    pub async fn save_used_terms(
        &self,
        guild: GuildId,
        used: &HashSet<TermId>,
    ) -> BrevityResult<()> {
        let mut ids: Vec<&TermId> = used.iter().collect();
        ids.sort();
        self.set_json(&self.keys.used_terms(guild), &ids).await
    }

    /// Every guild that has run `/setup`, in ascending id order.
    #[instrument(skip(self))]
    pub async fn known_guilds(&self) -> BrevityResult<Vec<GuildId>> {
        let keys = self
            .store
            .keys_matching(&self.keys.guild_prefix(), self.keys.config_suffix())
            .await?;
        let mut guilds: Vec<GuildId> = keys
            .iter()
            .filter_map(|k| self.keys.parse_config_key(k))
            .collect();
        guilds.sort();
        guilds.dedup();
        debug!(count = guilds.len(), "Discovered configured guilds");
        Ok(guilds)
    }

    /// Recorded quiz results for a member, oldest first.
    pub async fn quiz_results(&self, guild: GuildId, user: UserId) -> BrevityResult<Vec<QuizResult>> {
        Ok(self
            .get_json(&self.keys.quiz_results(guild, user))
            .await?
            .unwrap_or_default())
    }

    /// Appends a result, dropping the oldest beyond the retention limit.
    #[instrument(skip(self, result), fields(guild_id = %result.guild_id(), user_id = %result.user_id()))]
    pub async fn record_quiz_result(&self, result: &QuizResult) -> BrevityResult<()> {
        let key = self.keys.quiz_results(*result.guild_id(), *result.user_id());
        let mut results: Vec<QuizResult> = self.get_json(&key).await?.unwrap_or_default();
        results.push(result.clone());
        let excess = results.len().saturating_sub(self.results_retained);
        results.drain(..excess);
        self.set_json(&key, &results).await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> BrevityResult<Option<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| malformed(key, e))
    }

    async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> BrevityResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| malformed(key, e))?;
        self.store.set(key, &raw).await
    }

    async fn get_parsed<T: std::str::FromStr>(&self, key: &str) -> BrevityResult<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| malformed(key, e))
    }
}

#[track_caller]
fn malformed(key: &str, reason: impl std::fmt::Display) -> brevity_error::BrevityError {
    StoreError::new(StoreErrorKind::Serialization {
        key: key.to_string(),
        reason: reason.to_string(),
    })
    .into()
}
