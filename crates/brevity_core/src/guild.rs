//! Per-guild posting configuration.

use crate::{ChannelId, GuildId};
use chrono::{DateTime, TimeDelta, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Where a guild sits in its posting cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ScheduleState {
    /// Posting is switched off
    Disabled,
    /// Enabled but the frequency has not elapsed
    Idle,
    /// Enabled and a post is owed
    Due,
}

/// Posting configuration for one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GuildConfig {
    guild_id: GuildId,
    channel_id: ChannelId,
    posting_enabled: bool,
    frequency_hours: u32,
    last_posted: Option<DateTime<Utc>>,
}

impl GuildConfig {
    /// Creates a configuration. `frequency_hours` of zero is raised to one.
    pub fn new(
        guild_id: GuildId,
        channel_id: ChannelId,
        posting_enabled: bool,
        frequency_hours: u32,
        last_posted: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            guild_id,
            channel_id,
            posting_enabled,
            frequency_hours: frequency_hours.max(1),
            last_posted,
        }
    }

    /// Time between scheduled posts.
    pub fn frequency(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.frequency_hours))
    }

    /// Classifies the guild at `now`.
    ///
    /// ```
    /// use brevity_core::{ChannelId, GuildConfig, GuildId, ScheduleState};
    /// use chrono::{TimeDelta, Utc};
    ///
    /// let now = Utc::now();
    /// let config = GuildConfig::new(GuildId(1), ChannelId(2), true, 24, Some(now - TimeDelta::hours(25)));
    /// assert_eq!(config.schedule_state(now), ScheduleState::Due);
    /// ```
    pub fn schedule_state(&self, now: DateTime<Utc>) -> ScheduleState {
        if !self.posting_enabled {
            return ScheduleState::Disabled;
        }
        match self.last_posted {
            None => ScheduleState::Due,
            Some(last) if now - last >= self.frequency() => ScheduleState::Due,
            Some(_) => ScheduleState::Idle,
        }
    }

    /// When the next scheduled post becomes due, if posting is enabled.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        if !self.posting_enabled {
            return None;
        }
        self.last_posted.map(|last| last + self.frequency())
    }
}
