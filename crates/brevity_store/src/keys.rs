//! Key layout.

use brevity_core::{GuildId, UserId};

const CONFIG_SUFFIX: &str = ":config";

/// Builds every key the bot reads or writes.
///
/// ```
/// use brevity_core::GuildId;
/// use brevity_store::Keys;
///
/// let keys = Keys::new("brevity");
/// assert_eq!(keys.guild_config(GuildId(42)), "brevity:guild:42:config");
/// assert_eq!(keys.parse_config_key("brevity:guild:42:config"), Some(GuildId(42)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    prefix: String,
}

impl Default for Keys {
    fn default() -> Self {
        Self::new("brevity")
    }
}

impl Keys {
    /// Creates a layout rooted at `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Global cached term list.
    pub fn terms(&self) -> String {
        format!("{}:terms", self.prefix)
    }

    /// Common prefix of all guild-scoped keys.
    pub fn guild_prefix(&self) -> String {
        format!("{}:guild:", self.prefix)
    }

    fn guild(&self, guild: GuildId, field: &str) -> String {
        format!("{}{}:{}", self.guild_prefix(), guild, field)
    }

    /// Suffix shared by every guild configuration key.
    pub fn config_suffix(&self) -> &'static str {
        CONFIG_SUFFIX
    }

    /// Configuration blob holding the target channel.
    pub fn guild_config(&self, guild: GuildId) -> String {
        format!("{}{}{}", self.guild_prefix(), guild, CONFIG_SUFFIX)
    }

    /// Identifiers already posted in the current rotation.
    pub fn used_terms(&self, guild: GuildId) -> String {
        self.guild(guild, "used_terms")
    }

    /// Posting enabled flag.
    pub fn posting_enabled(&self, guild: GuildId) -> String {
        self.guild(guild, "posting_enabled")
    }

    /// Hours between scheduled posts.
    pub fn frequency_hours(&self, guild: GuildId) -> String {
        self.guild(guild, "frequency_hours")
    }

    /// Timestamp of the last post.
    pub fn last_posted(&self, guild: GuildId) -> String {
        self.guild(guild, "last_posted")
    }

    /// Recorded quiz results for one member.
    pub fn quiz_results(&self, guild: GuildId, user: UserId) -> String {
        format!("{}:{}", self.guild(guild, "quiz"), user)
    }

    /// Extracts the guild from a configuration key, `None` for any other key.
    pub fn parse_config_key(&self, key: &str) -> Option<GuildId> {
        key.strip_prefix(&self.guild_prefix())?
            .strip_suffix(CONFIG_SUFFIX)?
            .parse()
            .ok()
    }
}
