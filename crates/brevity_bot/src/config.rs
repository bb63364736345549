//! Bot settings and startup credentials.

use brevity_error::{BrevityError, BrevityResult, ConfigError};
use brevity_terms::{DEFAULT_FIRST_TERM, DEFAULT_STOP_HEADING, DEFAULT_URL};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable holding the Discord bot token.
pub const DISCORD_TOKEN_VAR: &str = "DISCORD_TOKEN";
/// Environment variable holding the store connection string.
pub const STORE_URL_VAR: &str = "REDIS_URL";
/// Environment variable holding the optional Flickr API key.
pub const FLICKR_KEY_VAR: &str = "FLICKR_API_KEY";
/// Environment variable holding the log filter.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

const STORE_SCHEMES: [&str; 3] = ["redis://", "rediss://", "memory://"];

/// Tunable settings for the bot.
///
/// Every field has a default, so an absent or partial `brevity.toml` is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix for every store key
    pub key_prefix: String,
    /// Seconds between scheduler scans
    pub tick_interval_secs: u64,
    /// Hours between term list refreshes, also the stored list's expiry
    pub term_refresh_hours: u64,
    /// Posting frequency for guilds that never set one
    pub default_frequency_hours: u32,
    /// Upper bound on a single channel post
    pub post_timeout_secs: u64,
    /// Quiz results kept per user
    pub results_retained: usize,
    /// Backoff for store reads in background ticks
    pub store_retry: RetryConfig,
    /// Quiz limits
    pub quiz: QuizConfig,
    /// Where terms are scraped from
    pub source: SourceConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            key_prefix: "brevity".to_string(),
            tick_interval_secs: 300,
            term_refresh_hours: 24,
            default_frequency_hours: 24,
            post_timeout_secs: 30,
            results_retained: 50,
            store_retry: RetryConfig::default(),
            quiz: QuizConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

/// Exponential backoff settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// First delay in milliseconds
    pub initial_delay_ms: u64,
    /// Cap on a single delay
    pub max_delay_secs: u64,
    /// Retries after the first attempt
    pub attempts: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 200,
            max_delay_secs: 10,
            attempts: 4,
        }
    }
}

/// Limits applied to `/quiz` options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Questions asked when none are requested
    pub default_questions: usize,
    /// Most questions a single quiz may ask
    pub max_questions: usize,
    /// Wrong answers offered per question
    pub distractors: usize,
    /// Seconds per question when none are requested
    pub default_duration_secs: u64,
    /// Shortest allowed question duration
    pub min_duration_secs: u64,
    /// Longest allowed question duration
    pub max_duration_secs: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_questions: 5,
            max_questions: 10,
            distractors: 3,
            default_duration_secs: 30,
            min_duration_secs: 5,
            max_duration_secs: 120,
        }
    }
}

/// Reference page settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Page URL
    pub url: String,
    /// First real entry; anything listed before it is dropped
    pub first_term: String,
    /// Id of the heading that ends the glossary
    pub stop_heading: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            first_term: DEFAULT_FIRST_TERM.to_string(),
            stop_heading: DEFAULT_STOP_HEADING.to_string(),
        }
    }
}

impl BotConfig {
    /// Load settings with precedence: environment > file > defaults.
    ///
    /// With no `path`, `./brevity.toml` is used if it exists. Environment
    /// overrides use the `BREVITY__` prefix with `__` between nested keys,
    /// e.g. `BREVITY__QUIZ__MAX_QUESTIONS=8`.
    #[instrument]
    pub fn load(path: Option<&Path>) -> BrevityResult<Self> {
        let mut builder = Config::builder();
        builder = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading settings file");
                builder.add_source(File::from(path))
            }
            None => builder.add_source(File::with_name("brevity").required(false)),
        };
        builder = builder.add_source(
            Environment::with_prefix("BREVITY")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .map_err(|e| {
                BrevityError::from(ConfigError::new(format!(
                    "Failed to build settings: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BrevityError::from(ConfigError::new(format!(
                    "Failed to parse settings: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the scheduler or quiz engine can't run with.
    pub fn validate(&self) -> BrevityResult<()> {
        let positive = [
            ("tick_interval_secs", self.tick_interval_secs),
            ("term_refresh_hours", self.term_refresh_hours),
            ("default_frequency_hours", u64::from(self.default_frequency_hours)),
            ("post_timeout_secs", self.post_timeout_secs),
            ("results_retained", self.results_retained as u64),
            ("quiz.default_questions", self.quiz.default_questions as u64),
            ("quiz.max_questions", self.quiz.max_questions as u64),
            ("quiz.distractors", self.quiz.distractors as u64),
            ("quiz.min_duration_secs", self.quiz.min_duration_secs),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::new(format!("{} must be greater than zero", name)).into());
        }
        if self.key_prefix.trim().is_empty() {
            return Err(ConfigError::new("key_prefix must not be empty").into());
        }
        if self.quiz.min_duration_secs > self.quiz.max_duration_secs {
            return Err(ConfigError::new(format!(
                "quiz.min_duration_secs ({}) exceeds quiz.max_duration_secs ({})",
                self.quiz.min_duration_secs, self.quiz.max_duration_secs
            ))
            .into());
        }
        if self.quiz.default_questions > self.quiz.max_questions {
            return Err(ConfigError::new(format!(
                "quiz.default_questions ({}) exceeds quiz.max_questions ({})",
                self.quiz.default_questions, self.quiz.max_questions
            ))
            .into());
        }
        Ok(())
    }

    /// Time between scheduler scans.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Time between term list refreshes.
    pub fn term_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.term_refresh_hours * 3600)
    }

    /// Upper bound on a single channel post.
    pub fn post_timeout(&self) -> Duration {
        Duration::from_secs(self.post_timeout_secs)
    }
}

/// Secrets and connection strings read from the environment.
#[derive(Clone)]
pub struct Credentials {
    discord_token: String,
    store_url: String,
    flickr_api_key: Option<String>,
    log_level: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("discord_token", &"<redacted>")
            .field("store_scheme", &self.store_scheme())
            .field("flickr_api_key", &self.flickr_api_key.as_ref().map(|_| "<redacted>"))
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Credentials {
    /// Reads credentials from the process environment.
    pub fn from_env() -> BrevityResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads credentials through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BrevityResult<Self> {
        let present = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let discord_token = present(DISCORD_TOKEN_VAR).ok_or_else(|| {
            ConfigError::new(format!("{} is not set", DISCORD_TOKEN_VAR))
        })?;
        let store_url = present(STORE_URL_VAR)
            .ok_or_else(|| ConfigError::new(format!("{} is not set", STORE_URL_VAR)))?;
        if !STORE_SCHEMES.iter().any(|scheme| store_url.starts_with(scheme)) {
            return Err(ConfigError::new(format!(
                "{} must start with one of {}",
                STORE_URL_VAR,
                STORE_SCHEMES.join(", ")
            ))
            .into());
        }

        Ok(Self {
            discord_token,
            store_url,
            flickr_api_key: present(FLICKR_KEY_VAR),
            log_level: present(LOG_LEVEL_VAR),
        })
    }

    /// Discord bot token.
    pub fn discord_token(&self) -> &str {
        &self.discord_token
    }

    /// Store connection string.
    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    /// Flickr API key, when image lookup is enabled.
    pub fn flickr_api_key(&self) -> Option<&str> {
        self.flickr_api_key.as_deref()
    }

    /// Log filter directive.
    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    fn store_scheme(&self) -> &str {
        self.store_url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .unwrap_or("")
    }
}
