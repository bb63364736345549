//! Discord-specific error types.

use derive_getters::Getters;

/// Discord error variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DiscordErrorKind {
    /// Serenity API error (HTTP, gateway, rate limit).
    #[display("Serenity API error: {_0}")]
    Serenity(String),

    /// Building or running the gateway client failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),

    /// Responding to an interaction failed.
    #[display("Interaction failed: {_0}")]
    InteractionFailed(String),

    /// Image lookup request or response was unusable.
    #[display("Image lookup failed: {_0}")]
    ImageLookup(String),
}

/// Discord error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Discord Error: {} at line {} in {}", kind, line, file)]
pub struct DiscordError {
    kind: DiscordErrorKind,
    line: u32,
    file: &'static str,
}

impl DiscordError {
    /// Create a new DiscordError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use brevity_discord::{DiscordError, DiscordErrorKind};
    ///
    /// let err = DiscordError::new(DiscordErrorKind::ImageLookup("no photos".into()));
    /// assert!(err.to_string().contains("no photos"));
    /// ```
    #[track_caller]
    pub fn new(kind: DiscordErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for Discord operations.
pub type DiscordResult<T> = Result<T, DiscordError>;

impl From<serenity::Error> for DiscordError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        DiscordError::new(DiscordErrorKind::Serenity(err.to_string()))
    }
}

// The request URL carries the API key, so it is dropped from the message.
impl From<reqwest::Error> for DiscordError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        DiscordError::new(DiscordErrorKind::ImageLookup(err.without_url().to_string()))
    }
}
