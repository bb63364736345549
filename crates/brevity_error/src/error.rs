//! Top-level error wrapper types.

use crate::{
    ConfigError, DeliveryError, InputError, InputErrorKind, QuizError, QuizErrorKind, SourceError,
    StoreError, TermsError, TermsErrorKind,
};

/// Every error condition the bot can raise.
///
/// # Examples
///
/// ```
/// use brevity_error::{BrevityError, ConfigError};
///
/// let err: BrevityError = ConfigError::new("REDIS_URL is not set").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BrevityErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Key-value store error
    #[from(StoreError)]
    Store(StoreError),
    /// Reference page fetch or parse error
    #[from(SourceError)]
    Source(SourceError),
    /// Term lookup error
    #[from(TermsError)]
    Terms(TermsError),
    /// Quiz construction or answering error
    #[from(QuizError)]
    Quiz(QuizError),
    /// Chat platform delivery error
    #[from(DeliveryError)]
    Delivery(DeliveryError),
    /// Unusable command input
    #[from(InputError)]
    Input(InputError),
}

/// Brevity bot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Brevity Error: {}", _0)]
pub struct BrevityError(Box<BrevityErrorKind>);

impl BrevityError {
    /// Create a new error from a kind.
    pub fn new(kind: BrevityErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BrevityErrorKind {
        &self.0
    }

    /// Whether a background task should retry on its next cycle.
    pub fn is_transient(&self) -> bool {
        match self.kind() {
            BrevityErrorKind::Store(e) => e.is_transient(),
            BrevityErrorKind::Source(_) | BrevityErrorKind::Delivery(_) => true,
            _ => false,
        }
    }

    /// Short reply suitable for showing to the user who ran a command.
    pub fn user_message(&self) -> String {
        match self.kind() {
            BrevityErrorKind::Config(_) => {
                "The bot is misconfigured. Please contact its operator.".to_string()
            }
            BrevityErrorKind::Store(_) => {
                "The bot's storage is unavailable right now. Try again shortly.".to_string()
            }
            BrevityErrorKind::Source(_) => {
                "Couldn't fetch brevity terms from Wikipedia. The existing list was kept."
                    .to_string()
            }
            BrevityErrorKind::Terms(e) => match &e.kind {
                TermsErrorKind::NoTermsAvailable => {
                    "No terms are cached yet. Run /reloadterms to fetch them.".to_string()
                }
                TermsErrorKind::NotFound(query) => {
                    format!("No brevity term matches \"{}\".", query)
                }
            },
            BrevityErrorKind::Quiz(e) => match e.kind() {
                QuizErrorKind::NotEnoughTerms { .. } => {
                    "Not enough terms are cached for a quiz. Run /reloadterms first.".to_string()
                }
                QuizErrorKind::InvalidSettings(reason) => format!("Invalid quiz options: {}", reason),
                _ => "That answer couldn't be recorded.".to_string(),
            },
            BrevityErrorKind::Delivery(_) => {
                "I couldn't post in the configured channel. Check my permissions with /checkperms."
                    .to_string()
            }
            BrevityErrorKind::Input(e) => match e.kind() {
                InputErrorKind::NotConfigured => {
                    "This server isn't set up yet. Run /setup in the channel I should post to."
                        .to_string()
                }
                InputErrorKind::GuildOnly => "That command only works inside a server.".to_string(),
                InputErrorKind::OutOfRange { field, reason } => {
                    format!("`{}` must be {}.", field, reason)
                }
            },
        }
    }
}

// Generic From implementation for any type that converts to BrevityErrorKind
impl<T> From<T> for BrevityError
where
    T: Into<BrevityErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for brevity bot operations.
pub type BrevityResult<T> = std::result::Result<T, BrevityError>;
