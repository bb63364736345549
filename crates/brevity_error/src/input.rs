//! Errors for command input that can't be acted on.

/// Specific input error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum InputErrorKind {
    /// The guild has not run `/setup`
    #[display("Guild is not set up")]
    NotConfigured,
    /// The command only works inside a server
    #[display("Command requires a guild")]
    GuildOnly,
    /// A numeric option is outside its allowed range
    #[display("'{}' out of range: {}", field, reason)]
    OutOfRange {
        /// Option name
        field: String,
        /// Allowed range
        reason: String,
    },
}

/// Input error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Input Error: {} at line {} in {}", kind, line, file)]
pub struct InputError {
    kind: InputErrorKind,
    line: u32,
    file: &'static str,
}

impl InputError {
    /// Create a new input error with caller location tracking.
    #[track_caller]
    pub fn new(kind: InputErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &InputErrorKind {
        &self.kind
    }
}
