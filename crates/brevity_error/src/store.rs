//! Key-value store error types.

/// Kinds of store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Store could not be reached
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
    /// Store rejected or failed a command
    #[display("Store command failed: {}", _0)]
    Command(String),
    /// Stored value could not be encoded or decoded
    #[display("Malformed value at '{}': {}", key, reason)]
    Serialization {
        /// Key holding the value
        key: String,
        /// Decoder message
        reason: String,
    },
}

/// Store error with location tracking.
///
/// # Examples
///
/// ```
/// use brevity_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::Unavailable("connection refused".into()));
/// assert!(err.is_transient());
/// assert!(format!("{}", err).contains("connection refused"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::Unavailable(_) | StoreErrorKind::Command(_)
        )
    }
}
