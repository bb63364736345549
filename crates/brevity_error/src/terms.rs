//! Term lookup error types.

/// Kinds of term lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TermsErrorKind {
    /// The term cache is empty
    #[display("No terms available")]
    NoTermsAvailable,
    /// No cached term matches the query
    #[display("Term not found: {}", _0)]
    NotFound(String),
}

/// Term lookup error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Terms Error: {} at line {} in {}", kind, line, file)]
pub struct TermsError {
    /// The kind of error that occurred
    pub kind: TermsErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TermsError {
    /// Create a new terms error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TermsErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
