//! Term source (scraper) error types.

/// Kinds of term source errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SourceErrorKind {
    /// Request to the reference page failed
    #[display("Request failed: {}", _0)]
    Http(String),
    /// Page could not be parsed
    #[display("Parse failed: {}", _0)]
    Parse(String),
    /// Page parsed but yielded no terms
    #[display("Source returned no terms")]
    Empty,
}

/// Term source error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Source Error: {} at line {} in {}", kind, line, file)]
pub struct SourceError {
    /// The kind of error that occurred
    pub kind: SourceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SourceError {
    /// Create a new source error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SourceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
