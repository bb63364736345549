//! Quiz error types.

/// Specific quiz error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum QuizErrorKind {
    /// Not enough cached terms to build a question
    #[display("Need at least {} terms for a quiz, {} cached", needed, available)]
    NotEnoughTerms {
        /// Terms required
        needed: usize,
        /// Terms cached
        available: usize,
    },
    /// Question index past the end of the session
    #[display("Question {} does not exist", _0)]
    QuestionOutOfRange(usize),
    /// Option index past the end of the question
    #[display("Option {} does not exist", _0)]
    OptionOutOfRange(usize),
    /// Requested quiz settings are outside the allowed range
    #[display("Invalid quiz settings: {}", _0)]
    InvalidSettings(String),
}

/// Quiz error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Quiz Error: {} at line {} in {}", kind, line, file)]
pub struct QuizError {
    kind: QuizErrorKind,
    line: u32,
    file: &'static str,
}

impl QuizError {
    /// Create a new quiz error with caller location tracking.
    #[track_caller]
    pub fn new(kind: QuizErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuizErrorKind {
        &self.kind
    }
}
