//! Term source trait.

use brevity_core::Term;
use brevity_error::{BrevityResult, SourceError, SourceErrorKind};
use parking_lot::Mutex;

/// Produces the complete list of terms.
#[async_trait::async_trait]
pub trait TermSource: Send + Sync {
    /// Fetch every term the source knows about.
    async fn fetch(&self) -> BrevityResult<Vec<Term>>;
}

/// Source that returns a fixed list, for tests and offline runs.
///
/// The list can be swapped or made to fail between fetches.
#[derive(Debug, Default)]
pub struct StaticSource {
    terms: Mutex<Option<Vec<Term>>>,
}

impl StaticSource {
    /// Creates a source that always returns `terms`.
    pub fn new(terms: Vec<Term>) -> Self {
        Self {
            terms: Mutex::new(Some(terms)),
        }
    }

    /// Creates a source whose fetches fail.
    pub fn failing() -> Self {
        Self {
            terms: Mutex::new(None),
        }
    }

    /// Replaces the list returned by later fetches.
    pub fn set_terms(&self, terms: Vec<Term>) {
        *self.terms.lock() = Some(terms);
    }

    /// Makes later fetches fail.
    pub fn set_failing(&self) {
        *self.terms.lock() = None;
    }
}

#[async_trait::async_trait]
impl TermSource for StaticSource {
    async fn fetch(&self) -> BrevityResult<Vec<Term>> {
        match self.terms.lock().clone() {
            Some(terms) => Ok(terms),
            None => Err(SourceError::new(SourceErrorKind::Http(
                "static source set to fail".to_string(),
            )))?,
        }
    }
}
