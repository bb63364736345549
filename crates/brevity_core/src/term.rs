//! Brevity terms.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Stable identifier of a term, derived from its name.
///
/// ```
/// use brevity_core::TermId;
///
/// assert_eq!(TermId::from_name("Bogey").as_str(), "bogey");
/// assert_eq!(
///     TermId::from_name("Aborting/Abort/Aborted").as_str(),
///     "aborting-abort-aborted"
/// );
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct TermId(String);

impl TermId {
    /// Lowercases the name and collapses every run of non-alphanumerics into one `-`.
    pub fn from_name(name: &str) -> Self {
        let mut id = String::with_capacity(name.len());
        let mut pending_dash = false;
        for c in name.chars() {
            if c.is_alphanumeric() {
                if pending_dash && !id.is_empty() {
                    id.push('-');
                }
                pending_dash = false;
                id.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        Self(id)
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TermId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A brevity code with its definition.
///
/// Terms are immutable once cached. A refresh replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Term {
    id: TermId,
    name: String,
    definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl Term {
    /// Creates a term, deriving its identifier from `name`.
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: TermId::from_name(&name),
            name,
            definition: definition.into(),
            image: None,
        }
    }

    /// Attaches an image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// First letter of the name, uppercased, used for section anchors.
    pub fn initial(&self) -> Option<char> {
        self.name
            .chars()
            .find(|c| c.is_alphanumeric())
            .and_then(|c| c.to_uppercase().next())
    }
}
