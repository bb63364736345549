//! Error types for the brevity code bot.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind with the source location that raised it
//! - Constructors use `#[track_caller]` so the location is captured automatically
//!
//! Every error converts into [`BrevityError`] with `?`.
//!
//! ```
//! use brevity_error::{BrevityResult, TermsError, TermsErrorKind};
//!
//! fn pick() -> BrevityResult<String> {
//!     Err(TermsError::new(TermsErrorKind::NoTermsAvailable))?
//! }
//!
//! let err = pick().unwrap_err();
//! assert!(err.user_message().contains("/reloadterms"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod delivery;
mod error;
mod input;
mod quiz;
mod source;
mod store;
mod terms;

pub use config::ConfigError;
pub use delivery::DeliveryError;
pub use error::{BrevityError, BrevityErrorKind, BrevityResult};
pub use input::{InputError, InputErrorKind};
pub use quiz::{QuizError, QuizErrorKind};
pub use source::{SourceError, SourceErrorKind};
pub use store::{StoreError, StoreErrorKind};
pub use terms::{TermsError, TermsErrorKind};
