//! Brevity term scraping and caching.
//!
//! - [`TermSource`] produces the full list of terms
//! - [`WikipediaSource`] scrapes it from the Multiservice tactical brevity code page
//! - [`TermCache`] holds the current list, persists it with an expiry and
//!   keeps the old list when a refresh fails

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod source;
mod wikipedia;

pub use cache::TermCache;
pub use source::{StaticSource, TermSource};
pub use wikipedia::{
    DEFAULT_FIRST_TERM, DEFAULT_STOP_HEADING, DEFAULT_URL, WikipediaSource, clean_definition,
    clean_name, parse_terms,
};
