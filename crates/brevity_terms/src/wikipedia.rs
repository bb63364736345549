//! Scraper for the Wikipedia brevity code glossary.

use crate::TermSource;
use brevity_core::{Term, TermId};
use brevity_error::{BrevityResult, SourceError, SourceErrorKind};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Page the glossary is scraped from.
pub const DEFAULT_URL: &str = "https://en.wikipedia.org/wiki/Multiservice_tactical_brevity_code";

/// First glossary entry; definition lists before it are page furniture.
pub const DEFAULT_FIRST_TERM: &str = "Aborting/Abort/Aborted";

/// Heading id that ends the glossary.
pub const DEFAULT_STOP_HEADING: &str = "See_also";

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[.*?\]").expect("Valid bracket regex"));
static FOOTNOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:\d+|[a-z]|citation needed|note \d+)\]").expect("Valid footnote regex")
});
static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,;:!?)])").expect("Valid punctuation regex"));

/// Removes bracketed notes and asterisks from a term name.
///
/// ```
/// use brevity_terms::clean_name;
///
/// assert_eq!(clean_name("Bogey* [USN]"), "Bogey");
/// ```
pub fn clean_name(raw: &str) -> String {
    let without_notes = BRACKETED.replace_all(raw, "");
    collapse_whitespace(&without_notes.replace('*', ""))
}

/// Removes citation markers and tidies whitespace in a definition.
pub fn clean_definition(raw: &str) -> String {
    let without_footnotes = FOOTNOTE.replace_all(raw, "");
    let collapsed = collapse_whitespace(&without_footnotes);
    SPACE_BEFORE_PUNCTUATION
        .replace_all(&collapsed, "$1")
        .into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

fn selector(css: &str) -> BrevityResult<Selector> {
    Ok(Selector::parse(css).map_err(|e| {
        SourceError::new(SourceErrorKind::Parse(format!(
            "Invalid selector '{}': {}",
            css, e
        )))
    })?)
}

/// Extracts term/definition pairs from the glossary page.
///
/// Each `dt` is paired with the `dd` that follows it. Pairs before
/// `first_term` are dropped when that marker appears, and parsing stops at
/// the `h2` whose id (or inner headline span id) is `stop_heading`.
/// Duplicate identifiers keep their first definition.
pub fn parse_terms(html: &str, first_term: &str, stop_heading: &str) -> BrevityResult<Vec<Term>> {
    let document = Html::parse_document(html);
    let content = selector("div.mw-parser-output")?;
    let items = selector("h2, dt, dd")?;
    let headline = selector("span.mw-headline")?;

    let Some(root) = document.select(&content).next() else {
        return Err(SourceError::new(SourceErrorKind::Parse(
            "Content section not found".to_string(),
        ))
        .into());
    };

    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut current: Option<String> = None;
    for element in root.select(&items) {
        match element.value().name() {
            "h2" => {
                let id = element.value().id().or_else(|| {
                    element
                        .select(&headline)
                        .next()
                        .and_then(|span| span.value().id())
                });
                if id == Some(stop_heading) {
                    break;
                }
            }
            "dt" => current = Some(collapse_whitespace(&element_text(element))),
            "dd" => {
                if let Some(name) = current.take() {
                    pairs.push((name, element_text(element)));
                }
            }
            _ => {}
        }
    }

    let marker = clean_name(first_term);
    if let Some(start) = pairs.iter().position(|(name, _)| clean_name(name) == marker) {
        pairs.drain(..start);
    }

    let mut seen: HashSet<TermId> = HashSet::new();
    let terms: Vec<Term> = pairs
        .into_iter()
        .filter_map(|(name, definition)| {
            let name = clean_name(&name);
            let definition = clean_definition(&definition);
            if name.is_empty() || definition.is_empty() {
                return None;
            }
            let term = Term::new(name, definition);
            seen.insert(term.id().clone()).then_some(term)
        })
        .collect();

    if terms.is_empty() {
        return Err(SourceError::new(SourceErrorKind::Empty).into());
    }
    Ok(terms)
}

/// [`TermSource`] that scrapes the Wikipedia glossary page.
#[derive(Debug, Clone)]
pub struct WikipediaSource {
    client: reqwest::Client,
    url: String,
    first_term: String,
    stop_heading: String,
}

impl Default for WikipediaSource {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl WikipediaSource {
    /// Creates a source for the page at `url` with the default markers.
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("brevitybot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: url.into(),
            first_term: DEFAULT_FIRST_TERM.to_string(),
            stop_heading: DEFAULT_STOP_HEADING.to_string(),
        }
    }

    /// Overrides the entry that starts the glossary.
    pub fn with_first_term(mut self, first_term: impl Into<String>) -> Self {
        self.first_term = first_term.into();
        self
    }

    /// Overrides the heading id that ends the glossary.
    pub fn with_stop_heading(mut self, stop_heading: impl Into<String>) -> Self {
        self.stop_heading = stop_heading.into();
        self
    }

    /// Page URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl TermSource for WikipediaSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> BrevityResult<Vec<Term>> {
        debug!("Fetching glossary page");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::new(SourceErrorKind::Http(e.to_string())))?;
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::new(SourceErrorKind::Http(e.to_string())))?;

        let terms = parse_terms(&body, &self.first_term, &self.stop_heading)?;
        info!(count = terms.len(), "Scraped brevity terms");
        Ok(terms)
    }
}
