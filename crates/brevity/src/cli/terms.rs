//! One-off scrape of the term source.

use brevity_bot::BotConfig;
use brevity_terms::{TermSource, WikipediaSource};
use std::path::Path;
use tracing::info;

/// Fetches the configured source once and prints the parsed terms.
pub async fn print_terms(
    config: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = BotConfig::load(config)?;
    let source = WikipediaSource::new(config.source.url.clone())
        .with_first_term(config.source.first_term.clone())
        .with_stop_heading(config.source.stop_heading.clone());

    let terms = source.fetch().await?;
    info!(count = terms.len(), url = source.url(), "Fetched terms");

    if json {
        println!("{}", serde_json::to_string_pretty(&terms)?);
    } else {
        for term in &terms {
            println!("{}: {}", term.name(), term.definition());
        }
    }
    Ok(())
}
