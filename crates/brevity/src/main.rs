//! Brevity code bot binary.
//!
//! - `run` connects to Discord and starts the posting loop
//! - `terms` scrapes the reference page once and prints what it found

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, print_terms, run_bot};

    // A missing .env is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run { config } => {
            run_bot(config.as_deref()).await?;
        }

        Commands::Terms { config, json } => {
            print_terms(config.as_deref(), json).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        std::env::var(brevity_bot::LOG_LEVEL_VAR)
            .ok()
            .and_then(|level| EnvFilter::try_new(level).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
