//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Brevity - posts NATO brevity code terms to Discord and quizzes on them
#[derive(Parser, Debug)]
#[command(name = "brevity")]
#[command(about = "Posts NATO brevity code terms to Discord and quizzes on them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and start posting
    Run {
        /// Settings file (defaults to ./brevity.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Scrape the term list once and print it
    Terms {
        /// Settings file (defaults to ./brevity.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print JSON instead of one line per term
        #[arg(long)]
        json: bool,
    },
}
