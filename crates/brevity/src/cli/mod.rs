//! Command-line interface for the brevity binary.

mod commands;
mod run;
mod terms;

pub use commands::{Cli, Commands};
pub use run::run_bot;
pub use terms::print_terms;
