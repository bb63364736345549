//! Term rotation, scheduled posting and quizzes for the brevity code bot.
//!
//! - [`RotationTracker`] picks each guild's next unused term
//! - [`Scheduler`] scans guilds and posts to the due ones through a [`TermPoster`]
//! - [`BotServer`] drives scans and term refreshes on one non-overlapping loop
//! - [`QuizSession`] builds and scores multiple-choice quizzes
//! - [`BotService`] is the command logic the chat layer calls

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod metrics;
mod quiz;
mod retry;
mod rotation;
mod scheduler;
mod server;
mod service;

pub use config::{
    BotConfig, Credentials, DISCORD_TOKEN_VAR, FLICKR_KEY_VAR, LOG_LEVEL_VAR, QuizConfig,
    RetryConfig, STORE_URL_VAR, SourceConfig,
};
pub use metrics::{BotMetrics, MetricsSnapshot};
pub use quiz::{
    BLANK, Question, QuizMode, QuizSession, QuizSettings, build_question, sanitize_definition,
};
pub use retry::with_retry;
pub use rotation::{RotationTracker, choose_unused};
pub use scheduler::{Scheduler, TermPoster, TickReport};
pub use server::{BotServer, ServerHandle, ServerMessage};
pub use service::BotService;
