//! Discord delivery for the brevity code bot.
//!
//! Slash command registration and handling, scheduled term posts, the
//! button-driven quiz and the optional Flickr image lookup.

mod client;
pub mod commands;
mod components;
mod embeds;
mod error;
mod handler;
mod images;
mod permissions;
mod poster;
mod quiz;

pub use client::BrevityDiscordBot;
pub use components::{AnswerPress, answer_buttons, answer_id, classify_press, parse_answer_id};
pub use embeds::{
    SCHEDULED_HEADING, TERM_FOOTER, answer_embed, greenie_embed, question_embed, summary_embed,
    term_embed, wiki_link,
};
pub use error::{DiscordError, DiscordErrorKind, DiscordResult};
pub use handler::BrevityHandler;
pub use images::{FIGHTER_JET_GROUP, FLICKR_ENDPOINT, FlickrImages, FlickrPhoto, parse_search};
pub use permissions::{REQUIRED_PERMISSIONS, missing_permissions, permission_report};
pub use poster::{DiscordPoster, serenity_channel};
pub use quiz::{NOT_YOUR_QUIZ, run_quiz};
