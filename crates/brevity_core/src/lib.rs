//! Core data model for the brevity code bot.
//!
//! - [`Term`]: a cached brevity code and its definition
//! - [`GuildConfig`]: per-server posting configuration and its [`ScheduleState`]
//! - [`QuizResult`] and [`GreenieBoard`]: recorded quiz scores and their display

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod greenie;
mod guild;
mod ids;
mod quiz_result;
mod term;

pub use greenie::{GREENIE_BOARD_SIZE, GreenieBoard, GreenieGrade};
pub use guild::{GuildConfig, ScheduleState};
pub use ids::{ChannelId, GuildId, UserId};
pub use quiz_result::QuizResult;
pub use term::{Term, TermId};
