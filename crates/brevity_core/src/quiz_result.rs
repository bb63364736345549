//! Recorded quiz outcomes.

use crate::{GuildId, UserId};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Outcome of one completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct QuizResult {
    guild_id: GuildId,
    user_id: UserId,
    timestamp: DateTime<Utc>,
    score: u32,
    total: u32,
}

impl QuizResult {
    /// Creates a result. `score` is capped at `total`.
    pub fn new(
        guild_id: GuildId,
        user_id: UserId,
        timestamp: DateTime<Utc>,
        score: u32,
        total: u32,
    ) -> Self {
        Self {
            guild_id,
            user_id,
            timestamp,
            score: score.min(total),
            total,
        }
    }

    /// Score as a percentage of the questions asked.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.score) * 100.0 / f64::from(self.total)
    }
}
