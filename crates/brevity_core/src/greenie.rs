//! Greenie board: a compact history of a user's recent quizzes.
//!
//! Entries are shown oldest-first, left to right, the way a squadron
//! greenie board reads.

use crate::QuizResult;

/// Number of quizzes shown on a board.
pub const GREENIE_BOARD_SIZE: usize = 10;

/// Grade square for a single quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GreenieGrade {
    /// 80% or better
    Green,
    /// 50% to 80%
    Yellow,
    /// Below 50%
    Red,
}

impl GreenieGrade {
    /// Grades a percentage score.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::Green
        } else if percentage >= 50.0 {
            Self::Yellow
        } else {
            Self::Red
        }
    }

    /// Emoji square for the grade.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Green => "🟩",
            Self::Yellow => "🟨",
            Self::Red => "🟥",
        }
    }
}

/// Most recent quiz results for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct GreenieBoard {
    entries: Vec<QuizResult>,
}

impl GreenieBoard {
    /// Keeps the [`GREENIE_BOARD_SIZE`] most recent results, oldest first.
    pub fn from_results(results: impl IntoIterator<Item = QuizResult>) -> Self {
        let mut entries: Vec<QuizResult> = results.into_iter().collect();
        entries.sort_by_key(|r| *r.timestamp());
        let skip = entries.len().saturating_sub(GREENIE_BOARD_SIZE);
        entries.drain(..skip);
        Self { entries }
    }

    /// Displayed results, oldest first.
    pub fn entries(&self) -> &[QuizResult] {
        &self.entries
    }

    /// Mean of the per-quiz percentages, rounded to one decimal place.
    pub fn average(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.iter().map(QuizResult::percentage).sum();
        let mean = sum / self.entries.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    }

    /// Renders the board as plain lines of text.
    pub fn render(&self) -> String {
        let Some(average) = self.average() else {
            return "No quizzes recorded yet. Try /quiz!".to_string();
        };

        let squares: String = self
            .entries
            .iter()
            .map(|r| GreenieGrade::from_percentage(r.percentage()).symbol())
            .collect();
        let scores = self
            .entries
            .iter()
            .map(|r| format!("{}/{}", r.score(), r.total()))
            .collect::<Vec<_>>()
            .join(" · ");

        format!(
            "{}\n{}\nAverage: {:.1}% over {} quiz{}",
            squares,
            scores,
            average,
            self.entries.len(),
            if self.entries.len() == 1 { "" } else { "zes" }
        )
    }
}
