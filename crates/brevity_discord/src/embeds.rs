//! Embed builders for terms, quiz questions and the greenie board.

use brevity_bot::Question;
use brevity_core::{GreenieBoard, GreenieGrade, QuizResult, Term};
use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter};
use std::time::Duration;

/// Footer on every term embed.
pub const TERM_FOOTER: &str = "From Wikipedia – Multiservice Tactical Brevity Code";
/// Message text sent with scheduled posts.
pub const SCHEDULED_HEADING: &str = "📡 **Brevity Term of the Day**";

/// Link to the section of the reference page holding `term`.
///
/// ```
/// use brevity_core::Term;
/// use brevity_discord::wiki_link;
///
/// let term = Term::new("Bogey", "Unknown contact.");
/// let link = wiki_link("https://en.wikipedia.org/wiki/Multiservice_tactical_brevity_code", &term);
/// assert!(link.ends_with("#B"));
/// ```
pub fn wiki_link(base: &str, term: &Term) -> String {
    match term.initial() {
        Some(letter) if letter.is_ascii_alphabetic() => format!("{}#{}", base, letter),
        _ => base.to_string(),
    }
}

/// Embed presenting a term and its definition.
pub fn term_embed(term: &Term, wiki_base: &str, image: Option<&str>) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(term.name())
        .url(wiki_link(wiki_base, term))
        .description(term.definition())
        .colour(Colour::BLUE)
        .footer(CreateEmbedFooter::new(TERM_FOOTER));
    if let Some(url) = image.or(term.image().as_deref()) {
        embed = embed.image(url);
    }
    embed
}

/// Embed asking question `index` of `total`.
pub fn question_embed(index: usize, total: usize, question: &Question, duration: Duration) -> CreateEmbed {
    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| format!("**{}.** {}", i + 1, option))
        .collect::<Vec<_>>()
        .join("\n");
    CreateEmbed::new()
        .title(format!("Question {} of {}", index + 1, total))
        .description(format!("Which brevity term means:\n> {}", question.prompt()))
        .field("Options", options, false)
        .colour(Colour::BLUE)
        .footer(CreateEmbedFooter::new(format!(
            "{} seconds to answer",
            duration.as_secs()
        )))
}

/// Embed revealing the answer to question `index` after `chosen` (or a timeout).
pub fn answer_embed(
    index: usize,
    total: usize,
    question: &Question,
    chosen: Option<usize>,
) -> CreateEmbed {
    let (verdict, colour) = match chosen {
        Some(option) if question.is_correct(option) => ("✅ Correct!".to_string(), Colour::DARK_GREEN),
        Some(option) => (
            format!(
                "❌ Not quite, you picked **{}**.",
                question.options().get(option).map(String::as_str).unwrap_or("?")
            ),
            Colour::RED,
        ),
        None => ("⏱️ Time's up!".to_string(), Colour::ORANGE),
    };
    CreateEmbed::new()
        .title(format!("Question {} of {}", index + 1, total))
        .description(format!("> {}\n\n{}", question.prompt(), verdict))
        .field("Answer", question.answer(), false)
        .colour(colour)
}

/// Embed summarising a finished quiz, with the board when it could be loaded.
pub fn summary_embed(result: &QuizResult, board: Option<&GreenieBoard>) -> CreateEmbed {
    let grade = GreenieGrade::from_percentage(result.percentage());
    let mut embed = CreateEmbed::new()
        .title("Quiz complete")
        .description(format!(
            "{} You scored **{}/{}** ({:.0}%).",
            grade.symbol(),
            result.score(),
            result.total(),
            result.percentage()
        ))
        .colour(Colour::BLUE);
    if let Some(board) = board {
        embed = embed.field("Greenie board", board.render(), false);
    }
    embed
}

/// Embed showing `name`'s greenie board.
pub fn greenie_embed(name: &str, board: &GreenieBoard) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("Greenie board: {}", name))
        .description(board.render())
        .colour(Colour::DARK_GREEN)
        .footer(CreateEmbedFooter::new("🟩 80%+  🟨 50%+  🟥 below 50%"))
}
