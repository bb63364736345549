//! Quiz answer buttons.

use brevity_bot::Question;
use serenity::all::{ButtonStyle, CreateActionRow, CreateButton};

const PREFIX: &str = "quiz";
const BUTTONS_PER_ROW: usize = 5;

/// Custom id of the button for `option` on question `question`.
pub fn answer_id(question: usize, option: usize) -> String {
    format!("{}:{}:{}", PREFIX, question, option)
}

/// Parses an [`answer_id`] back into `(question, option)`.
///
/// ```
/// use brevity_discord::{answer_id, parse_answer_id};
///
/// assert_eq!(parse_answer_id(&answer_id(2, 3)), Some((2, 3)));
/// assert_eq!(parse_answer_id("poll:1:2"), None);
/// ```
pub fn parse_answer_id(id: &str) -> Option<(usize, usize)> {
    let mut parts = id.split(':');
    if parts.next()? != PREFIX {
        return None;
    }
    let question = parts.next()?.parse().ok()?;
    let option = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((question, option))
}

/// What to do with a button press on a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerPress {
    /// The quiz taker picked `option` on the current question
    Answer(usize),
    /// Someone other than the quiz taker pressed a button
    NotOwner,
    /// The button does not belong to the current question
    Stale,
}

/// Classifies a press of `custom_id` by `presser` while question `index` of
/// `owner`'s quiz is open.
///
/// ```
/// use brevity_discord::{AnswerPress, answer_id, classify_press};
///
/// assert_eq!(classify_press(&answer_id(1, 2), 7, 7, 1), AnswerPress::Answer(2));
/// assert_eq!(classify_press(&answer_id(1, 2), 8, 7, 1), AnswerPress::NotOwner);
/// ```
pub fn classify_press(custom_id: &str, presser: u64, owner: u64, index: usize) -> AnswerPress {
    if presser != owner {
        return AnswerPress::NotOwner;
    }
    match parse_answer_id(custom_id) {
        Some((question, option)) if question == index => AnswerPress::Answer(option),
        _ => AnswerPress::Stale,
    }
}

/// One button per option, labelled with the option text.
pub fn answer_buttons(index: usize, question: &Question) -> Vec<CreateActionRow> {
    let buttons: Vec<CreateButton> = question
        .options()
        .iter()
        .enumerate()
        .map(|(option, label)| {
            CreateButton::new(answer_id(index, option))
                .label(truncate_label(label))
                .style(ButtonStyle::Primary)
        })
        .collect();
    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| CreateActionRow::Buttons(row.to_vec()))
        .collect()
}

// Discord caps button labels at 80 characters.
fn truncate_label(label: &str) -> String {
    const MAX: usize = 80;
    if label.chars().count() <= MAX {
        return label.to_string();
    }
    let mut out: String = label.chars().take(MAX - 1).collect();
    out.push('…');
    out
}
