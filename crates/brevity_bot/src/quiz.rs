//! Multiple-choice quizzes built from the cached terms.

use crate::QuizConfig;
use brevity_core::{GuildId, QuizResult, Term, TermId, UserId};
use brevity_error::{BrevityResult, QuizError, QuizErrorKind};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use std::collections::HashSet;
use std::time::Duration;

/// Placeholder written over the term's own name in a prompt.
pub const BLANK: &str = "_____";

const STEM_SUFFIXES: [&str; 5] = ["ing", "ed", "es", "s", "e"];
const MIN_STEM_LEN: usize = 4;
/// Forms shorter than this are only blanked as whole words.
const MIN_SUBSTRING_LEN: usize = 3;

/// Who sees the quiz.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QuizMode {
    /// Questions are posted in the channel
    #[default]
    Public,
    /// Only the requester sees the questions
    Private,
}

impl QuizMode {
    /// Whether responses are shown to the requester only.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, QuizMode::Private)
    }
}

/// Validated options for one quiz.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct QuizSettings {
    questions: usize,
    mode: QuizMode,
    duration: Duration,
    distractors: usize,
}

impl QuizSettings {
    /// Builds settings from `/quiz` options, falling back to the configured defaults.
    ///
    /// Question counts above the maximum and durations outside the allowed
    /// window are clamped. A question count below one or an unknown mode is
    /// rejected.
    pub fn from_request(
        questions: Option<i64>,
        mode: Option<&str>,
        duration_secs: Option<i64>,
        config: &QuizConfig,
    ) -> BrevityResult<Self> {
        let questions = match questions {
            None => config.default_questions,
            Some(n) if n < 1 => {
                return Err(QuizError::new(QuizErrorKind::InvalidSettings(format!(
                    "a quiz needs at least one question, got {}",
                    n
                )))
                .into());
            }
            Some(n) => usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(config.max_questions),
        };

        let mode = match mode {
            None => QuizMode::default(),
            Some(raw) => raw.trim().parse::<QuizMode>().map_err(|_| {
                QuizError::new(QuizErrorKind::InvalidSettings(format!(
                    "unknown mode '{}', expected public or private",
                    raw
                )))
            })?,
        };

        let duration_secs = match duration_secs {
            None => config.default_duration_secs,
            Some(secs) => u64::try_from(secs).unwrap_or(0),
        }
        .clamp(config.min_duration_secs, config.max_duration_secs);

        Ok(Self {
            questions,
            mode,
            duration: Duration::from_secs(duration_secs),
            distractors: config.distractors,
        })
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Question {
    term_id: TermId,
    answer: String,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Whether `option` is the correct answer.
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

fn strip_suffix_stem(word: &str) -> Option<&str> {
    STEM_SUFFIXES.iter().find_map(|suffix| {
        word.strip_suffix(suffix)
            .filter(|stem| stem.chars().count() >= MIN_STEM_LEN)
    })
}

fn without_parentheticals(form: &str) -> String {
    let mut out = String::with_capacity(form.len());
    let mut depth = 0usize;
    for c in form.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_' || c.is_whitespace()
}

// Escapes `form` for a regex, letting any run of separators stand in for another.
fn form_pattern(form: &str) -> String {
    form.split(is_separator)
        .filter(|piece| !piece.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[\s_-]+")
}

// Forms made only of separators would match everywhere, so they are dropped.
fn joined_patterns(forms: &[&String]) -> Option<String> {
    let patterns: Vec<String> = forms
        .iter()
        .map(|form| form_pattern(form))
        .filter(|pattern| !pattern.is_empty())
        .collect();
    (!patterns.is_empty()).then(|| patterns.join("|"))
}

/// Lowercase forms of `name` that would give the answer away.
fn name_forms(name: &str) -> Vec<String> {
    let mut forms: HashSet<String> = HashSet::new();
    let lower = name.to_lowercase();

    for part in lower.split('/').map(str::trim).filter(|p| !p.is_empty()) {
        let mut bases = vec![part.to_string()];
        let bare = without_parentheticals(part).trim().to_string();
        let joined: String = part
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();
        let spaced = part.replace(is_separator, " ");
        bases.push(bare);
        bases.push(joined.trim().to_string());
        bases.push(spaced.split_whitespace().collect::<Vec<_>>().join(" "));

        for base in bases.into_iter().filter(|b| !b.is_empty()) {
            let words: Vec<&str> = base.split_whitespace().collect();
            if words.len() > 1 {
                for word in &words {
                    if word.chars().count() >= MIN_STEM_LEN {
                        forms.insert(word.to_string());
                    }
                }
            }
            if let Some(stem) = strip_suffix_stem(&base) {
                forms.insert(stem.to_string());
            }
            forms.insert(base);
        }
    }

    // Longest first so the regex prefers the widest match.
    let mut forms: Vec<String> = forms.into_iter().collect();
    forms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    forms
}

/// Blanks out every word of `definition` that contains a form of `name`.
///
/// Forms are the name itself, each `/`-separated alternative, the words of a
/// multi-word name and a stem with a common suffix removed. Matching is
/// case-insensitive, and hyphens, underscores and spaces match each other.
///
/// ```
/// use brevity_bot::sanitize_definition;
///
/// let prompt = sanitize_definition("Aborted attack. Aborting now.", "Aborting/Abort/Aborted");
/// assert_eq!(prompt, "_____ attack. _____ now.");
/// ```
pub fn sanitize_definition(definition: &str, name: &str) -> String {
    let forms = name_forms(name);
    let (long, short): (Vec<&String>, Vec<&String>) = forms
        .iter()
        .partition(|form| form.chars().count() >= MIN_SUBSTRING_LEN);

    let mut alternatives = Vec::new();
    if let Some(joined) = joined_patterns(&long) {
        alternatives.push(format!(r"[\w'-]*(?:{})[\w'-]*", joined));
    }
    if let Some(joined) = joined_patterns(&short) {
        alternatives.push(format!(r"\b(?:{})\b", joined));
    }
    if alternatives.is_empty() {
        return definition.to_string();
    }

    match Regex::new(&format!("(?i){}", alternatives.join("|"))) {
        Ok(pattern) => pattern.replace_all(definition, BLANK).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, name, "Could not build sanitizer pattern");
            definition.to_string()
        }
    }
}

/// Builds a question asking for `term` given its definition.
///
/// Distractors are names of other terms in `pool`, each name offered once.
/// Up to `distractors` are used; fewer when the pool is small.
///
/// # Errors
///
/// `NotEnoughTerms` when the pool has no other term to offer as a wrong answer.
pub fn build_question<R>(
    term: &Term,
    pool: &[Term],
    distractors: usize,
    rng: &mut R,
) -> BrevityResult<Question>
where
    R: Rng + ?Sized,
{
    let mut seen: HashSet<String> = HashSet::from([term.name().to_lowercase()]);
    let candidates: Vec<&Term> = pool
        .iter()
        .filter(|t| t.id() != term.id())
        .filter(|t| seen.insert(t.name().to_lowercase()))
        .collect();
    if candidates.is_empty() || distractors == 0 {
        return Err(QuizError::new(QuizErrorKind::NotEnoughTerms {
            needed: 2,
            available: candidates.len() + 1,
        })
        .into());
    }

    let mut options: Vec<String> = candidates
        .choose_multiple(rng, distractors)
        .map(|t| t.name().clone())
        .collect();
    options.shuffle(rng);
    let correct_index = rng.gen_range(0..=options.len());
    options.insert(correct_index, term.name().clone());

    Ok(Question {
        term_id: term.id().clone(),
        answer: term.name().clone(),
        prompt: sanitize_definition(term.definition(), term.name()),
        options,
        correct_index,
    })
}

/// One user's quiz in progress.
#[derive(Debug, Clone, Getters)]
pub struct QuizSession {
    guild_id: GuildId,
    user_id: UserId,
    settings: QuizSettings,
    questions: Vec<Question>,
    #[getter(skip)]
    answers: Vec<Option<usize>>,
}

impl QuizSession {
    /// Samples distinct terms from `pool` and builds a question for each.
    ///
    /// The number of questions is capped at the pool size.
    ///
    /// # Errors
    ///
    /// `NotEnoughTerms` when `pool` has fewer than two terms.
    pub fn new<R>(
        guild_id: GuildId,
        user_id: UserId,
        settings: QuizSettings,
        pool: &[Term],
        rng: &mut R,
    ) -> BrevityResult<Self>
    where
        R: Rng + ?Sized,
    {
        if pool.len() < 2 {
            return Err(QuizError::new(QuizErrorKind::NotEnoughTerms {
                needed: 2,
                available: pool.len(),
            })
            .into());
        }

        let count = (*settings.questions()).min(pool.len());
        let picked: Vec<&Term> = pool.choose_multiple(rng, count).collect();
        let questions = picked
            .into_iter()
            .map(|term| build_question(term, pool, *settings.distractors(), &mut *rng))
            .collect::<BrevityResult<Vec<_>>>()?;

        Ok(Self {
            guild_id,
            user_id,
            answers: vec![None; questions.len()],
            settings,
            questions,
        })
    }

    /// Question at `index`, if there is one.
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Records `option` as the answer to question `index`.
    ///
    /// Only the first answer to a question counts; later ones are ignored
    /// and the first answer's correctness is returned.
    pub fn answer(&mut self, index: usize, option: usize) -> BrevityResult<bool> {
        let question = self
            .questions
            .get(index)
            .ok_or_else(|| QuizError::new(QuizErrorKind::QuestionOutOfRange(index)))?;
        if option >= question.options().len() {
            return Err(QuizError::new(QuizErrorKind::OptionOutOfRange(option)).into());
        }

        let slot = &mut self.answers[index];
        let chosen = *slot.get_or_insert(option);
        Ok(question.is_correct(chosen))
    }

    /// The answer recorded for question `index`.
    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(index).copied().flatten()
    }

    /// Correct answers so far.
    pub fn score(&self) -> u32 {
        let correct = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| answer.is_some_and(|a| question.is_correct(a)))
            .count();
        u32::try_from(correct).unwrap_or(u32::MAX)
    }

    /// Number of questions that received an answer.
    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// The result to record, counting unanswered questions as wrong.
    pub fn finish(&self, now: DateTime<Utc>) -> QuizResult {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        QuizResult::new(self.guild_id, self.user_id, now, self.score(), total)
    }
}
