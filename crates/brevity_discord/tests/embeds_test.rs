use brevity_bot::build_question;
use brevity_core::{GreenieBoard, GuildId, QuizResult, Term, UserId};
use brevity_discord::{TERM_FOOTER, answer_embed, greenie_embed, summary_embed, term_embed, wiki_link};
use brevity_terms::DEFAULT_URL;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;

fn json(embed: serenity::all::CreateEmbed) -> Value {
    serde_json::to_value(embed).expect("embed serializes")
}

fn terms() -> Vec<Term> {
    vec![
        Term::new("Bogey", "A radar or visual air contact whose identity is unknown."),
        Term::new("Bandit", "An identified enemy aircraft."),
        Term::new("Joker", "Fuel state above bingo at which separation should begin."),
        Term::new("Winchester", "No ordnance remaining."),
    ]
}

#[test]
fn test_term_embed_fields() {
    let term = Term::new("Bogey", "A radar or visual air contact whose identity is unknown.");
    let value = json(term_embed(&term, DEFAULT_URL, None));

    assert_eq!(value["title"], "Bogey");
    assert_eq!(value["description"], *term.definition());
    assert_eq!(value["url"], format!("{}#B", DEFAULT_URL));
    assert_eq!(value["color"], 3447003);
    assert_eq!(value["footer"]["text"], TERM_FOOTER);
    assert!(value.get("image").is_none_or(Value::is_null));
}

#[test]
fn test_term_embed_prefers_lookup_image() {
    let term = Term::new("Bogey", "Unknown contact.").with_image("https://example.com/wiki.png");
    let with_lookup = json(term_embed(&term, DEFAULT_URL, Some("https://example.com/jet.jpg")));
    assert_eq!(with_lookup["image"]["url"], "https://example.com/jet.jpg");

    let fallback = json(term_embed(&term, DEFAULT_URL, None));
    assert_eq!(fallback["image"]["url"], "https://example.com/wiki.png");
}

#[test]
fn test_wiki_link_without_letter_uses_base() {
    let term = Term::new("9-line", "Close air support briefing.");
    assert_eq!(wiki_link("https://example.com/page", &term), "https://example.com/page");
}

#[test]
fn test_answer_embed_reveals_answer() {
    let pool = terms();
    let mut rng = StdRng::seed_from_u64(3);
    let question = build_question(&pool[0], &pool, 3, &mut rng).expect("question builds");
    let wrong = (question.correct_index() + 1) % question.options().len();

    let correct = json(answer_embed(0, 5, &question, Some(*question.correct_index())));
    assert_eq!(correct["title"], "Question 1 of 5");
    assert!(correct["description"].as_str().is_some_and(|d| d.contains("Correct")));

    let missed = json(answer_embed(0, 5, &question, Some(wrong)));
    assert!(missed["description"].as_str().is_some_and(|d| d.contains("Not quite")));

    let timed_out = json(answer_embed(0, 5, &question, None));
    assert!(timed_out["description"].as_str().is_some_and(|d| d.contains("Time's up")));
    assert_eq!(timed_out["fields"][0]["value"], "Bogey");
}

#[test]
fn test_summary_embed_includes_board_when_present() {
    let result = QuizResult::new(GuildId(1), UserId(2), Utc::now(), 4, 5);
    let board = GreenieBoard::from_results(vec![result.clone()]);

    let with_board = json(summary_embed(&result, Some(&board)));
    assert!(with_board["description"].as_str().is_some_and(|d| d.contains("4/5")));
    assert_eq!(with_board["fields"][0]["name"], "Greenie board");

    let without = json(summary_embed(&result, None));
    assert!(without.get("fields").is_none_or(|f| f.as_array().is_none_or(Vec::is_empty)));
}

#[test]
fn test_greenie_embed_empty_board() {
    let value = json(greenie_embed("maverick", &GreenieBoard::from_results(Vec::new())));
    assert_eq!(value["title"], "Greenie board: maverick");
    assert!(value["description"].as_str().is_some_and(|d| d.contains("No quizzes")));
}
