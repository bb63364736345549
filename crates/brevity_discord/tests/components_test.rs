use brevity_bot::build_question;
use brevity_core::Term;
use brevity_discord::{AnswerPress, answer_buttons, answer_id, classify_press, parse_answer_id};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;

fn pool(size: usize) -> Vec<Term> {
    (0..size)
        .map(|i| Term::new(format!("Term{}", i), format!("Definition number {}.", i)))
        .collect()
}

fn rows(question_index: usize, distractors: usize) -> (usize, Vec<Value>) {
    let terms = pool(10);
    let mut rng = StdRng::seed_from_u64(11);
    let question = build_question(&terms[0], &terms, distractors, &mut rng).expect("question");
    let rows = answer_buttons(question_index, &question)
        .into_iter()
        .map(|row| serde_json::to_value(row).expect("row serializes"))
        .collect();
    (*question.correct_index(), rows)
}

#[test]
fn test_one_button_per_option() {
    let (_, rows) = rows(0, 3);
    assert_eq!(rows.len(), 1);
    let buttons = rows[0]["components"].as_array().expect("buttons");
    assert_eq!(buttons.len(), 4);

    let ids: Vec<(usize, usize)> = buttons
        .iter()
        .filter_map(|b| b["custom_id"].as_str())
        .filter_map(parse_answer_id)
        .collect();
    assert_eq!(ids, vec![(0, 0), (0, 1), (0, 2), (0, 3)]);
}

#[test]
fn test_buttons_wrap_after_five() {
    let (_, rows) = rows(4, 6);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["components"].as_array().map(Vec::len), Some(5));
    assert_eq!(rows[1]["components"].as_array().map(Vec::len), Some(2));
    assert!(
        rows[1]["components"][0]["custom_id"]
            .as_str()
            .is_some_and(|id| id.starts_with("quiz:4:"))
    );
}

#[test]
fn test_press_by_other_member_is_refused() {
    let owner = 100;
    assert_eq!(classify_press(&answer_id(0, 1), 200, owner, 0), AnswerPress::NotOwner);
    // Refused even when the id is malformed or stale
    assert_eq!(classify_press("poll:0:1", 200, owner, 0), AnswerPress::NotOwner);
}

#[test]
fn test_owner_press_on_old_question_is_stale() {
    let owner = 100;
    assert_eq!(classify_press(&answer_id(0, 1), owner, owner, 1), AnswerPress::Stale);
    assert_eq!(classify_press("quiz:x:1", owner, owner, 1), AnswerPress::Stale);
    assert_eq!(classify_press(&answer_id(1, 3), owner, owner, 1), AnswerPress::Answer(3));
}
