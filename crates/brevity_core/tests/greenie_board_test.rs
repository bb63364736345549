//! Tests for greenie board selection and averaging.

use brevity_core::{GREENIE_BOARD_SIZE, GreenieBoard, GreenieGrade, GuildId, QuizResult, UserId};
use chrono::{TimeDelta, TimeZone, Utc};

fn result(day: i64, score: u32, total: u32) -> QuizResult {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    QuizResult::new(
        GuildId(1),
        UserId(7),
        start + TimeDelta::days(day),
        score,
        total,
    )
}

#[test]
fn test_board_keeps_most_recent_ten_oldest_first() {
    // Twelve quizzes, supplied newest-first to make sure ordering is by timestamp
    let results: Vec<_> = (0..12).rev().map(|day| result(day, 5, 5)).collect();

    let board = GreenieBoard::from_results(results);

    assert_eq!(board.entries().len(), GREENIE_BOARD_SIZE);
    let first = board.entries().first().unwrap();
    let last = board.entries().last().unwrap();
    assert_eq!(first.timestamp(), result(2, 5, 5).timestamp());
    assert_eq!(last.timestamp(), result(11, 5, 5).timestamp());
    assert!(
        board
            .entries()
            .windows(2)
            .all(|pair| pair[0].timestamp() < pair[1].timestamp())
    );
}

#[test]
fn test_board_average_covers_only_displayed_entries() {
    // Two old perfect scores fall off the board; the ten shown are all 50%
    let mut results = vec![result(0, 4, 4), result(1, 4, 4)];
    results.extend((2..12).map(|day| result(day, 2, 4)));

    let board = GreenieBoard::from_results(results);

    assert_eq!(board.average(), Some(50.0));
}

#[test]
fn test_average_is_mean_of_percentages() {
    let board = GreenieBoard::from_results(vec![result(0, 1, 3), result(1, 4, 4)]);

    // (33.33 + 100) / 2 = 66.67 -> 66.7
    assert_eq!(board.average(), Some(66.7));
}

#[test]
fn test_empty_board_renders_hint() {
    let board = GreenieBoard::from_results(Vec::new());
    assert_eq!(board.average(), None);
    assert!(board.render().contains("/quiz"));
}

#[test]
fn test_render_shows_grades_and_scores() {
    let board = GreenieBoard::from_results(vec![result(0, 5, 5), result(1, 3, 5), result(2, 1, 5)]);
    let rendered = board.render();

    assert!(rendered.starts_with("🟩🟨🟥"));
    assert!(rendered.contains("5/5 · 3/5 · 1/5"));
    assert!(rendered.contains("over 3 quizzes"));
}

#[test]
fn test_grade_thresholds() {
    assert_eq!(GreenieGrade::from_percentage(80.0), GreenieGrade::Green);
    assert_eq!(GreenieGrade::from_percentage(79.9), GreenieGrade::Yellow);
    assert_eq!(GreenieGrade::from_percentage(50.0), GreenieGrade::Yellow);
    assert_eq!(GreenieGrade::from_percentage(0.0), GreenieGrade::Red);
}

#[test]
fn test_score_capped_at_total() {
    let r = result(0, 9, 5);
    assert_eq!(*r.score(), 5);
    assert_eq!(r.percentage(), 100.0);
}
