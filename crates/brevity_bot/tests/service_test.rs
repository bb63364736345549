mod test_utils;

use brevity_core::{ChannelId, GuildId, QuizResult, Term, UserId};
use brevity_error::{BrevityErrorKind, InputErrorKind, TermsErrorKind};
use chrono::{TimeDelta, Utc};
use test_utils::{Fixture, quiz_terms, sample_terms};

#[tokio::test]
async fn test_setup_creates_enabled_config() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();

    let config = service
        .setup(GuildId(1), ChannelId(10))
        .await
        .expect("setup");

    assert_eq!(*config.channel_id(), ChannelId(10));
    assert!(*config.posting_enabled());
    assert_eq!(*config.frequency_hours(), 24);
    assert_eq!(*config.last_posted(), None);
}

#[tokio::test]
async fn test_setup_again_only_moves_channel() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();
    let guild = GuildId(2);

    service.setup(guild, ChannelId(10)).await.expect("setup");
    service.set_frequency(guild, 6).await.expect("frequency");
    service.set_posting(guild, false).await.expect("disable");
    let config = service.setup(guild, ChannelId(11)).await.expect("setup");

    assert_eq!(*config.channel_id(), ChannelId(11));
    assert_eq!(*config.frequency_hours(), 6);
    assert!(!*config.posting_enabled());
}

#[tokio::test]
async fn test_configuration_requires_setup() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();

    for err in [
        service.set_posting(GuildId(3), true).await.unwrap_err(),
        service.set_frequency(GuildId(3), 12).await.unwrap_err(),
    ] {
        match err.kind() {
            BrevityErrorKind::Input(e) => assert_eq!(*e.kind(), InputErrorKind::NotConfigured),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.user_message().contains("/setup"));
    }
}

#[tokio::test]
async fn test_set_frequency_rejects_zero() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();
    service.setup(GuildId(4), ChannelId(1)).await.expect("setup");

    let err = service.set_frequency(GuildId(4), 0).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        BrevityErrorKind::Input(e) if matches!(e.kind(), InputErrorKind::OutOfRange { .. })
    ));
    let config = service.status(GuildId(4)).await.expect("status").expect("configured");
    assert_eq!(*config.frequency_hours(), 24);
}

#[tokio::test]
async fn test_next_term_rotates_for_the_guild() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();
    service.setup(GuildId(5), ChannelId(1)).await.expect("setup");

    let now = Utc::now();
    let first = service.next_term(GuildId(5), now).await.expect("term");
    let second = service.next_term(GuildId(5), now).await.expect("term");

    assert_ne!(first.id(), second.id());
    let config = service.status(GuildId(5)).await.expect("status").expect("configured");
    assert_eq!(*config.last_posted(), Some(now));
}

#[tokio::test]
async fn test_define_finds_by_name_and_prefix() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();

    assert_eq!(service.define("winchester").expect("found").name(), "Winchester");
    assert_eq!(service.define("Jok").expect("found").name(), "Joker");

    let err = service.define("pigeons").unwrap_err();
    match err.kind() {
        BrevityErrorKind::Terms(e) => {
            assert_eq!(e.kind, TermsErrorKind::NotFound("pigeons".to_string()))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_define_with_empty_cache() {
    let fixture = Fixture::new(Vec::new());
    let err = fixture.service().define("bogey").unwrap_err();
    assert!(err.user_message().contains("/reloadterms"));
}

#[tokio::test]
async fn test_reload_terms_replaces_cache() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();
    fixture
        .source
        .set_terms(vec![Term::new("Bingo", "Fuel state needed for recovery.")]);

    let count = service.reload_terms().await.expect("reload");

    assert_eq!(count, 1);
    assert!(service.define("bogey").is_err());
    assert_eq!(service.define("bingo").expect("found").name(), "Bingo");
}

#[tokio::test]
async fn test_reload_failure_keeps_terms() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();
    fixture.source.set_failing();

    let err = service.reload_terms().await.unwrap_err();

    assert!(matches!(err.kind(), BrevityErrorKind::Source(_)));
    assert_eq!(service.cache().len(), 3);
}

#[tokio::test]
async fn test_quiz_round_trip_reaches_greenie_board() {
    let fixture = Fixture::new(quiz_terms());
    let service = fixture.service();
    let (guild, user) = (GuildId(6), UserId(60));

    let settings = service.quiz_settings(Some(4), Some("private"), Some(10)).expect("settings");
    let mut session = service.start_quiz(guild, user, settings).expect("session");
    for index in 0..2 {
        let correct = *session.questions()[index].correct_index();
        session.answer(index, correct).expect("answer");
    }

    let result = service.record_quiz(&session, Utc::now()).await.expect("record");
    assert_eq!((*result.score(), *result.total()), (2, 4));

    let board = service.greenie_board(guild, user).await.expect("board");
    assert_eq!(board.entries().len(), 1);
    assert_eq!(board.average(), Some(50.0));
}

#[tokio::test]
async fn test_greenie_board_shows_latest_ten_oldest_first() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();
    let (guild, user) = (GuildId(7), UserId(70));
    let start = Utc::now() - TimeDelta::days(30);

    // Twelve quizzes scoring 0/4, 1/4, 2/4, 3/4, 4/4, 0/4, ...
    for day in 0..12u32 {
        let result = QuizResult::new(
            guild,
            user,
            start + TimeDelta::days(i64::from(day)),
            day % 5,
            4,
        );
        fixture.repo.record_quiz_result(&result).await.expect("record");
    }

    let board = service.greenie_board(guild, user).await.expect("board");
    let scores: Vec<u32> = board.entries().iter().map(|r| *r.score()).collect();
    assert_eq!(scores, vec![2, 3, 4, 0, 1, 2, 3, 4, 0, 1]);
    // (50 + 75 + 100 + 0 + 25 + 50 + 75 + 100 + 0 + 25) / 10
    assert_eq!(board.average(), Some(50.0));
    let first = board.entries().first().expect("entry");
    assert_eq!(*first.timestamp(), start + TimeDelta::days(2));
}

#[tokio::test]
async fn test_greenie_board_is_per_guild() {
    let fixture = Fixture::new(sample_terms());
    let service = fixture.service();
    let user = UserId(80);
    let result = QuizResult::new(GuildId(8), user, Utc::now(), 3, 5);
    fixture.repo.record_quiz_result(&result).await.expect("record");

    let board = service.greenie_board(GuildId(9), user).await.expect("board");
    assert!(board.entries().is_empty());
    assert_eq!(board.average(), None);
}
