//! End-to-end quiz sessions over the mock question source.

use std::collections::BTreeSet;
use std::sync::Arc;

use quizkit_core::{
    Aggregator, Choice, Gateway, Phase, Question, SelectionMode, Session, Shuffler,
    SourceCatalog, SourceSelection, TestLength,
};
use quizkit_sources::mock::MockSource;

fn session_over(source: MockSource, seed: u64) -> (Session, Arc<MockSource>) {
    let source = Arc::new(source);
    let gateway = Gateway::new(source.clone(), SourceCatalog::default());
    let session = Session::new(Aggregator::new(gateway), Shuffler::seeded(seed));
    (session, source)
}

fn question(id: &str, correct: &[bool]) -> Question {
    Question {
        id: id.into(),
        source: "Nautical Institute".into(),
        text: format!("{id}?"),
        choices: correct
            .iter()
            .enumerate()
            .map(|(i, &ok)| Choice::new(format!("{}", (b'A' + i as u8) as char), ok))
            .collect(),
    }
}

fn select(session: &mut Session, indices: &BTreeSet<usize>) {
    for &i in indices {
        session.toggle_choice(i);
    }
}

fn wrong_choice(question: &Question) -> usize {
    question
        .choices
        .iter()
        .position(|c| !c.is_correct)
        .expect("question has an incorrect choice")
}

#[tokio::test]
async fn failed_source_runs_on_fallback_questions() {
    let (mut session, source) = session_over(MockSource::new().failing("K"), 11);

    session
        .start(SourceSelection::Named("K".into()), TestLength::default())
        .await
        .unwrap();
    assert_eq!(source.call_count(), 1);
    assert_eq!(session.phase(), Phase::InProgress);
    assert_eq!(session.len(), 5);
    assert_eq!(session.fallback_sources(), ["K".to_string()]);
    assert!(session.questions().iter().all(|q| q.source == "Kelson"));

    // First question answered correctly.
    let correct = session.current_question().unwrap().correct_indices();
    select(&mut session, &correct);
    assert!(session.confirm().unwrap().is_correct);
    session.next();

    // Second question answered incorrectly.
    let wrong = wrong_choice(session.current_question().unwrap());
    session.toggle_choice(wrong);
    assert!(!session.confirm().unwrap().is_correct);

    for _ in 0..3 {
        session.next();
    }
    assert_eq!(session.cursor(), Some(4));
    assert!(session.confirm().is_none());
    assert_eq!(session.answered_count(), 2);

    session.finish();
    assert_eq!(session.phase(), Phase::Results);
    assert_eq!(session.correct_count(), 1);
    assert_eq!(session.answered_count(), 2);
    assert!((session.score() - 0.2).abs() < f64::EPSILON);

    let report = session.report().unwrap();
    assert_eq!(report.total, 5);
    assert_eq!(report.unanswered(), 3);
    assert_eq!(report.fallback_sources, vec!["K".to_string()]);
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn multi_answer_question_needs_the_exact_set() {
    let source = MockSource::new().with_questions(
        "NI",
        &[question("NI-1", &[true, true, false, true, false])],
    );
    let (mut session, _) = session_over(source, 3);
    session
        .start(SourceSelection::Named("NI".into()), TestLength::All)
        .await
        .unwrap();
    assert_eq!(session.selection_mode(), Some(SelectionMode::Multiple));

    select(&mut session, &BTreeSet::from([0, 1]));
    assert!(!session.confirm().unwrap().is_correct);

    session
        .start(SourceSelection::Named("NI".into()), TestLength::All)
        .await
        .unwrap();
    assert_eq!(session.answered_count(), 0);
    select(&mut session, &BTreeSet::from([0, 1, 3]));
    assert!(session.confirm().unwrap().is_correct);
}

#[tokio::test]
async fn all_sources_mix_fetched_and_fallback_sets() {
    let source = MockSource::new()
        .with_questions(
            "NI",
            &[question("NI-1", &[true, false]), question("NI-2", &[false, true])],
        )
        .failing("K");
    let (mut session, source) = session_over(source, 5);

    session
        .start(SourceSelection::All, TestLength::All)
        .await
        .unwrap();

    assert_eq!(session.len(), 2 + 5 + 5);
    assert_eq!(
        session.fallback_sources(),
        ["K".to_string(), "EX".to_string()]
    );
    let mut requested = source.requests();
    requested.sort();
    assert_eq!(requested, vec!["EX", "K", "NI"]);

    let ids: BTreeSet<_> = session.questions().iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids.len(), 12);
    assert!(ids.contains("NI-1") && ids.contains("K-001") && ids.contains("EX-005"));
}

#[tokio::test]
async fn same_seed_gives_same_order() {
    let questions: Vec<_> = (1..=20)
        .map(|i| question(&format!("NI-{i}"), &[true, false]))
        .collect();

    let mut orders = Vec::new();
    for _ in 0..2 {
        let (mut session, _) =
            session_over(MockSource::new().with_questions("NI", &questions), 42);
        session
            .start(SourceSelection::Named("NI".into()), TestLength::Limited(10))
            .await
            .unwrap();
        assert_eq!(session.len(), 10);
        orders.push(
            session
                .questions()
                .iter()
                .map(|q| q.id.clone())
                .collect::<Vec<_>>(),
        );
    }
    assert_eq!(orders[0], orders[1]);
}

#[tokio::test]
async fn review_walks_back_over_recorded_answers() {
    let source = MockSource::new().with_questions(
        "EX",
        &[question("EX-1", &[true, false]), question("EX-2", &[false, true])],
    );
    let (mut session, _) = session_over(source, 9);
    session
        .start(SourceSelection::Named("EX".into()), TestLength::All)
        .await
        .unwrap();

    let correct = session.current_question().unwrap().correct_indices();
    select(&mut session, &correct);
    session.confirm();
    session.finish();

    session.review();
    assert_eq!(session.phase(), Phase::InProgress);
    assert_eq!(session.cursor(), Some(0));
    assert!(session.is_locked());
    assert_eq!(session.pending_selection(), Some(&correct));

    session.next();
    assert!(!session.is_locked());
    session.finish();
    assert_eq!(session.correct_count(), 1);

    session.reset();
    assert_eq!(session.phase(), Phase::Setup);
    assert!(session.report().is_none());
}
