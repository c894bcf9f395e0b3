//! End-to-end scenarios for the session state machine.
//!
//! Exercises: start, submit_answer, advance, tick, on_timer_expired,
//! begin_loading / resolve_fetch, reset.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trivia_core::error::{FetchFailed, SessionError};
use trivia_core::machine::{Advance, FinishReason, Phase, QuizMachine, Resolution, Tick};
use trivia_core::provider::parse_response;
use trivia_core::shuffle::arrange;
use trivia_core::types::{Answer, Difficulty, Question, Subject};

fn ten_questions() -> Vec<Question> {
    (0..10)
        .map(|i| {
            let answers = arrange(
                Answer::correct(format!("right {i}")),
                vec![
                    Answer::incorrect("wrong a"),
                    Answer::incorrect("wrong b"),
                    Answer::incorrect("wrong c"),
                ],
            );
            Question::new(format!("question {i}"), answers).unwrap()
        })
        .collect()
}

fn correct_index(m: &QuizMachine) -> usize {
    m.session().unwrap().current_question().unwrap().correct_index()
}

/// A real `FetchFailed` value, produced the same way the provider does.
fn fetch_failure() -> FetchFailed {
    parse_response(r#"{"response_code": 0, "results": []}"#, &mut StdRng::seed_from_u64(1))
        .unwrap_err()
}

#[test]
fn easy_html_session_starts_with_two_minutes() {
    let mut m = QuizMachine::new();
    m.start("HTML".parse().unwrap(), "easy".parse().unwrap(), ten_questions())
        .unwrap();

    let s = m.session().unwrap();
    assert_eq!(m.phase(), Phase::Active);
    assert_eq!(s.remaining_seconds(), 120);
    assert_eq!(s.current_index(), 0);
    assert_eq!(s.len(), 10);
}

#[test]
fn all_correct_answers_score_ten() {
    let mut m = QuizMachine::new();
    m.start(Subject::Html, Difficulty::Easy, ten_questions()).unwrap();

    for i in 0..10 {
        let idx = correct_index(&m);
        assert_eq!(m.submit_answer(idx), Ok(true));
        let advanced = m.advance().unwrap();
        if i < 9 {
            assert_eq!(advanced, Advance::Next { index: i + 1 });
        } else {
            assert_eq!(advanced, Advance::Finished);
        }
    }

    let outcome = m.outcome().unwrap();
    assert_eq!(m.phase(), Phase::Finished);
    assert_eq!(outcome.score(), 10);
    assert_eq!(outcome.percent(), 100);
    assert_eq!(outcome.reason(), FinishReason::Completed);
}

#[test]
fn hard_session_expires_with_partial_score() {
    let mut m = QuizMachine::new();
    let id = m.start(Subject::JavaScript, Difficulty::Hard, ten_questions()).unwrap();
    assert_eq!(m.session().unwrap().remaining_seconds(), 60);

    // Three right, one wrong, then the clock runs out.
    for _ in 0..3 {
        let idx = correct_index(&m);
        m.submit_answer(idx).unwrap();
        m.advance().unwrap();
    }
    let wrong = (correct_index(&m) + 1) % 4;
    m.submit_answer(wrong).unwrap();
    m.advance().unwrap();

    let mut last = Tick::Running { remaining: 60 };
    while m.phase() == Phase::Active {
        last = m.tick(id).unwrap();
    }
    assert_eq!(last, Tick::Expired);

    let outcome = m.outcome().unwrap();
    assert_eq!(outcome.reason(), FinishReason::Expired);
    assert_eq!(outcome.score(), 3);
    assert_eq!(outcome.total(), 10);
    assert_eq!(outcome.percent(), 30);

    assert!(matches!(m.submit_answer(0), Err(SessionError::InvalidState { .. })));
    assert!(matches!(m.advance(), Err(SessionError::InvalidState { .. })));
}

#[test]
fn expiry_forces_finish_at_any_index() {
    for stop_at in 0..10 {
        let mut m = QuizMachine::new();
        let id = m.start(Subject::Css, Difficulty::Medium, ten_questions()).unwrap();
        for _ in 0..stop_at {
            let idx = correct_index(&m);
            m.submit_answer(idx).unwrap();
            m.advance().unwrap();
        }
        m.on_timer_expired(id).unwrap();

        let outcome = m.outcome().unwrap();
        assert_eq!(outcome.score(), stop_at);
        assert_eq!(outcome.session().current_index(), stop_at);
    }
}

#[test]
fn score_never_exceeds_progress() {
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..200 {
        let mut m = QuizMachine::new();
        m.start(Subject::Html, Difficulty::Easy, ten_questions()).unwrap();

        while m.phase() == Phase::Active {
            let answer = rng.random_range(0..4);
            m.submit_answer(answer).unwrap();
            let s = m.session().unwrap();
            assert!(s.score() <= s.answered());

            if m.advance().unwrap() == Advance::Finished {
                break;
            }
            let s = m.session().unwrap();
            assert!(s.score() <= s.current_index());
        }

        let outcome = m.outcome().unwrap();
        assert!(outcome.score() <= outcome.session().current_index());
    }
}

#[test]
fn fetch_failure_returns_to_a_pre_session_state() {
    let mut m = QuizMachine::new();
    let request = m.begin_loading(Subject::Html, Difficulty::Easy).unwrap();

    let resolution = m.resolve_fetch(request, Err(fetch_failure())).unwrap();
    assert!(matches!(resolution, Resolution::Failed(_)));
    assert_eq!(m.phase(), Phase::Idle);
    assert!(m.session().is_none());

    // The user can pick a level again.
    assert!(m.begin_loading(Subject::Html, Difficulty::Medium).is_ok());
}

#[test]
fn result_arriving_after_abandon_is_discarded() {
    let mut m = QuizMachine::new();
    let request = m.begin_loading(Subject::Css, Difficulty::Easy).unwrap();
    m.abandon().unwrap();

    assert_eq!(
        m.resolve_fetch(request, Ok(ten_questions())).unwrap_err(),
        SessionError::StaleRequest
    );
    assert_eq!(m.phase(), Phase::Idle);
}

#[test]
fn play_again_after_reset() {
    let mut m = QuizMachine::new();
    let id = m.start(Subject::Html, Difficulty::Easy, ten_questions()).unwrap();
    m.on_timer_expired(id).unwrap();
    m.reset().unwrap();

    let next = m.start(Subject::Css, Difficulty::Hard, ten_questions()).unwrap();
    assert_ne!(id, next);
    let s = m.session().unwrap();
    assert_eq!(s.score(), 0);
    assert_eq!(s.remaining_seconds(), 60);
}
