//! Timing tests for the countdown task and the runner that owns it.
//!
//! Run on a paused tokio clock: the runtime auto-advances time whenever every
//! task is idle, so a 60-second countdown completes instantly and
//! deterministically.

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver};
use trivia_core::countdown::{Countdown, CountdownEvent};
use trivia_core::machine::{FinishReason, Phase, QuizMachine, SessionId};
use trivia_core::runner::QuizRunner;
use trivia_core::types::{Answer, Difficulty, Question, Subject};

fn questions(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| {
            Question::new(
                format!("q{i}"),
                vec![Answer::correct("yes"), Answer::incorrect("no")],
            )
            .unwrap()
        })
        .collect()
}

/// Session ids are only minted by the machine.
fn session_id() -> SessionId {
    QuizMachine::new()
        .start(Subject::Html, Difficulty::Hard, questions(1))
        .unwrap()
}

async fn drain_until_expired(rx: &mut UnboundedReceiver<CountdownEvent>) -> Vec<CountdownEvent> {
    let mut seen = Vec::new();
    while let Some(event) = rx.recv().await {
        let done = matches!(event, CountdownEvent::Expired { .. });
        seen.push(event);
        if done {
            break;
        }
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn emits_exactly_d_ticks_then_expires() {
    let id = session_id();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let started = tokio::time::Instant::now();
    let _countdown = Countdown::start(id, 5, tx);

    let events = drain_until_expired(&mut rx).await;

    let expected: Vec<CountdownEvent> = (0..5)
        .rev()
        .map(|remaining| CountdownEvent::Tick { session: id, remaining })
        .chain(std::iter::once(CountdownEvent::Expired { session: id }))
        .collect();
    assert_eq!(events, expected);
    assert_eq!(started.elapsed(), Duration::from_secs(5));

    // The task ends after expiring; nothing else arrives.
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn zero_duration_expires_without_ticks() {
    let id = session_id();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _countdown = Countdown::start(id, 0, tx);

    assert_eq!(rx.recv().await, Some(CountdownEvent::Expired { session: id }));
    assert!(rx.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn stop_ends_the_stream() {
    let id = session_id();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let countdown = Countdown::start(id, 30, tx);

    assert_eq!(rx.recv().await, Some(CountdownEvent::Tick { session: id, remaining: 29 }));
    assert_eq!(rx.recv().await, Some(CountdownEvent::Tick { session: id, remaining: 28 }));
    countdown.stop();

    // The aborted task drops its sender, closing the channel.
    assert!(rx.recv().await.is_none());
}

#[derive(Debug)]
enum TestEvent {
    Countdown(CountdownEvent),
}

impl From<CountdownEvent> for TestEvent {
    fn from(event: CountdownEvent) -> Self {
        TestEvent::Countdown(event)
    }
}

/// Feeds every queued countdown event back into the runner, as the app's
/// event loop does, until the session is no longer active.
async fn pump(runner: &mut QuizRunner<TestEvent>, rx: &mut UnboundedReceiver<TestEvent>) {
    while runner.phase() == Phase::Active {
        let Some(TestEvent::Countdown(event)) = rx.recv().await else {
            break;
        };
        runner.handle_countdown(event);
    }
}

#[tokio::test(start_paused = true)]
async fn runner_expires_a_hard_session_after_sixty_seconds() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runner = QuizRunner::new(tx);
    let started = tokio::time::Instant::now();

    runner.start(Subject::Css, Difficulty::Hard, questions(10)).unwrap();
    assert!(runner.countdown_running());
    runner.submit_answer(0).unwrap();
    runner.advance().unwrap();

    pump(&mut runner, &mut rx).await;

    assert_eq!(started.elapsed(), Duration::from_secs(60));
    let outcome = runner.outcome().unwrap();
    assert_eq!(outcome.reason(), FinishReason::Expired);
    assert_eq!(outcome.score(), 1);
    assert!(!runner.countdown_running());
}

#[tokio::test(start_paused = true)]
async fn completing_the_quiz_stops_the_countdown() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runner = QuizRunner::new(tx);
    runner.start(Subject::Html, Difficulty::Easy, questions(2)).unwrap();

    // Let a couple of seconds pass.
    for _ in 0..2 {
        let Some(TestEvent::Countdown(event)) = rx.recv().await else {
            panic!("channel closed early");
        };
        runner.handle_countdown(event);
    }
    assert_eq!(runner.session().unwrap().remaining_seconds(), 118);

    for _ in 0..2 {
        runner.submit_answer(0).unwrap();
        runner.advance().unwrap();
    }
    assert_eq!(runner.phase(), Phase::Finished);
    assert!(!runner.countdown_running());

    tokio::time::sleep(Duration::from_secs(300)).await;
    // The runner still holds a sender, so the channel stays open but empty.
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn ticks_from_an_abandoned_session_do_not_reach_the_next_one() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut runner = QuizRunner::new(tx);

    runner.start(Subject::Html, Difficulty::Medium, questions(3)).unwrap();
    let Some(TestEvent::Countdown(stale)) = rx.recv().await else {
        panic!("channel closed early");
    };
    runner.abandon().unwrap();
    assert!(!runner.countdown_running());

    runner.start(Subject::Html, Difficulty::Hard, questions(3)).unwrap();
    assert_eq!(runner.handle_countdown(stale), Phase::Active);
    assert_eq!(runner.session().unwrap().remaining_seconds(), 60);

    let Some(TestEvent::Countdown(fresh)) = rx.recv().await else {
        panic!("channel closed early");
    };
    assert_eq!(fresh.session(), runner.session().unwrap().id());
    runner.handle_countdown(fresh);
    assert_eq!(runner.session().unwrap().remaining_seconds(), 59);
}
