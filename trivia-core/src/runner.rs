//! Couples the state machine with its countdown.
//!
//! [`QuizRunner`] is the only owner of a [`Countdown`]. Each operation notes
//! which session is active before and after delegating: a new active session
//! replaces any countdown with a fresh one, and no active session stops it.
//! Callers never start or stop timers themselves.

use tokio::sync::mpsc::UnboundedSender;

use crate::countdown::{Countdown, CountdownEvent};
use crate::error::{FetchFailed, SessionError};
use crate::machine::{Advance, Outcome, Phase, QuizMachine, RequestId, Resolution, Session};
use crate::types::{Difficulty, Question, Subject};

/// Drives a [`QuizMachine`] and keeps exactly one countdown alive while a
/// session is active.
///
/// `E` is the caller's event type; countdown events are sent on `events`
/// converted with `From<CountdownEvent>`.
#[derive(Debug)]
pub struct QuizRunner<E> {
    machine: QuizMachine,
    countdown: Option<Countdown>,
    events: UnboundedSender<E>,
}

impl<E> QuizRunner<E>
where
    E: From<CountdownEvent> + Send + 'static,
{
    pub fn new(events: UnboundedSender<E>) -> Self {
        Self { machine: QuizMachine::new(), countdown: None, events }
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn session(&self) -> Option<&Session> {
        self.machine.session()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.machine.outcome()
    }

    /// True while a countdown task is held (and has not run out).
    pub fn countdown_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(|c| !c.is_finished())
    }

    /// See [`QuizMachine::begin_loading`].
    pub fn begin_loading(
        &mut self,
        subject: Subject,
        difficulty: Difficulty,
    ) -> Result<RequestId, SessionError> {
        self.machine.begin_loading(subject, difficulty)
    }

    /// See [`QuizMachine::cancel_loading`].
    pub fn cancel_loading(&mut self) -> Result<(), SessionError> {
        self.machine.cancel_loading()
    }

    /// See [`QuizMachine::resolve_fetch`]. Starts the countdown on success.
    pub fn resolve_fetch(
        &mut self,
        request: RequestId,
        result: Result<Vec<Question>, FetchFailed>,
    ) -> Result<Resolution, SessionError> {
        self.transition(|m| m.resolve_fetch(request, result))
    }

    /// See [`QuizMachine::start`]. Starts the countdown on success.
    pub fn start(
        &mut self,
        subject: Subject,
        difficulty: Difficulty,
        questions: Vec<Question>,
    ) -> Result<(), SessionError> {
        self.transition(|m| m.start(subject, difficulty, questions)).map(|_| ())
    }

    /// See [`QuizMachine::submit_answer`].
    pub fn submit_answer(&mut self, answer_index: usize) -> Result<bool, SessionError> {
        self.machine.submit_answer(answer_index)
    }

    /// See [`QuizMachine::advance`]. Stops the countdown after the last question.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        self.transition(QuizMachine::advance)
    }

    /// Applies a countdown event. Events for any session other than the active
    /// one are dropped.
    ///
    /// Returns the phase after the event so the caller can react to expiry.
    pub fn handle_countdown(&mut self, event: CountdownEvent) -> Phase {
        let applied = self.transition(|m| match event {
            CountdownEvent::Tick { session, .. } => m.tick(session).map(|_| ()),
            CountdownEvent::Expired { session } => m.on_timer_expired(session),
        });
        if let Err(err) = applied {
            log::debug!("dropping countdown event {event:?}: {err}");
        }
        self.machine.phase()
    }

    /// See [`QuizMachine::reset`].
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.transition(QuizMachine::reset)
    }

    /// See [`QuizMachine::abandon`]. Stops the countdown.
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        self.transition(QuizMachine::abandon)
    }

    /// Runs `op` and reconciles the countdown with the resulting phase.
    fn transition<T>(
        &mut self,
        op: impl FnOnce(&mut QuizMachine) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let before = self.machine.session().map(Session::id);
        let result = op(&mut self.machine);
        let after = self.machine.session().map(|s| (s.id(), s.remaining_seconds()));

        match after {
            Some((id, _)) if before == Some(id) => {}
            Some((id, seconds)) => {
                // Stop the old countdown before the new one exists.
                self.countdown = None;
                self.countdown = Some(Countdown::start(id, seconds, self.events.clone()));
            }
            None => {
                self.countdown = None;
            }
        }
        result
    }
}
