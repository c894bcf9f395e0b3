//! Quiz session state machine.
//!
//! `Idle → Loading → Active → Finished`, with `Finished` kept until `reset()`.
//! The machine is synchronous and owns no timers: countdown ticks arrive as
//! [`QuizMachine::tick`] calls tagged with the [`SessionId`] they were started
//! for, so a tick from a timer that should already be gone is rejected instead
//! of being applied to a newer session. [`crate::runner::QuizRunner`] pairs the
//! machine with the actual countdown task.
//!
//! Every rejected call returns a [`SessionError`] and leaves the state as it
//! was.

use std::fmt;

use log::{debug, info, warn};

use crate::error::{FetchFailed, SessionError};
use crate::types::{Difficulty, Question, Subject};
use crate::QUESTIONS_PER_SESSION;

/// Remaining seconds at or below which the clock is shown as a warning.
pub const LOW_TIME_SECS: u32 = 15;

/// Coarse state of the machine, used for guards and for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Active,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading questions",
            Phase::Active => "a session is active",
            Phase::Finished => "the session is finished",
        })
    }
}

/// Identifies one session; countdown events carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Identifies one question fetch; fetch results carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request#{}", self.0)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The last question was answered and advanced past.
    Completed,
    /// The countdown reached zero first.
    Expired,
}

/// One play-through.
///
/// `score` never exceeds [`Session::answered`]. While a session is active,
/// `current_index` is the question on screen; once finished it is the number
/// of questions that were answered.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    subject: Subject,
    difficulty: Difficulty,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    remaining_seconds: u32,
    selected: Option<usize>,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Question on screen, `None` once the session has moved past the end.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Answer chosen for the current question, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Number of questions answered so far.
    pub fn answered(&self) -> usize {
        self.current_index + usize::from(self.selected.is_some())
    }

    /// Fraction of the quiz reached, counting the question on screen.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        let reached = (self.current_index + 1).min(self.questions.len());
        reached as f64 / self.questions.len() as f64
    }

    /// Remaining time as `mm:ss`.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.remaining_seconds / 60, self.remaining_seconds % 60)
    }

    pub fn is_running_low(&self) -> bool {
        self.remaining_seconds <= LOW_TIME_SECS
    }

    /// Folds an answered-but-not-advanced question into `current_index` so a
    /// finished session reports how many questions were answered.
    fn settle(&mut self) {
        if self.selected.take().is_some() {
            self.current_index += 1;
        }
    }
}

/// A finished session and how it ended.
#[derive(Debug, Clone)]
pub struct Outcome {
    session: Session,
    reason: FinishReason,
}

impl Outcome {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reason(&self) -> FinishReason {
        self.reason
    }

    pub fn score(&self) -> usize {
        self.session.score
    }

    pub fn total(&self) -> usize {
        self.session.len()
    }

    /// Score as a whole percentage of all questions, rounded to nearest.
    pub fn percent(&self) -> u32 {
        let total = self.session.len();
        if total == 0 {
            return 0;
        }
        ((self.session.score * 100 + total / 2) / total) as u32
    }
}

/// Result of [`QuizMachine::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The question at `index` is now current.
    Next { index: usize },
    /// That was the last question; the session is finished.
    Finished,
}

/// Result of [`QuizMachine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running { remaining: u32 },
    /// The countdown hit zero and the session is finished.
    Expired,
}

/// Result of [`QuizMachine::resolve_fetch`].
#[derive(Debug)]
pub enum Resolution {
    /// Questions arrived and the session is active.
    Started(SessionId),
    /// The fetch failed; the machine is back to idle and no session exists.
    Failed(FetchFailed),
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Loading {
        request: RequestId,
        subject: Subject,
        difficulty: Difficulty,
    },
    Active(Session),
    Finished(Outcome),
}

/// Owns the session, if any, and enforces every transition rule.
#[derive(Debug, Default)]
pub struct QuizMachine {
    state: State,
    next_session: u64,
    next_request: u64,
}

impl QuizMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::Loading { .. } => Phase::Loading,
            State::Active(_) => Phase::Active,
            State::Finished(_) => Phase::Finished,
        }
    }

    /// The running session; `None` unless [`Phase::Active`].
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            State::Active(session) => Some(session),
            _ => None,
        }
    }

    /// The finished session; `None` unless [`Phase::Finished`].
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            State::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The outstanding fetch, if loading.
    pub fn pending(&self) -> Option<(RequestId, Subject, Difficulty)> {
        match self.state {
            State::Loading { request, subject, difficulty } => Some((request, subject, difficulty)),
            _ => None,
        }
    }

    /// Marks a fetch as outstanding. Only one fetch may be pending at a time.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless idle.
    pub fn begin_loading(
        &mut self,
        subject: Subject,
        difficulty: Difficulty,
    ) -> Result<RequestId, SessionError> {
        self.expect_phase("begin_loading", Phase::Idle)?;
        self.next_request += 1;
        let request = RequestId(self.next_request);
        debug!("{request}: loading {subject} / {difficulty}");
        self.state = State::Loading { request, subject, difficulty };
        Ok(request)
    }

    /// Drops the pending fetch; its result will be rejected as stale.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless loading.
    pub fn cancel_loading(&mut self) -> Result<(), SessionError> {
        self.expect_phase("cancel_loading", Phase::Loading)?;
        if let Some((request, _, _)) = self.pending() {
            debug!("{request}: cancelled");
        }
        self.state = State::Idle;
        Ok(())
    }

    /// Applies the result of the fetch identified by `request`.
    ///
    /// Questions start a session; a failure returns the machine to idle and
    /// hands the error back for display.
    ///
    /// # Errors
    ///
    /// `StaleRequest` if `request` is not the pending one (the machine is not
    /// touched). `NoQuestions` if the result is an empty list; the machine
    /// returns to idle.
    pub fn resolve_fetch(
        &mut self,
        request: RequestId,
        result: Result<Vec<Question>, FetchFailed>,
    ) -> Result<Resolution, SessionError> {
        let (subject, difficulty) = match self.state {
            State::Loading { request: pending, subject, difficulty } if pending == request => {
                (subject, difficulty)
            }
            _ => {
                debug!("{request}: discarding stale fetch result");
                return Err(SessionError::StaleRequest);
            }
        };
        self.state = State::Idle;

        match result {
            Ok(questions) => {
                if questions.len() < QUESTIONS_PER_SESSION {
                    warn!(
                        "{request}: provider returned {} of {} questions, playing a shorter session",
                        questions.len(),
                        QUESTIONS_PER_SESSION
                    );
                }
                self.start(subject, difficulty, questions).map(Resolution::Started)
            }
            Err(err) => {
                warn!("{request}: {err}");
                Ok(Resolution::Failed(err))
            }
        }
    }

    /// Starts a session with `questions`, resetting index and score and
    /// loading the countdown budget for `difficulty`.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless idle or resolving a fetch; `NoQuestions` for an
    /// empty list.
    pub fn start(
        &mut self,
        subject: Subject,
        difficulty: Difficulty,
        questions: Vec<Question>,
    ) -> Result<SessionId, SessionError> {
        if !matches!(self.state, State::Idle | State::Loading { .. }) {
            return Err(self.invalid("start"));
        }
        if questions.is_empty() {
            self.state = State::Idle;
            return Err(SessionError::NoQuestions);
        }

        self.next_session += 1;
        let id = SessionId(self.next_session);
        let remaining_seconds = difficulty.time_budget_secs();
        info!(
            "{id}: started {subject} / {difficulty} with {} questions and {remaining_seconds}s",
            questions.len()
        );
        self.state = State::Active(Session {
            id,
            subject,
            difficulty,
            questions,
            current_index: 0,
            score: 0,
            remaining_seconds,
            selected: None,
        });
        Ok(id)
    }

    /// Records the answer at `answer_index` for the current question and
    /// returns whether it was correct. Does not move to the next question.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless active, `AlreadyAnswered` on a second answer to
    /// the same question, `AnswerOutOfRange` for a bad index.
    pub fn submit_answer(&mut self, answer_index: usize) -> Result<bool, SessionError> {
        let State::Active(session) = &mut self.state else {
            return Err(self.invalid("submit_answer"));
        };
        if session.selected.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        let answers = session
            .current_question()
            .map(Question::answers)
            .unwrap_or_default();
        let answer = answers.get(answer_index).ok_or(SessionError::AnswerOutOfRange {
            index: answer_index,
            len: answers.len(),
        })?;

        let correct = answer.is_correct;
        if correct {
            session.score += 1;
        }
        session.selected = Some(answer_index);
        debug!(
            "{}: question {} answered {}",
            session.id,
            session.current_index + 1,
            if correct { "correctly" } else { "incorrectly" }
        );
        Ok(correct)
    }

    /// Moves past the answered current question, finishing after the last.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless active, `NotAnswered` before an answer is given.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let State::Active(session) = &mut self.state else {
            return Err(self.invalid("advance"));
        };
        if session.selected.is_none() {
            return Err(SessionError::NotAnswered);
        }

        if session.is_last_question() {
            self.finish(FinishReason::Completed);
            return Ok(Advance::Finished);
        }
        session.selected = None;
        session.current_index += 1;
        Ok(Advance::Next { index: session.current_index })
    }

    /// Takes one second off the clock of session `id`, finishing it on zero.
    ///
    /// # Errors
    ///
    /// `StaleTimer` unless `id` is the active session.
    pub fn tick(&mut self, id: SessionId) -> Result<Tick, SessionError> {
        let State::Active(session) = &mut self.state else {
            return Err(SessionError::StaleTimer);
        };
        if session.id != id {
            return Err(SessionError::StaleTimer);
        }

        session.remaining_seconds = session.remaining_seconds.saturating_sub(1);
        if session.remaining_seconds == 0 {
            self.finish(FinishReason::Expired);
            return Ok(Tick::Expired);
        }
        Ok(Tick::Running { remaining: session.remaining_seconds })
    }

    /// Ends session `id` immediately because its countdown ran out.
    ///
    /// # Errors
    ///
    /// `StaleTimer` unless `id` is the active session.
    pub fn on_timer_expired(&mut self, id: SessionId) -> Result<(), SessionError> {
        if !matches!(&self.state, State::Active(session) if session.id == id) {
            return Err(SessionError::StaleTimer);
        }
        self.finish(FinishReason::Expired);
        Ok(())
    }

    /// Discards a finished session and returns to idle.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless finished.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.expect_phase("reset", Phase::Finished)?;
        self.state = State::Idle;
        Ok(())
    }

    /// Leaves a running session or a pending fetch and returns to idle.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless active or loading.
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        match &self.state {
            State::Active(session) => info!("{}: abandoned", session.id),
            State::Loading { request, .. } => debug!("{request}: abandoned"),
            _ => return Err(self.invalid("abandon")),
        }
        self.state = State::Idle;
        Ok(())
    }

    fn finish(&mut self, reason: FinishReason) {
        if let State::Active(mut session) = std::mem::take(&mut self.state) {
            session.settle();
            info!(
                "{}: finished ({reason:?}) with {}/{}",
                session.id,
                session.score,
                session.len()
            );
            self.state = State::Finished(Outcome { session, reason });
        }
    }

    fn expect_phase(&self, op: &'static str, phase: Phase) -> Result<(), SessionError> {
        if self.phase() == phase {
            Ok(())
        } else {
            Err(self.invalid(op))
        }
    }

    fn invalid(&self, op: &'static str) -> SessionError {
        SessionError::InvalidState { op, phase: self.phase() }
    }
}
