//! Central application state for trivia.
//!
//! `AppState` holds presentation state only: which screen is shown, menu and
//! answer cursors, the help overlay, a one-line notice, and the animated
//! results counter. Everything about the quiz itself lives in the
//! [`QuizRunner`]; this module calls its operations and moves between
//! screens according to the outcome. No ratatui rendering logic lives here.

use tokio::sync::mpsc::UnboundedSender;
use trivia_core::countdown::CountdownEvent;
use trivia_core::error::{FetchFailed, SessionError};
use trivia_core::machine::{Advance, Phase, RequestId, Resolution};
use trivia_core::runner::QuizRunner;
use trivia_core::types::{Difficulty, Question, Subject};

use crate::event::AppEvent;
use crate::fetch::FetchRequest;

/// Percentage points the results counter climbs per logic tick (250 ms).
pub const PERCENT_STEP: u32 = 12;

/// Score percentage above which the results screen celebrates.
pub const CELEBRATE_ABOVE: u32 = 70;

/// Which screen is on display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Home,
    Subject,
    Level,
    Quiz,
    Results,
}

impl Screen {
    pub fn label(self) -> &'static str {
        match self {
            Screen::Home => "HOME",
            Screen::Subject => "SUBJECT",
            Screen::Level => "LEVEL",
            Screen::Quiz => "QUIZ",
            Screen::Results => "RESULTS",
        }
    }
}

/// Overlay mode layered over the current screen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Full-screen help overlay is shown above the screen.
    HelpOverlay,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    pub screen: Screen,
    pub mode: Mode,
    /// Vertical scroll offset of the help overlay.
    pub help_scroll: u16,

    /// Cursor on the subject menu, index into `Subject::ALL`.
    pub subject_cursor: usize,
    /// Cursor on the level menu, index into `Difficulty::ALL`.
    pub level_cursor: usize,
    /// Cursor on the current question's answers.
    pub answer_cursor: usize,
    /// Subject picked on the subject screen.
    pub subject: Subject,

    /// One-line message shown in the status bar (e.g. a failed fetch).
    pub notice: Option<String>,
    /// Percentage currently displayed on the results screen; climbs to the
    /// real score on logic ticks.
    pub shown_percent: u32,

    pub runner: QuizRunner<AppEvent>,
    /// Queue to the fetch worker. `None` until the worker is spawned.
    pub fetch_tx: Option<UnboundedSender<FetchRequest>>,
}

impl AppState {
    /// Creates the state on the home screen. Countdown events are sent on `events`.
    pub fn new(events: UnboundedSender<AppEvent>) -> Self {
        Self {
            screen: Screen::default(),
            mode: Mode::default(),
            help_scroll: 0,
            subject_cursor: 0,
            level_cursor: 0,
            answer_cursor: 0,
            subject: Subject::Html,
            notice: None,
            shown_percent: 0,
            runner: QuizRunner::new(events),
            fetch_tx: None,
        }
    }

    pub fn with_fetcher(mut self, fetch_tx: UnboundedSender<FetchRequest>) -> Self {
        self.fetch_tx = Some(fetch_tx);
        self
    }

    /// True while questions are being fetched; session controls are gated.
    pub fn is_loading(&self) -> bool {
        self.runner.phase() == Phase::Loading
    }

    /// Home → subject selection.
    pub fn open_subjects(&mut self) {
        self.notice = None;
        self.screen = Screen::Subject;
    }

    /// Moves the cursor of the current menu (or answer list) by `delta`, clamped.
    pub fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.screen {
            Screen::Subject => (&mut self.subject_cursor, Subject::ALL.len()),
            Screen::Level => (&mut self.level_cursor, Difficulty::ALL.len()),
            Screen::Quiz => {
                let len = self
                    .runner
                    .session()
                    .and_then(|s| s.current_question())
                    .map_or(0, |q| q.answers().len());
                (&mut self.answer_cursor, len)
            }
            Screen::Home | Screen::Results => return,
        };
        if len == 0 {
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Picks the subject at `index` (or under the cursor) and moves to level selection.
    pub fn choose_subject(&mut self, index: Option<usize>) {
        let index = index.unwrap_or(self.subject_cursor);
        let Some(&subject) = Subject::ALL.get(index) else {
            return;
        };
        self.subject_cursor = index;
        self.subject = subject;
        self.notice = None;
        self.screen = Screen::Level;
    }

    /// Picks the level at `index` (or under the cursor) and starts fetching.
    pub fn choose_level(&mut self, index: Option<usize>) {
        let index = index.unwrap_or(self.level_cursor);
        let Some(&difficulty) = Difficulty::ALL.get(index) else {
            return;
        };
        self.level_cursor = index;
        self.notice = None;

        let request = match self.runner.begin_loading(self.subject, difficulty) {
            Ok(request) => request,
            Err(err) => {
                log::debug!("ignoring level choice: {err}");
                return;
            }
        };
        let job = FetchRequest { request, subject: self.subject, difficulty };
        let queued = self.fetch_tx.as_ref().is_some_and(|tx| tx.send(job).is_ok());
        if !queued {
            log::error!("{request}: fetch worker is not running");
            if let Err(err) = self.runner.cancel_loading() {
                log::debug!("{request}: could not leave loading: {err}");
            }
            self.notice = Some("Question service is unavailable".to_owned());
        }
    }

    /// Backs out of a pending fetch; its result will be discarded.
    pub fn cancel_loading(&mut self) {
        if self.runner.cancel_loading().is_ok() {
            self.notice = Some("Loading cancelled".to_owned());
        }
    }

    /// Applies a fetch result from the worker.
    pub fn apply_fetch(&mut self, request: RequestId, result: Result<Vec<Question>, FetchFailed>) {
        match self.runner.resolve_fetch(request, result) {
            Ok(Resolution::Started(_)) => {
                self.answer_cursor = 0;
                self.notice = None;
                self.screen = Screen::Quiz;
            }
            Ok(Resolution::Failed(err)) => {
                self.notice = Some(format!("Could not load questions: {}", err.summary()));
                self.screen = Screen::Level;
            }
            Err(SessionError::StaleRequest) => {}
            Err(err) => {
                self.notice = Some(format!("Could not start the quiz: {err}"));
                self.screen = Screen::Level;
            }
        }
    }

    /// Submits the answer at `index` for the current question.
    pub fn answer(&mut self, index: usize) {
        match self.runner.submit_answer(index) {
            Ok(_) => self.answer_cursor = index,
            Err(err) => log::debug!("answer {index} rejected: {err}"),
        }
    }

    /// Submits the answer under the cursor.
    pub fn answer_selected(&mut self) {
        self.answer(self.answer_cursor);
    }

    /// Moves to the next question, or to the results after the last one.
    pub fn next_question(&mut self) {
        match self.runner.advance() {
            Ok(Advance::Next { .. }) => self.answer_cursor = 0,
            Ok(Advance::Finished) => self.show_results(),
            Err(err) => log::debug!("advance rejected: {err}"),
        }
    }

    /// Routes a countdown step to the runner; shows the results on expiry.
    pub fn handle_countdown(&mut self, event: CountdownEvent) {
        if self.runner.handle_countdown(event) == Phase::Finished && self.screen == Screen::Quiz {
            self.show_results();
        }
    }

    /// Logic tick: advances the results counter animation.
    pub fn on_tick(&mut self) {
        if self.screen != Screen::Results {
            return;
        }
        let target = self.runner.outcome().map_or(0, |o| o.percent());
        self.shown_percent = (self.shown_percent + PERCENT_STEP).min(target);
    }

    /// True when the final score deserves a celebration line.
    pub fn celebrate(&self) -> bool {
        self.runner.outcome().is_some_and(|o| o.percent() > CELEBRATE_ABOVE)
    }

    /// Results → subject selection for another round.
    pub fn play_again(&mut self) {
        if let Err(err) = self.runner.reset() {
            log::debug!("play again rejected: {err}");
            return;
        }
        self.screen = Screen::Subject;
    }

    /// Returns to the home screen from anywhere, discarding any session.
    pub fn go_home(&mut self) {
        let discarded = match self.runner.phase() {
            Phase::Active | Phase::Loading => self.runner.abandon(),
            Phase::Finished => self.runner.reset(),
            Phase::Idle => Ok(()),
        };
        if let Err(err) = discarded {
            log::warn!("could not discard session: {err}");
        }
        self.answer_cursor = 0;
        self.screen = Screen::Home;
    }

    fn show_results(&mut self) {
        self.shown_percent = 0;
        self.screen = Screen::Results;
    }
}
