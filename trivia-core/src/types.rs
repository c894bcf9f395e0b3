//! Domain types shared by the provider, the state machine, and the UI.
//!
//! All types are fully owned and `Send` so fetched questions can cross from
//! the fetch task to the event loop without copying.

use std::fmt;
use std::str::FromStr;

use crate::error::InvalidQuestion;

/// Quiz subject offered on the subject screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    Html,
    Css,
    JavaScript,
}

impl Subject {
    /// All subjects in display order.
    pub const ALL: [Subject; 3] = [Subject::Html, Subject::Css, Subject::JavaScript];

    /// Provider category identifier.
    ///
    /// The provider has no per-language categories, so every subject maps to
    /// 18 ("Science: Computers").
    pub fn category_id(self) -> u32 {
        match self {
            Subject::Html | Subject::Css | Subject::JavaScript => 18,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Subject::Html => "HTML",
            Subject::Css => "CSS",
            Subject::JavaScript => "JavaScript",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown subject '{s}'"))
    }
}

/// Difficulty level; each maps to a fixed time budget for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All levels in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Seconds on the countdown when a session at this level starts.
    pub fn time_budget_secs(self) -> u32 {
        match self {
            Difficulty::Easy => 120,
            Difficulty::Medium => 90,
            Difficulty::Hard => 60,
        }
    }

    /// Value of the provider's `difficulty` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty '{s}'"))
    }
}

/// One answer option, already decoded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub is_correct: bool,
}

impl Answer {
    pub fn correct(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_correct: true }
    }

    pub fn incorrect(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_correct: false }
    }
}

/// A multiple-choice question with exactly one correct answer.
///
/// Fields are private so the invariant checked in [`Question::new`] cannot be
/// broken after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    answers: Vec<Answer>,
}

impl Question {
    /// Builds a question, rejecting answer sets without exactly one correct
    /// entry or with fewer than two entries.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidQuestion`] when either invariant fails.
    pub fn new(prompt: impl Into<String>, answers: Vec<Answer>) -> Result<Self, InvalidQuestion> {
        if answers.len() < 2 {
            return Err(InvalidQuestion::TooFewAnswers { count: answers.len() });
        }
        let correct = answers.iter().filter(|a| a.is_correct).count();
        if correct != 1 {
            return Err(InvalidQuestion::CorrectCount { count: correct });
        }
        Ok(Self { prompt: prompt.into(), answers })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Position of the correct answer in display order.
    pub fn correct_index(&self) -> usize {
        // Guaranteed by `new`.
        self.answers.iter().position(|a| a.is_correct).unwrap_or_default()
    }
}
