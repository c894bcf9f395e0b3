//! Error types for trivia-core.

use thiserror::Error;

use crate::machine::Phase;

/// A question that does not have exactly one correct answer among at least two.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidQuestion {
    #[error("question has {count} answers, at least 2 are required")]
    TooFewAnswers { count: usize },
    #[error("question has {count} correct answers, exactly 1 is required")]
    CorrectCount { count: usize },
}

/// The single failure kind reported by the question provider.
///
/// Transport errors, bad statuses, malformed payloads, provider error codes,
/// empty result lists, and invalid questions all collapse into this type. The
/// cause is kept for the message and `source()` so it can be logged.
#[derive(Debug, Error)]
#[error("failed to fetch questions: {cause}")]
pub struct FetchFailed {
    #[source]
    cause: FetchCause,
}

impl FetchFailed {
    pub(crate) fn new(cause: FetchCause) -> Self {
        Self { cause }
    }

    /// Short text suitable for a one-line message in the UI.
    pub fn summary(&self) -> String {
        self.cause.to_string()
    }
}

impl From<FetchCause> for FetchFailed {
    fn from(cause: FetchCause) -> Self {
        Self::new(cause)
    }
}

/// Underlying reason for a [`FetchFailed`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchCause {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("provider responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed provider payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("provider reported error code {0}")]
    Provider(u8),
    #[error("provider returned no questions")]
    Empty,
    #[error("provider returned an invalid question: {0}")]
    InvalidQuestion(#[from] InvalidQuestion),
}

/// A transition the session state machine refused. The machine is unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("`{op}` is not allowed while {phase}")]
    InvalidState { op: &'static str, phase: Phase },
    #[error("the current question has already been answered")]
    AlreadyAnswered,
    #[error("the current question has not been answered yet")]
    NotAnswered,
    #[error("answer {index} is out of range for {len} answers")]
    AnswerOutOfRange { index: usize, len: usize },
    #[error("result belongs to a request that is no longer pending")]
    StaleRequest,
    #[error("countdown event belongs to a session that is no longer active")]
    StaleTimer,
    #[error("a session needs at least one question")]
    NoQuestions,
}
