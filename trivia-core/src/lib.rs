//! trivia-core: session logic for the trivia quiz.
//!
//! Nothing in this crate touches the terminal. The `trivia` binary drives it
//! through [`runner::QuizRunner`], which owns the [`machine::QuizMachine`] and
//! the single active [`countdown::Countdown`].

pub mod countdown;
pub mod entities;
pub mod error;
pub mod machine;
pub mod provider;
pub mod runner;
pub mod shuffle;
pub mod types;

/// Number of questions requested for every session.
pub const QUESTIONS_PER_SESSION: usize = 10;
