//! Answer ordering.
//!
//! The correct answer is appended after the incorrect ones and the whole set
//! is shuffled in place (Fisher–Yates via `SliceRandom::shuffle`), so the
//! correct slot is uniform across positions.

use rand::seq::SliceRandom;
use rand::{rng, Rng};

use crate::types::Answer;

/// Shuffles `correct` and `incorrect` into display order with the thread RNG.
pub fn arrange(correct: Answer, incorrect: Vec<Answer>) -> Vec<Answer> {
    arrange_with(&mut rng(), correct, incorrect)
}

/// Same as [`arrange`] with a caller-supplied RNG (seeded in tests).
pub fn arrange_with<R: Rng + ?Sized>(
    rng: &mut R,
    correct: Answer,
    incorrect: Vec<Answer>,
) -> Vec<Answer> {
    let mut answers = incorrect;
    answers.push(correct);
    answers.as_mut_slice().shuffle(rng);
    answers
}
