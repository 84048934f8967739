//! Session sampling.
//!
//! Draws a bounded, uniformly shuffled subset of a pool using a caller-supplied
//! random number generator, so tests can seed it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::QuizQuestion;

/// Upper bound on the number of questions in one session.
pub const MAX_SESSION_QUESTIONS: usize = 10;

/// Shuffle the pool and keep at most `limit` questions.
///
/// `limit` is clamped to `1..=MAX_SESSION_QUESTIONS`. An empty pool yields an
/// empty session; the caller decides how to surface that.
pub fn sample_session<R: Rng + ?Sized>(
    pool: &[QuizQuestion],
    limit: usize,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let limit = limit.clamp(1, MAX_SESSION_QUESTIONS);
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(limit);
    shuffled
}
