//! Answer evaluation.
//!
//! Structured questions (multiple-choice, true/false) are exact-matched.
//! Free-text answers go to a remote `AnswerScorer` once; any failure or
//! timeout falls back to a local token-overlap heuristic. No failure of the
//! remote scorer ever aborts the batch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::model::{QuestionKind, QuizQuestion, QuizResult};
use crate::traits::{AnswerScorer, ScoreRequest, ScoreResponse};

/// Default bound on a single remote scoring call.
pub const DEFAULT_SCORER_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum score for a free-text answer to count as correct.
pub const CORRECT_THRESHOLD: u32 = 80;

const NO_FEEDBACK: &str = "Unable to generate feedback";
const FEEDBACK_EXCELLENT: &str = "Excellent! Your answer matches the expected response.";
const FEEDBACK_GOOD: &str = "Good attempt! Review the answer for complete understanding.";
const FEEDBACK_IMPROVE: &str = "Your answer needs improvement. Study the correct answer.";

/// Score and feedback for a free-text answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextScore {
    pub score: u32,
    pub feedback: String,
}

/// Scores every question of a finished session.
#[derive(Clone)]
pub struct AnswerEvaluator {
    scorer: Option<Arc<dyn AnswerScorer>>,
    timeout: Duration,
}

impl AnswerEvaluator {
    /// Evaluator that tries `scorer` for free text before falling back.
    pub fn new(scorer: Arc<dyn AnswerScorer>) -> Self {
        Self {
            scorer: Some(scorer),
            timeout: DEFAULT_SCORER_TIMEOUT,
        }
    }

    /// Evaluator that always uses the local heuristic for free text.
    pub fn local_only() -> Self {
        Self {
            scorer: None,
            timeout: DEFAULT_SCORER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Evaluate questions strictly in order, one remote call at a time.
    pub async fn evaluate_all(
        &self,
        questions: &[QuizQuestion],
        answers: &HashMap<String, String>,
    ) -> Vec<QuizResult> {
        let mut results = Vec::with_capacity(questions.len());
        for question in questions {
            let raw = answers.get(&question.id).map(String::as_str);
            results.push(self.evaluate(question, raw).await);
        }
        results
    }

    /// Evaluate one question against its raw answer.
    pub async fn evaluate(&self, question: &QuizQuestion, raw: Option<&str>) -> QuizResult {
        match &question.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_option_index,
            } => evaluate_multiple_choice(question, options, *correct_option_index, raw),
            QuestionKind::TrueFalse { correct_boolean } => {
                evaluate_true_false(question, *correct_boolean, raw)
            }
            QuestionKind::Text => {
                let user_answer = raw.unwrap_or_default().to_string();
                let TextScore { score, feedback } = self
                    .score_text(&question.id, &user_answer, &question.canonical_answer_text)
                    .await;
                QuizResult {
                    question_id: question.id.clone(),
                    user_answer,
                    correct: score >= CORRECT_THRESHOLD,
                    score,
                    feedback,
                }
            }
        }
    }

    async fn score_text(&self, question_id: &str, user_answer: &str, canonical: &str) -> TextScore {
        let Some(scorer) = &self.scorer else {
            return fallback_score(user_answer, canonical);
        };

        let request = ScoreRequest {
            user_answer: user_answer.to_string(),
            correct_answer: canonical.to_string(),
        };

        match tokio::time::timeout(self.timeout, scorer.score(&request)).await {
            Ok(Ok(response)) => remote_score(response),
            Ok(Err(e)) => {
                tracing::warn!(
                    "scorer '{}' failed for {question_id}, using local fallback: {e:#}",
                    scorer.name()
                );
                fallback_score(user_answer, canonical)
            }
            Err(_) => {
                tracing::warn!(
                    "scorer '{}' timed out after {:?} for {question_id}, using local fallback",
                    scorer.name(),
                    self.timeout
                );
                fallback_score(user_answer, canonical)
            }
        }
    }
}

/// Convert a remote response, defaulting missing fields and clamping the score.
fn remote_score(response: ScoreResponse) -> TextScore {
    let score = response
        .score
        .filter(|s| s.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0)
        .round() as u32;
    let feedback = response
        .feedback
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| NO_FEEDBACK.to_string());
    TextScore { score, feedback }
}

/// Local token-overlap heuristic.
///
/// Counts user tokens found in the canonical token set (set membership, so a
/// repeated user token counts every time) and normalizes by the canonical
/// token count only.
pub fn fallback_score(user_answer: &str, canonical: &str) -> TextScore {
    let canonical_lower = canonical.to_lowercase();
    let canonical_tokens: Vec<&str> = canonical_lower.split_whitespace().collect();

    let raw = if canonical_tokens.is_empty() {
        0.0
    } else {
        let canonical_set: HashSet<&str> = canonical_tokens.iter().copied().collect();
        let user_lower = user_answer.to_lowercase();
        let match_count = user_lower
            .split_whitespace()
            .filter(|w| canonical_set.contains(w))
            .count();
        (match_count as f64 / canonical_tokens.len() as f64 * 100.0).min(100.0)
    };

    // Tiers follow the unrounded ratio.
    let feedback = if raw >= CORRECT_THRESHOLD as f64 {
        FEEDBACK_EXCELLENT
    } else if raw >= 50.0 {
        FEEDBACK_GOOD
    } else {
        FEEDBACK_IMPROVE
    };

    TextScore {
        score: raw.round() as u32,
        feedback: feedback.to_string(),
    }
}

/// Exact-match a multiple-choice answer given as a stringified option index.
pub fn evaluate_multiple_choice(
    question: &QuizQuestion,
    options: &[String],
    correct_option_index: Option<usize>,
    raw: Option<&str>,
) -> QuizResult {
    let selected = raw.and_then(|r| r.trim().parse::<usize>().ok());
    let correct = selected.is_some() && selected == correct_option_index;
    let user_answer = selected
        .and_then(|i| options.get(i))
        .cloned()
        .unwrap_or_default();

    QuizResult {
        question_id: question.id.clone(),
        user_answer,
        correct,
        score: if correct { 100 } else { 0 },
        feedback: structured_feedback(correct, question.explanation.as_deref()),
    }
}

/// Exact-match a true/false answer, case-insensitively.
pub fn evaluate_true_false(question: &QuizQuestion, correct_boolean: bool, raw: Option<&str>) -> QuizResult {
    let parsed = raw.and_then(|r| match r.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    });
    let correct = parsed == Some(correct_boolean);
    let user_answer = match parsed {
        Some(true) => "True",
        Some(false) => "False",
        None => "",
    };

    QuizResult {
        question_id: question.id.clone(),
        user_answer: user_answer.to_string(),
        correct,
        score: if correct { 100 } else { 0 },
        feedback: structured_feedback(correct, question.explanation.as_deref()),
    }
}

fn structured_feedback(correct: bool, explanation: Option<&str>) -> String {
    match explanation.map(str::trim).filter(|e| !e.is_empty()) {
        Some(explanation) => {
            let prefix = if correct { "Correct." } else { "Not quite." };
            format!("{prefix} {explanation}")
        }
        None if correct => "Correct answer.".to_string(),
        None => "Incorrect answer.".to_string(),
    }
}
