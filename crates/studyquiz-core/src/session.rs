//! Per-session quiz state machine.
//!
//! A session is `InProgress { index, revealed }` until the last `advance()`,
//! which hands out a [`Submission`] snapshot for evaluation. The session moves
//! to `Complete` only when results for the same generation are applied.
//! Every operation that does not apply in the current state is a no-op.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{QuizQuestion, QuizResult};
use crate::statistics::SessionSummary;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionPhase {
    InProgress { index: usize, revealed: bool },
    Complete,
}

/// Everything the evaluator needs, detached from the live session.
#[derive(Debug, Clone)]
pub struct Submission {
    pub generation: u64,
    pub questions: Vec<QuizQuestion>,
    pub answers: HashMap<String, String>,
}

/// What `advance()` did.
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    /// Nothing revealed and nothing answered on the current question.
    Blocked,
    /// Moved on to the question at `index`.
    Moved { index: usize },
    /// Last question passed; evaluate this and apply it with `complete()`.
    Submit(Submission),
    /// Already complete, or an evaluation pass is running.
    Ignored,
}

/// One quiz attempt over a fixed, sampled question sequence.
#[derive(Debug, Clone)]
pub struct QuizSession {
    generation: u64,
    questions: Vec<QuizQuestion>,
    phase: SessionPhase,
    answers: HashMap<String, String>,
    results: Vec<QuizResult>,
    evaluating: bool,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session, or `None` when there are no questions to ask.
    pub fn start(generation: u64, questions: Vec<QuizQuestion>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }
        Some(Self {
            generation,
            questions,
            phase: SessionPhase::InProgress {
                index: 0,
                revealed: false,
            },
            answers: HashMap::new(),
            results: Vec::new(),
            evaluating: false,
            started_at: Utc::now(),
            completed_at: None,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    pub fn is_evaluating(&self) -> bool {
        self.evaluating
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.phase, SessionPhase::InProgress { revealed: true, .. })
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            SessionPhase::InProgress { index, .. } => Some(index),
            SessionPhase::Complete => None,
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.current_index().and_then(|i| self.questions.get(i))
    }

    /// Raw answer captured for a question, if any.
    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Scored results; empty until the session completes.
    pub fn results(&self) -> &[QuizResult] {
        &self.results
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_results(&self.results)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Record a raw answer for the current, unrevealed question.
    ///
    /// Returns whether the answer was stored.
    pub fn capture_answer(&mut self, question_id: &str, raw: impl Into<String>) -> bool {
        if self.evaluating || self.is_revealed() {
            return false;
        }
        let is_current = self
            .current_question()
            .is_some_and(|q| q.id == question_id);
        if !is_current {
            tracing::debug!("ignoring answer for {question_id}: not the current question");
            return false;
        }
        self.answers.insert(question_id.to_string(), raw.into());
        true
    }

    /// Expose the canonical answer of the current question. Idempotent.
    pub fn reveal(&mut self) -> bool {
        if self.evaluating {
            return false;
        }
        match &mut self.phase {
            SessionPhase::InProgress { revealed, .. } => {
                *revealed = true;
                true
            }
            SessionPhase::Complete => false,
        }
    }

    /// Move past the current question.
    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.evaluating {
            return AdvanceOutcome::Ignored;
        }
        let SessionPhase::InProgress { index, revealed } = self.phase else {
            return AdvanceOutcome::Ignored;
        };

        let answered = self
            .questions
            .get(index)
            .is_some_and(|q| self.answers.contains_key(&q.id));
        if !revealed && !answered {
            return AdvanceOutcome::Blocked;
        }

        if index + 1 < self.questions.len() {
            self.phase = SessionPhase::InProgress {
                index: index + 1,
                revealed: false,
            };
            tracing::debug!(generation = self.generation, "advanced to question {}", index + 1);
            return AdvanceOutcome::Moved { index: index + 1 };
        }

        self.evaluating = true;
        AdvanceOutcome::Submit(Submission {
            generation: self.generation,
            questions: self.questions.clone(),
            answers: self.answers.clone(),
        })
    }

    /// Apply evaluation results. Results for any other generation, or arriving
    /// when no evaluation is pending, are discarded.
    pub fn complete(&mut self, generation: u64, results: Vec<QuizResult>) -> bool {
        if generation != self.generation || !self.evaluating {
            tracing::debug!(
                "discarding results for generation {generation} (live generation {})",
                self.generation
            );
            return false;
        }
        self.results = results;
        self.evaluating = false;
        self.phase = SessionPhase::Complete;
        self.completed_at = Some(Utc::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| QuizQuestion {
                id: format!("q{i}"),
                chapter: "One".into(),
                question: format!("question {i}"),
                kind: QuestionKind::TrueFalse {
                    correct_boolean: true,
                },
                category: None,
                difficulty: None,
                canonical_answer_text: "True".into(),
                explanation: None,
            })
            .collect()
    }

    fn result(id: &str) -> QuizResult {
        QuizResult {
            question_id: id.into(),
            user_answer: "True".into(),
            correct: true,
            score: 100,
            feedback: "Correct answer.".into(),
        }
    }

    #[test]
    fn empty_session_does_not_start() {
        assert!(QuizSession::start(1, vec![]).is_none());
    }

    #[test]
    fn starts_at_first_question_unrevealed() {
        let session = QuizSession::start(1, questions(3)).unwrap();
        assert_eq!(
            session.phase(),
            SessionPhase::InProgress {
                index: 0,
                revealed: false
            }
        );
        assert_eq!(session.current_question().unwrap().id, "q0");
    }

    #[test]
    fn capture_only_targets_current_unrevealed_question() {
        let mut session = QuizSession::start(1, questions(3)).unwrap();
        assert!(!session.capture_answer("q1", "true"));
        assert!(session.capture_answer("q0", "false"));
        assert!(session.capture_answer("q0", "true"));
        assert_eq!(session.answer("q0"), Some("true"));

        session.reveal();
        assert!(!session.capture_answer("q0", "false"));
        assert_eq!(session.answer("q0"), Some("true"));
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut session = QuizSession::start(1, questions(2)).unwrap();
        assert!(session.reveal());
        assert!(session.reveal());
        assert!(session.is_revealed());
    }

    #[test]
    fn advance_requires_answer_or_reveal() {
        let mut session = QuizSession::start(1, questions(3)).unwrap();
        assert!(matches!(session.advance(), AdvanceOutcome::Blocked));

        session.capture_answer("q0", "true");
        assert!(matches!(
            session.advance(),
            AdvanceOutcome::Moved { index: 1 }
        ));
        assert!(!session.is_revealed(), "reveal resets on advance");

        session.reveal();
        assert!(matches!(
            session.advance(),
            AdvanceOutcome::Moved { index: 2 }
        ));
    }

    #[test]
    fn last_advance_submits_then_completes() {
        let mut session = QuizSession::start(7, questions(2)).unwrap();
        session.capture_answer("q0", "true");
        session.advance();
        session.capture_answer("q1", "true");

        let AdvanceOutcome::Submit(submission) = session.advance() else {
            panic!("expected submission");
        };
        assert_eq!(submission.generation, 7);
        assert_eq!(submission.questions.len(), 2);
        assert_eq!(submission.answers.len(), 2);

        // Still in progress until results arrive.
        assert!(session.is_evaluating());
        assert!(!session.is_complete());
        assert!(matches!(session.advance(), AdvanceOutcome::Ignored));
        assert!(!session.capture_answer("q1", "false"));

        assert!(session.complete(7, vec![result("q0"), result("q1")]));
        assert!(session.is_complete());
        assert!(session.current_question().is_none());
        assert!(session.completed_at().is_some());
        assert_eq!(session.summary().accuracy_rate, 100);
    }

    #[test]
    fn complete_is_terminal() {
        let mut session = QuizSession::start(1, questions(1)).unwrap();
        session.reveal();
        let AdvanceOutcome::Submit(_) = session.advance() else {
            panic!("expected submission");
        };
        session.complete(1, vec![result("q0")]);

        assert!(matches!(session.advance(), AdvanceOutcome::Ignored));
        assert!(!session.reveal());
        assert!(!session.capture_answer("q0", "false"));
        assert!(!session.complete(1, vec![]), "second completion is ignored");
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn stale_generation_results_are_discarded() {
        let mut session = QuizSession::start(2, questions(1)).unwrap();
        session.reveal();
        session.advance();
        assert!(!session.complete(1, vec![result("q0")]));
        assert!(!session.is_complete());
        assert!(session.results().is_empty());
    }

    #[test]
    fn results_without_pending_evaluation_are_discarded() {
        let mut session = QuizSession::start(3, questions(2)).unwrap();
        assert!(!session.complete(3, vec![result("q0")]));
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut session = QuizSession::start(1, questions(4)).unwrap();
        loop {
            let index = session.current_index().unwrap();
            assert!(index < session.len());
            session.reveal();
            match session.advance() {
                AdvanceOutcome::Moved { .. } => continue,
                AdvanceOutcome::Submit(_) => break,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(session.current_index(), Some(3));
    }
}
