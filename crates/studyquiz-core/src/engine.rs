//! Quiz engine orchestrator.
//!
//! Owns the live session for one learner: resolves the selection against the
//! question-pool provider, normalizes and samples the pool, drives the session
//! state machine and runs the evaluation pass when the last question is
//! passed. Every new sample bumps the session generation; evaluation results
//! that come back for an older generation are dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::error::QuizError;
use crate::evaluator::AnswerEvaluator;
use crate::model::{QuizQuestion, QuizResult, TypeFilter};
use crate::pool::{normalize_pool, PoolFilter};
use crate::report::SessionReport;
use crate::sampler::{sample_session, MAX_SESSION_QUESTIONS};
use crate::session::{AdvanceOutcome, QuizSession, SessionPhase};
use crate::statistics::SessionSummary;
use crate::traits::QuestionPoolProvider;

/// Configuration for the quiz engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum questions per session (clamped to `1..=10`).
    pub session_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_size: MAX_SESSION_QUESTIONS,
        }
    }
}

/// The subject and filters a session is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub subject_id: String,
    pub filter: PoolFilter,
}

/// Externally visible state of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Nothing selected yet.
    Idle,
    /// The selection produced no questions.
    Empty(QuizError),
    InProgress {
        index: usize,
        total: usize,
        revealed: bool,
    },
    /// The last question was passed and results are being computed.
    Evaluating { total: usize },
    Complete(SessionSummary),
}

/// Result of [`QuizEngine::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceResult {
    /// Reveal or answer the current question first.
    Blocked,
    Moved { index: usize },
    Completed(SessionSummary),
    /// The session was replaced while its results were being computed.
    Discarded,
    /// No session in progress, or an evaluation pass is already running.
    Ignored,
}

enum Slot {
    Idle,
    Empty(QuizError),
    Active(QuizSession),
}

struct EngineState {
    selection: Option<Selection>,
    generation: u64,
    slot: Slot,
    rng: Box<dyn RngCore + Send>,
}

/// Cloneable handle to a single learner's quiz.
#[derive(Clone)]
pub struct QuizEngine {
    provider: Arc<dyn QuestionPoolProvider>,
    evaluator: AnswerEvaluator,
    config: EngineConfig,
    state: Arc<Mutex<EngineState>>,
}

impl QuizEngine {
    pub fn new(
        provider: Arc<dyn QuestionPoolProvider>,
        evaluator: AnswerEvaluator,
        config: EngineConfig,
    ) -> Self {
        Self {
            provider,
            evaluator,
            config,
            state: Arc::new(Mutex::new(EngineState {
                selection: None,
                generation: 0,
                slot: Slot::Idle,
                rng: Box::new(StdRng::from_entropy()),
            })),
        }
    }

    /// Replace the random source used for sampling.
    pub fn with_rng(self, rng: impl RngCore + Send + 'static) -> Self {
        self.lock().rng = Box::new(rng);
        self
    }

    pub fn provider(&self) -> &dyn QuestionPoolProvider {
        self.provider.as_ref()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Choose a subject, chapter and question type, and sample a new session.
    ///
    /// A chapter the subject does not declare falls back to all chapters.
    pub fn select(
        &self,
        subject_id: &str,
        chapter: Option<&str>,
        question_type: TypeFilter,
    ) -> Result<SessionStatus, QuizError> {
        let mut state = self.lock();

        let Some(subject) = self.provider.subject(subject_id) else {
            state.generation += 1;
            state.selection = None;
            let err = QuizError::UnknownSubject(subject_id.to_string());
            state.slot = Slot::Empty(err.clone());
            return Err(err);
        };

        let chapter = match chapter {
            Some(name) if subject.has_chapter(name) => Some(name.to_string()),
            Some(name) => {
                tracing::debug!("chapter '{name}' not in subject '{subject_id}', using all chapters");
                None
            }
            None => None,
        };

        state.selection = Some(Selection {
            subject_id: subject_id.to_string(),
            filter: PoolFilter {
                chapter,
                question_type,
            },
        });
        self.resample(&mut state)
    }

    /// Discard the current session and sample a fresh one for the same selection.
    pub fn reset(&self) -> Result<SessionStatus, QuizError> {
        let mut state = self.lock();
        if state.selection.is_none() {
            return Ok(status_of(&state.slot));
        }
        self.resample(&mut state)
    }

    fn resample(&self, state: &mut EngineState) -> Result<SessionStatus, QuizError> {
        state.generation += 1;
        let generation = state.generation;
        let Some(selection) = state.selection.clone() else {
            state.slot = Slot::Idle;
            return Ok(SessionStatus::Idle);
        };

        let groups = self.provider.questions_for_subject(&selection.subject_id);
        let pool = normalize_pool(&groups, &selection.filter);
        let questions = sample_session(&pool, self.config.session_size, &mut *state.rng);

        match QuizSession::start(generation, questions) {
            Some(session) => {
                tracing::info!(
                    generation,
                    subject = %selection.subject_id,
                    "sampled {} of {} questions",
                    session.len(),
                    pool.len()
                );
                state.slot = Slot::Active(session);
                Ok(status_of(&state.slot))
            }
            None => {
                let err = QuizError::NoQuestionsAvailable {
                    subject: selection.subject_id.clone(),
                    chapter: selection.filter.chapter.clone(),
                };
                tracing::info!(generation, "{err}");
                state.slot = Slot::Empty(err.clone());
                Err(err)
            }
        }
    }

    /// Record a raw answer for the current question. No-op when not applicable.
    pub fn capture_answer(&self, question_id: &str, raw: impl Into<String>) -> bool {
        match &mut self.lock().slot {
            Slot::Active(session) => session.capture_answer(question_id, raw),
            _ => false,
        }
    }

    /// Reveal the current question's answer. No-op when not applicable.
    pub fn reveal(&self) -> bool {
        match &mut self.lock().slot {
            Slot::Active(session) => session.reveal(),
            _ => false,
        }
    }

    /// Move to the next question, or evaluate and complete the session.
    ///
    /// Dropping the returned future while the final evaluation pass is
    /// running leaves the session in [`SessionStatus::Evaluating`]; only
    /// [`QuizEngine::reset`] or a new [`QuizEngine::select`] leaves that state.
    pub async fn advance(&self) -> AdvanceResult {
        let submission = {
            let mut state = self.lock();
            let Slot::Active(session) = &mut state.slot else {
                return AdvanceResult::Ignored;
            };
            match session.advance() {
                AdvanceOutcome::Blocked => return AdvanceResult::Blocked,
                AdvanceOutcome::Moved { index } => return AdvanceResult::Moved { index },
                AdvanceOutcome::Ignored => return AdvanceResult::Ignored,
                AdvanceOutcome::Submit(submission) => submission,
            }
        };

        tracing::info!(
            generation = submission.generation,
            "evaluating {} answers",
            submission.questions.len()
        );
        let results = self
            .evaluator
            .evaluate_all(&submission.questions, &submission.answers)
            .await;

        let mut state = self.lock();
        let Slot::Active(session) = &mut state.slot else {
            return discarded(submission.generation);
        };
        if session.complete(submission.generation, results) {
            let summary = session.summary();
            tracing::info!(
                generation = submission.generation,
                "session complete: {}/{} correct, average {}",
                summary.correct_count,
                summary.total,
                summary.average_score
            );
            AdvanceResult::Completed(summary)
        } else {
            discarded(submission.generation)
        }
    }

    pub fn status(&self) -> SessionStatus {
        status_of(&self.lock().slot)
    }

    /// Generation of the live session; increases on every new sample.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn selection(&self) -> Option<Selection> {
        self.lock().selection.clone()
    }

    pub fn current_question(&self) -> Option<QuizQuestion> {
        match &self.lock().slot {
            Slot::Active(session) => session.current_question().cloned(),
            _ => None,
        }
    }

    /// Raw answer captured so far for the current question.
    pub fn current_answer(&self) -> Option<String> {
        match &self.lock().slot {
            Slot::Active(session) => session
                .current_question()
                .and_then(|q| session.answer(&q.id))
                .map(String::from),
            _ => None,
        }
    }

    /// The sampled questions of the live session, in order.
    pub fn questions(&self) -> Vec<QuizQuestion> {
        match &self.lock().slot {
            Slot::Active(session) => session.questions().to_vec(),
            _ => Vec::new(),
        }
    }

    pub fn results(&self) -> Vec<QuizResult> {
        match &self.lock().slot {
            Slot::Active(session) => session.results().to_vec(),
            _ => Vec::new(),
        }
    }

    /// Summary of a completed session.
    pub fn summary(&self) -> Option<SessionSummary> {
        match &self.lock().slot {
            Slot::Active(session) if session.is_complete() => Some(session.summary()),
            _ => None,
        }
    }

    /// Report of a completed session.
    pub fn report(&self) -> Option<SessionReport> {
        let state = self.lock();
        let selection = state.selection.as_ref()?;
        match &state.slot {
            Slot::Active(session) => {
                SessionReport::from_session(&selection.subject_id, &selection.filter, session)
            }
            _ => None,
        }
    }
}

fn discarded(generation: u64) -> AdvanceResult {
    tracing::info!(
        generation,
        "session was replaced during evaluation, discarding results"
    );
    AdvanceResult::Discarded
}

fn status_of(slot: &Slot) -> SessionStatus {
    match slot {
        Slot::Idle => SessionStatus::Idle,
        Slot::Empty(err) => SessionStatus::Empty(err.clone()),
        Slot::Active(session) if session.is_evaluating() => SessionStatus::Evaluating {
            total: session.len(),
        },
        Slot::Active(session) => match session.phase() {
            SessionPhase::InProgress { index, revealed } => SessionStatus::InProgress {
                index,
                total: session.len(),
                revealed,
            },
            SessionPhase::Complete => SessionStatus::Complete(session.summary()),
        },
    }
}
