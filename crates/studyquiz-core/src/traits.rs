//! Core trait definitions for answer scorers and question-pool providers.
//!
//! `AnswerScorer` is implemented by the `studyquiz-scorers` crate; the
//! in-memory `QuestionBank` implements `QuestionPoolProvider`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Chapter, QuestionGroups, Subject};

// ---------------------------------------------------------------------------
// Answer scorer trait
// ---------------------------------------------------------------------------

/// Trait for remote collaborators that grade free-text answers.
#[async_trait]
pub trait AnswerScorer: Send + Sync {
    /// Human-readable scorer name (e.g. "http").
    fn name(&self) -> &str;

    /// Grade a free-text answer against the canonical answer.
    async fn score(&self, request: &ScoreRequest) -> anyhow::Result<ScoreResponse>;
}

/// Body sent to a scoring collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    pub user_answer: String,
    pub correct_answer: String,
}

/// Body returned by a scoring collaborator. Both fields may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
}

// ---------------------------------------------------------------------------
// Question-pool provider trait
// ---------------------------------------------------------------------------

/// Static, synchronous source of subjects and their raw question collections.
///
/// Unknown subjects or chapters yield empty collections, never errors.
pub trait QuestionPoolProvider: Send + Sync {
    /// All known subjects.
    fn subjects(&self) -> Vec<&Subject>;

    /// Look up a subject by id.
    fn subject(&self, subject_id: &str) -> Option<&Subject>;

    /// Chapters of a subject in display order.
    fn chapters(&self, subject_id: &str) -> Vec<Chapter> {
        let mut chapters = self
            .subject(subject_id)
            .map(|s| s.chapters.clone())
            .unwrap_or_default();
        chapters.sort_by_key(|c| c.order);
        chapters
    }

    /// Every raw question of a subject.
    fn questions_for_subject(&self, subject_id: &str) -> QuestionGroups;

    /// Raw questions of a single chapter, matched by exact chapter name.
    fn questions_for_chapter(&self, subject_id: &str, chapter_name: &str) -> QuestionGroups {
        let all = self.questions_for_subject(subject_id);
        QuestionGroups {
            text: all
                .text
                .into_iter()
                .filter(|q| q.chapter == chapter_name)
                .collect(),
            multiple_choice: all
                .multiple_choice
                .into_iter()
                .filter(|q| q.chapter == chapter_name)
                .collect(),
            true_false: all
                .true_false
                .into_iter()
                .filter(|q| q.chapter == chapter_name)
                .collect(),
        }
    }
}
