//! Quiz engine error types.
//!
//! Content problems never crash a session; they surface as one of these
//! explicit conditions so the caller can render an empty state.

use thiserror::Error;

/// Conditions under which no session can be started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The filtered pool for this selection is empty.
    #[error("no questions available for subject '{subject}'{}", chapter_suffix(.chapter))]
    NoQuestionsAvailable {
        subject: String,
        chapter: Option<String>,
    },

    /// The question-pool provider does not know this subject.
    #[error("subject not found: {0}")]
    UnknownSubject(String),
}

fn chapter_suffix(chapter: &Option<String>) -> String {
    chapter
        .as_ref()
        .map(|c| format!(" in chapter '{c}'"))
        .unwrap_or_default()
}
