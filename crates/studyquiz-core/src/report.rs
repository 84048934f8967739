//! Session report: the finished session's results in a serializable form.
//!
//! Reports are rendered for display (JSON or markdown); they are not stored.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{QuestionType, QuizResult};
use crate::pool::PoolFilter;
use crate::session::QuizSession;
use crate::statistics::SessionSummary;

/// A complete session report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Subject the session was drawn from.
    pub subject_id: String,
    /// Chapter filter, if one was active.
    pub chapter: Option<String>,
    /// Question-type filter ("all", "text", ...).
    pub question_type: String,
    /// Session generation the results belong to.
    pub generation: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// One entry per question, in session order.
    pub entries: Vec<ReportEntry>,
    pub summary: SessionSummary,
}

/// A question paired with its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub question: String,
    pub question_type: QuestionType,
    pub canonical_answer: String,
    #[serde(flatten)]
    pub result: QuizResult,
}

impl SessionReport {
    /// Build the report of a completed session; `None` while it is running.
    pub fn from_session(subject_id: &str, filter: &PoolFilter, session: &QuizSession) -> Option<Self> {
        let completed_at = session.completed_at()?;

        let entries = session
            .questions()
            .iter()
            .zip(session.results())
            .map(|(q, r)| ReportEntry {
                question: q.question.clone(),
                question_type: q.question_type(),
                canonical_answer: q.canonical_answer_text.clone(),
                result: r.clone(),
            })
            .collect();

        Some(Self {
            subject_id: subject_id.to_string(),
            chapter: filter.chapter.clone(),
            question_type: filter.question_type.to_string(),
            generation: session.generation(),
            started_at: session.started_at(),
            completed_at,
            entries,
            summary: session.summary(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize session report")
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## Quiz results: {}", self.subject_id));
        if let Some(chapter) = &self.chapter {
            md.push_str(&format!(" / {chapter}"));
        }
        md.push_str("\n\n");

        md.push_str(&format!(
            "**Summary:** {}/{} correct, average score {}, accuracy {}%\n\n",
            self.summary.correct_count,
            self.summary.total,
            self.summary.average_score,
            self.summary.accuracy_rate
        ));

        if !self.entries.is_empty() {
            md.push_str("| # | Question | Your answer | Expected | Score | Feedback |\n");
            md.push_str("|---|----------|-------------|----------|-------|----------|\n");
            for (i, e) in self.entries.iter().enumerate() {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    i + 1,
                    escape_cell(&e.question),
                    escape_cell(&e.result.user_answer),
                    escape_cell(&e.canonical_answer),
                    e.result.score,
                    escape_cell(&e.result.feedback),
                ));
            }
        }

        md
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
