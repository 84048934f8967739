//! Core data model types for studyquiz.
//!
//! Raw question shapes as they come from a question bank, the unified
//! `QuizQuestion` schema the session engine works with, and the per-question
//! `QuizResult` produced at submission time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three question shapes a session can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Text,
    MultipleChoice,
    TrueFalse,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Text => write!(f, "text"),
            QuestionType::MultipleChoice => write!(f, "multiple-choice"),
            QuestionType::TrueFalse => write!(f, "true-false"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "free-text" => Ok(QuestionType::Text),
            "multiple-choice" | "multiplechoice" | "mc" => Ok(QuestionType::MultipleChoice),
            "true-false" | "truefalse" | "tf" => Ok(QuestionType::TrueFalse),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

impl QuestionType {
    /// Label shown next to a question prompt.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Text => "Free Response",
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::TrueFalse => "True / False",
        }
    }
}

/// Which question types a pool keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(QuestionType),
}

impl TypeFilter {
    pub fn allows(&self, question_type: QuestionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => *t == question_type,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "all"),
            TypeFilter::Only(t) => t.fmt(f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

/// Question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw bank shapes
// ---------------------------------------------------------------------------

/// A free-text question with its reference answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextItem {
    pub id: String,
    pub chapter: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// A multiple-choice question. `correct_answer` indexes into `options`.
///
/// The index is kept signed so that a negative or out-of-range value still
/// loads; it simply has no correct option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleChoiceItem {
    pub id: String,
    pub chapter: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: i64,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl MultipleChoiceItem {
    /// The correct option's index, if `correct_answer` points at one.
    pub fn correct_index(&self) -> Option<usize> {
        usize::try_from(self.correct_answer)
            .ok()
            .filter(|&i| i < self.options.len())
    }
}

/// A true/false statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrueFalseItem {
    pub id: String,
    pub chapter: String,
    pub question: String,
    pub correct_answer: bool,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// The three raw collections a subject's bank is made of.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionGroups {
    #[serde(default)]
    pub text: Vec<TextItem>,
    #[serde(default)]
    pub multiple_choice: Vec<MultipleChoiceItem>,
    #[serde(default)]
    pub true_false: Vec<TrueFalseItem>,
}

impl QuestionGroups {
    pub fn len(&self) -> usize {
        self.text.len() + self.multiple_choice.len() + self.true_false.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A subject with its ordered chapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Subject {
    pub fn has_chapter(&self, name: &str) -> bool {
        self.chapters.iter().any(|c| c.name == name)
    }
}

/// A chapter within a subject. Questions reference chapters by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub order: u32,
}

// ---------------------------------------------------------------------------
// Unified session schema
// ---------------------------------------------------------------------------

/// Type-specific answer key of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    Text,
    MultipleChoice {
        options: Vec<String>,
        correct_option_index: Option<usize>,
    },
    TrueFalse {
        correct_boolean: bool,
    },
}

/// A question in the unified schema used by a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Unique, stable across the pool.
    pub id: String,
    pub chapter: String,
    /// Prompt text.
    pub question: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Ground-truth answer used for display and free-text scoring.
    pub canonical_answer_text: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::Text => QuestionType::Text,
            QuestionKind::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionKind::TrueFalse { .. } => QuestionType::TrueFalse,
        }
    }

    /// Options of a multiple-choice question; empty for other kinds.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::MultipleChoice { options, .. } => options,
            _ => &[],
        }
    }
}

/// The scored outcome of one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub question_id: String,
    /// Display-normalized answer (option text, "True"/"False", or free text).
    pub user_answer: String,
    pub correct: bool,
    /// 0..=100
    pub score: u32,
    pub feedback: String,
}
