//! TOML question bank parser.
//!
//! Loads subject banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    Chapter, MultipleChoiceItem, QuestionGroups, Subject, TextItem, TrueFalseItem,
};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    subject: TomlSubjectHeader,
    #[serde(default)]
    chapters: Vec<Chapter>,
    #[serde(default)]
    text: Vec<TextItem>,
    #[serde(default)]
    multiple_choice: Vec<MultipleChoiceItem>,
    #[serde(default)]
    true_false: Vec<TrueFalseItem>,
}

#[derive(Debug, Deserialize)]
struct TomlSubjectHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

/// One subject together with its raw question collections.
#[derive(Debug, Clone)]
pub struct SubjectBank {
    pub subject: Subject,
    pub questions: QuestionGroups,
}

/// Parse a single TOML file into a `SubjectBank`.
pub fn parse_bank(path: &Path) -> Result<SubjectBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `SubjectBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<SubjectBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    anyhow::ensure!(
        !parsed.subject.id.trim().is_empty(),
        "subject id is empty in {}",
        source_path.display()
    );

    Ok(SubjectBank {
        subject: Subject {
            id: parsed.subject.id,
            name: parsed.subject.name,
            description: parsed.subject.description,
            chapters: parsed.chapters,
        },
        questions: QuestionGroups {
            text: parsed.text,
            multiple_choice: parsed.multiple_choice,
            true_false: parsed.true_false,
        },
    })
}

/// Recursively load all `.toml` bank files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<SubjectBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(banks)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a subject bank for common content issues.
pub fn validate_bank(bank: &SubjectBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let questions = &bank.questions;

    let chapter_names: HashSet<&str> = bank
        .subject
        .chapters
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    if chapter_names.len() != bank.subject.chapters.len() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "duplicate chapter names".into(),
        });
    }

    // (id, chapter, prompt) across all three collections
    let all: Vec<(&str, &str, &str)> = questions
        .text
        .iter()
        .map(|q| (q.id.as_str(), q.chapter.as_str(), q.question.as_str()))
        .chain(
            questions
                .multiple_choice
                .iter()
                .map(|q| (q.id.as_str(), q.chapter.as_str(), q.question.as_str())),
        )
        .chain(
            questions
                .true_false
                .iter()
                .map(|q| (q.id.as_str(), q.chapter.as_str(), q.question.as_str())),
        )
        .collect();

    let mut seen_ids = HashSet::new();
    for (id, chapter, prompt) in &all {
        if !seen_ids.insert(*id) {
            warnings.push(ValidationWarning::question(
                id,
                format!("duplicate question ID: {id}"),
            ));
        }
        if !chapter_names.contains(chapter) {
            warnings.push(ValidationWarning::question(
                id,
                format!("references undeclared chapter: {chapter}"),
            ));
        }
        if prompt.trim().is_empty() {
            warnings.push(ValidationWarning::question(id, "prompt is empty"));
        }
    }

    for q in &questions.text {
        if q.answer.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "answer is empty"));
        }
    }

    for q in &questions.multiple_choice {
        if q.options.len() < 2 {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("only {} option(s), expected at least 2", q.options.len()),
            ));
        }
        if q.correct_index().is_none() {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!(
                    "correct_answer {} is out of range for {} option(s)",
                    q.correct_answer,
                    q.options.len()
                ),
            ));
        }
    }

    warnings
}
