//! In-memory question bank backing the question-pool provider trait.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use crate::model::{QuestionGroups, Subject};
use crate::parser::{load_bank_directory, parse_bank, SubjectBank};
use crate::traits::QuestionPoolProvider;

/// A set of subject banks keyed by subject id.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    banks: BTreeMap<String, SubjectBank>,
}

impl QuestionBank {
    pub fn new(banks: impl IntoIterator<Item = SubjectBank>) -> Self {
        let mut map = BTreeMap::new();
        for bank in banks {
            if map.contains_key(&bank.subject.id) {
                tracing::warn!(
                    "duplicate subject '{}', keeping the last definition",
                    bank.subject.id
                );
            }
            map.insert(bank.subject.id.clone(), bank);
        }
        Self { banks: map }
    }

    /// Load a bank from a single TOML file or a directory of them.
    pub fn load(path: &Path) -> Result<Self> {
        let banks = if path.is_dir() {
            load_bank_directory(path)?
        } else {
            vec![parse_bank(path)?]
        };
        Ok(Self::new(banks))
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}

impl QuestionPoolProvider for QuestionBank {
    fn subjects(&self) -> Vec<&Subject> {
        self.banks.values().map(|b| &b.subject).collect()
    }

    fn subject(&self, subject_id: &str) -> Option<&Subject> {
        self.banks.get(subject_id).map(|b| &b.subject)
    }

    fn questions_for_subject(&self, subject_id: &str) -> QuestionGroups {
        self.banks
            .get(subject_id)
            .map(|b| b.questions.clone())
            .unwrap_or_default()
    }
}
