//! Pool normalization.
//!
//! Unifies the three raw question shapes into `QuizQuestion`s, applying the
//! optional chapter and question-type filters. Output order is text, then
//! multiple-choice, then true-false, each in source order.

use crate::model::{
    MultipleChoiceItem, QuestionGroups, QuestionKind, QuestionType, QuizQuestion, TextItem,
    TrueFalseItem, TypeFilter,
};

/// Which part of a subject's bank goes into the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolFilter {
    /// Exact, case-sensitive chapter name. `None` keeps every chapter.
    pub chapter: Option<String>,
    pub question_type: TypeFilter,
}

impl PoolFilter {
    fn keeps(&self, chapter: &str, question_type: QuestionType) -> bool {
        self.question_type.allows(question_type)
            && self.chapter.as_deref().map_or(true, |c| c == chapter)
    }
}

/// Normalize raw collections into a single filtered pool.
pub fn normalize_pool(groups: &QuestionGroups, filter: &PoolFilter) -> Vec<QuizQuestion> {
    let text = groups
        .text
        .iter()
        .filter(|q| filter.keeps(&q.chapter, QuestionType::Text))
        .map(from_text);
    let multiple_choice = groups
        .multiple_choice
        .iter()
        .filter(|q| filter.keeps(&q.chapter, QuestionType::MultipleChoice))
        .map(from_multiple_choice);
    let true_false = groups
        .true_false
        .iter()
        .filter(|q| filter.keeps(&q.chapter, QuestionType::TrueFalse))
        .map(from_true_false);

    text.chain(multiple_choice).chain(true_false).collect()
}

fn from_text(item: &TextItem) -> QuizQuestion {
    QuizQuestion {
        id: item.id.clone(),
        chapter: item.chapter.clone(),
        question: item.question.clone(),
        kind: QuestionKind::Text,
        category: item.category.clone(),
        difficulty: item.difficulty,
        canonical_answer_text: item.answer.clone(),
        explanation: None,
    }
}

fn from_multiple_choice(item: &MultipleChoiceItem) -> QuizQuestion {
    let index = item.correct_index();
    let canonical = match index.and_then(|i| item.options.get(i)) {
        Some(option) => option.clone(),
        None => {
            tracing::debug!(
                "question {} has correct_answer {} but {} option(s)",
                item.id,
                item.correct_answer,
                item.options.len()
            );
            String::new()
        }
    };

    QuizQuestion {
        id: item.id.clone(),
        chapter: item.chapter.clone(),
        question: item.question.clone(),
        kind: QuestionKind::MultipleChoice {
            options: item.options.clone(),
            correct_option_index: index,
        },
        category: item.category.clone(),
        difficulty: item.difficulty,
        canonical_answer_text: canonical,
        explanation: item.explanation.clone(),
    }
}

fn from_true_false(item: &TrueFalseItem) -> QuizQuestion {
    QuizQuestion {
        id: item.id.clone(),
        chapter: item.chapter.clone(),
        question: item.question.clone(),
        kind: QuestionKind::TrueFalse {
            correct_boolean: item.correct_answer,
        },
        category: item.category.clone(),
        difficulty: item.difficulty,
        canonical_answer_text: if item.correct_answer { "True" } else { "False" }.to_string(),
        explanation: item.explanation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: &str, chapter: &str) -> TextItem {
        TextItem {
            id: id.into(),
            chapter: chapter.into(),
            question: format!("question {id}"),
            answer: format!("answer {id}"),
            category: Some("Basics".into()),
            difficulty: None,
        }
    }

    fn mc(id: &str, chapter: &str, correct: i64) -> MultipleChoiceItem {
        MultipleChoiceItem {
            id: id.into(),
            chapter: chapter.into(),
            question: format!("question {id}"),
            options: vec!["A".into(), "B".into(), "C".into()],
            correct_answer: correct,
            explanation: None,
            category: None,
            difficulty: None,
        }
    }

    fn tf(id: &str, chapter: &str, correct: bool) -> TrueFalseItem {
        TrueFalseItem {
            id: id.into(),
            chapter: chapter.into(),
            question: format!("question {id}"),
            correct_answer: correct,
            explanation: Some("because".into()),
            category: None,
            difficulty: None,
        }
    }

    fn groups() -> QuestionGroups {
        QuestionGroups {
            text: vec![text("t1", "One"), text("t2", "Two")],
            multiple_choice: vec![mc("m1", "Two", 2), mc("m2", "One", 0)],
            true_false: vec![tf("f1", "One", true), tf("f2", "Two", false)],
        }
    }

    fn ids(pool: &[QuizQuestion]) -> Vec<&str> {
        pool.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn unfiltered_pool_keeps_category_order() {
        let pool = normalize_pool(&groups(), &PoolFilter::default());
        assert_eq!(ids(&pool), vec!["t1", "t2", "m1", "m2", "f1", "f2"]);
    }

    #[test]
    fn canonical_answer_per_type() {
        let pool = normalize_pool(&groups(), &PoolFilter::default());
        assert_eq!(pool[0].canonical_answer_text, "answer t1");
        assert_eq!(pool[0].category.as_deref(), Some("Basics"));
        assert_eq!(pool[2].canonical_answer_text, "C");
        assert_eq!(pool[4].canonical_answer_text, "True");
        assert_eq!(pool[5].canonical_answer_text, "False");
        assert_eq!(
            pool[5].kind,
            QuestionKind::TrueFalse {
                correct_boolean: false
            }
        );
    }

    #[test]
    fn chapter_filter_is_exact_and_order_preserving() {
        let filter = PoolFilter {
            chapter: Some("One".into()),
            question_type: TypeFilter::All,
        };
        let pool = normalize_pool(&groups(), &filter);
        assert_eq!(ids(&pool), vec!["t1", "m2", "f1"]);

        let filter = PoolFilter {
            chapter: Some("one".into()),
            question_type: TypeFilter::All,
        };
        assert!(normalize_pool(&groups(), &filter).is_empty());
    }

    #[test]
    fn type_filter_keeps_one_category() {
        let filter = PoolFilter {
            chapter: None,
            question_type: TypeFilter::Only(QuestionType::MultipleChoice),
        };
        let pool = normalize_pool(&groups(), &filter);
        assert_eq!(ids(&pool), vec!["m1", "m2"]);
    }

    #[test]
    fn out_of_range_index_yields_empty_canonical_text() {
        let groups = QuestionGroups {
            text: vec![],
            multiple_choice: vec![mc("bad", "One", 7), mc("good", "One", 1)],
            true_false: vec![],
        };
        let pool = normalize_pool(&groups, &PoolFilter::default());
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].canonical_answer_text, "");
        assert_eq!(pool[1].canonical_answer_text, "B");
    }

    #[test]
    fn negative_index_yields_empty_canonical_text() {
        let groups = QuestionGroups {
            text: vec![],
            multiple_choice: vec![mc("neg", "One", -1), mc("good", "One", 2)],
            true_false: vec![],
        };
        let pool = normalize_pool(&groups, &PoolFilter::default());
        assert_eq!(ids(&pool), vec!["neg", "good"]);
        assert_eq!(pool[0].canonical_answer_text, "");
        assert_eq!(
            pool[0].kind,
            QuestionKind::MultipleChoice {
                options: vec!["A".into(), "B".into(), "C".into()],
                correct_option_index: None,
            }
        );
        assert_eq!(pool[1].canonical_answer_text, "C");
    }

    #[test]
    fn empty_groups_make_empty_pool() {
        assert!(normalize_pool(&QuestionGroups::default(), &PoolFilter::default()).is_empty());
    }
}
