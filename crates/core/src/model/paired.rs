use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::PairedQuestionId;

//
// ─── ANSWER SELECTION ──────────────────────────────────────────────────────────
//

/// One index or a set of indices into a shuffled answer list.
///
/// Used both for what the learner picked and for where the correct answers sit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerSelection {
    Single(usize),
    Multiple(BTreeSet<usize>),
}

impl AnswerSelection {
    #[must_use]
    pub fn multiple(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::Multiple(indices.into_iter().collect())
    }

    /// Normalizes to a set of indices.
    #[must_use]
    pub fn to_set(&self) -> BTreeSet<usize> {
        match self {
            AnswerSelection::Single(index) => BTreeSet::from([*index]),
            AnswerSelection::Multiple(indices) => indices.clone(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            AnswerSelection::Single(_) => 1,
            AnswerSelection::Multiple(indices) => indices.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        match self {
            AnswerSelection::Single(i) => *i == index,
            AnswerSelection::Multiple(indices) => indices.contains(&index),
        }
    }
}

//
// ─── PAIRED QUESTION ───────────────────────────────────────────────────────────
//

/// The unit the learner is quizzed and tracked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedQuestion {
    id: PairedQuestionId,
    theme: String,
    section: String,
    question: String,
    answers: Vec<String>,
    correct: AnswerSelection,
    correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected_answers: Option<u32>,
}

impl PairedQuestion {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: PairedQuestionId,
        theme: String,
        section: String,
        question: String,
        answers: Vec<String>,
        correct: AnswerSelection,
        correct_answer: String,
        expected_answers: Option<u32>,
    ) -> Self {
        Self {
            id,
            theme,
            section,
            question,
            answers,
            correct,
            correct_answer,
            expected_answers,
        }
    }

    #[must_use]
    pub fn id(&self) -> PairedQuestionId {
        self.id
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Shuffled answer list as shown to the learner.
    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn correct(&self) -> &AnswerSelection {
        &self.correct
    }

    /// Correct answer text; multi-answer questions join their answers with `", "`.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn expected_answers(&self) -> Option<u32> {
        self.expected_answers
    }

    /// Checks a learner selection against this question's correct indices.
    #[must_use]
    pub fn is_correct(&self, selection: &AnswerSelection) -> bool {
        crate::validator::is_valid_answer(selection, &self.correct, self.expected_answers)
    }

    /// View model handed to the presentation layer.
    ///
    /// `position` is 1-based.
    #[must_use]
    pub fn display(&self, position: usize, total: usize) -> QuestionDisplay {
        QuestionDisplay {
            id: self.id,
            text: self.question.clone(),
            answers: self.answers.clone(),
            correct: self.correct.clone(),
            expected_answers: self.expected_answers,
            position,
            total,
        }
    }
}

/// Everything the presentation layer needs to render one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionDisplay {
    pub id: PairedQuestionId,
    pub text: String,
    pub answers: Vec<String>,
    pub correct: AnswerSelection,
    pub expected_answers: Option<u32>,
    pub position: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionNumber;

    fn sample() -> PairedQuestion {
        PairedQuestion::new(
            PairedQuestionId::answer(QuestionNumber::new(1), 0),
            "American Government".into(),
            "Principles".into(),
            "What is the supreme law of the land?".into(),
            vec![
                "the Bill of Rights".into(),
                "the Constitution".into(),
                "the Declaration".into(),
                "the Federalist Papers".into(),
            ],
            AnswerSelection::Single(1),
            "the Constitution".into(),
            None,
        )
    }

    #[test]
    fn selection_normalizes_to_set() {
        assert_eq!(AnswerSelection::Single(3).to_set(), BTreeSet::from([3]));
        assert_eq!(
            AnswerSelection::multiple([2, 0, 2]).to_set(),
            BTreeSet::from([0, 2])
        );
    }

    #[test]
    fn display_carries_position_and_total() {
        let view = sample().display(3, 20);
        assert_eq!(view.position, 3);
        assert_eq!(view.total, 20);
        assert_eq!(view.answers.len(), 4);
        assert_eq!(view.correct, AnswerSelection::Single(1));
        assert_eq!(view.text, "What is the supreme law of the land?");
    }

    #[test]
    fn question_checks_its_own_answer() {
        let q = sample();
        assert!(q.is_correct(&AnswerSelection::Single(1)));
        assert!(!q.is_correct(&AnswerSelection::Single(0)));
    }
}
