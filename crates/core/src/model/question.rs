use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::QuestionNumber;

//
// ─── ANSWER TYPE ───────────────────────────────────────────────────────────────
//

/// How the correct answers of a raw question are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerType {
    /// Static answers, the same for every learner.
    Text,
    /// The learner's U.S. senators.
    Senator,
    /// The learner's U.S. representative, narrowed by district when known.
    Representative,
    /// The learner's governor.
    Governor,
    /// The learner's state capital.
    Capital,
}

//
// ─── CHOICES ───────────────────────────────────────────────────────────────────
//

/// A correct answer that only applies to one state (and optionally one district).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedChoice {
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub answer: String,
}

impl TaggedChoice {
    #[must_use]
    pub fn new(state: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            district: None,
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }
}

/// Correct answers as supplied by the data-provisioning collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceSet {
    Static(Vec<String>),
    Tagged(Vec<TaggedChoice>),
}

//
// ─── LEARNER CONTEXT ───────────────────────────────────────────────────────────
//

/// Where the learner lives; used to resolve state-specific answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerContext {
    pub state: String,
    pub district: Option<String>,
}

impl LearnerContext {
    #[must_use]
    pub fn new(state: impl Into<String>, district: Option<String>) -> Self {
        Self {
            state: state.into(),
            district,
        }
    }

    fn matches_state(&self, state: &str) -> bool {
        self.state.trim().eq_ignore_ascii_case(state.trim())
    }

    fn matches_district(&self, district: Option<&str>) -> bool {
        match (self.district.as_deref(), district) {
            (Some(mine), Some(theirs)) => mine.trim().eq_ignore_ascii_case(theirs.trim()),
            // At-large seats carry no district and apply to every district of the state.
            _ => true,
        }
    }
}

//
// ─── RAW QUESTION ──────────────────────────────────────────────────────────────
//

fn default_expected_answers() -> u32 {
    1
}

/// One question of the civics bank, before it is split into trackable units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub question_number: QuestionNumber,
    pub theme: String,
    pub section: String,
    pub question: String,
    pub answer_type: AnswerType,
    #[serde(default = "default_expected_answers")]
    pub expected_answers: u32,
    pub choices: ChoiceSet,
}

impl RawQuestion {
    /// Correct answers that apply to this learner, de-duplicated in source order.
    ///
    /// An empty result means the question cannot be asked for this learner.
    #[must_use]
    pub fn applicable_answers(&self, context: &LearnerContext) -> Vec<String> {
        let candidates: Vec<&str> = match &self.choices {
            ChoiceSet::Static(answers) => answers.iter().map(String::as_str).collect(),
            ChoiceSet::Tagged(choices) => choices
                .iter()
                .filter(|choice| context.matches_state(&choice.state))
                .filter(|choice| {
                    self.answer_type != AnswerType::Representative
                        || context.matches_district(choice.district.as_deref())
                })
                .map(|choice| choice.answer.as_str())
                .collect(),
        };

        let mut answers: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let trimmed = candidate.trim();
            if !trimmed.is_empty() && !answers.iter().any(|a| a == trimmed) {
                answers.push(trimmed.to_owned());
            }
        }
        answers
    }
}

//
// ─── DISTRACTORS ───────────────────────────────────────────────────────────────
//

/// Incorrect choices for one question number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistractorEntry {
    pub question_number: QuestionNumber,
    pub choices: Vec<String>,
}

/// Distractor pools keyed by question number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DistractorEntry>", into = "Vec<DistractorEntry>")]
pub struct DistractorBank {
    pools: HashMap<QuestionNumber, Vec<String>>,
}

impl DistractorBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds choices to a question's pool, extending any existing entry.
    pub fn insert(&mut self, question_number: QuestionNumber, choices: Vec<String>) {
        self.pools.entry(question_number).or_default().extend(choices);
    }

    /// Pool for a question; empty when the bank has no entry.
    #[must_use]
    pub fn pool(&self, question_number: QuestionNumber) -> &[String] {
        self.pools
            .get(&question_number)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl From<Vec<DistractorEntry>> for DistractorBank {
    fn from(entries: Vec<DistractorEntry>) -> Self {
        let mut bank = Self::new();
        for entry in entries {
            bank.insert(entry.question_number, entry.choices);
        }
        bank
    }
}

impl From<DistractorBank> for Vec<DistractorEntry> {
    fn from(bank: DistractorBank) -> Self {
        let mut entries: Vec<DistractorEntry> = bank
            .pools
            .into_iter()
            .map(|(question_number, choices)| DistractorEntry {
                question_number,
                choices,
            })
            .collect();
        entries.sort_by_key(|e| e.question_number);
        entries
    }
}

/// Everything the data-provisioning collaborator hands to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub questions: Vec<RawQuestion>,
    #[serde(default)]
    pub distractors: DistractorBank,
}

impl QuestionBank {
    #[must_use]
    pub fn new(questions: Vec<RawQuestion>, distractors: DistractorBank) -> Self {
        Self {
            questions,
            distractors,
        }
    }
}
