use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable number of a question in the civics bank.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionNumber(u32);

impl QuestionNumber {
    /// Creates a new `QuestionNumber`
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Which slice of a raw question a paired question tracks.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum PairedVariant {
    /// One correct answer fanned out from a single-answer question.
    Answer(usize),
    /// A multi-answer question tracked as one unit.
    Unified,
}

/// Identifier of a trackable paired question.
///
/// Renders as `"{question_number}-{answer_index}"` or `"{question_number}-unified"`,
/// which is also the key used in persisted answer histories.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PairedQuestionId {
    question_number: QuestionNumber,
    variant: PairedVariant,
}

impl PairedQuestionId {
    #[must_use]
    pub fn answer(question_number: QuestionNumber, answer_index: usize) -> Self {
        Self {
            question_number,
            variant: PairedVariant::Answer(answer_index),
        }
    }

    #[must_use]
    pub fn unified(question_number: QuestionNumber) -> Self {
        Self {
            question_number,
            variant: PairedVariant::Unified,
        }
    }

    #[must_use]
    pub fn question_number(&self) -> QuestionNumber {
        self.question_number
    }

    #[must_use]
    pub fn variant(&self) -> PairedVariant {
        self.variant
    }

    #[must_use]
    pub fn is_unified(&self) -> bool {
        matches!(self.variant, PairedVariant::Unified)
    }
}

/// Unique identifier for a game session
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random `SessionId`
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionNumber({})", self.0)
    }
}

impl fmt::Debug for PairedQuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairedQuestionId({self})")
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PairedQuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant {
            PairedVariant::Answer(index) => write!(f, "{}-{index}", self.question_number),
            PairedVariant::Unified => write!(f, "{}-unified", self.question_number),
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from {:?}", self.kind, self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionNumber {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .map(QuestionNumber::new)
            .map_err(|_| ParseIdError {
                kind: "QuestionNumber",
                raw: s.to_owned(),
            })
    }
}

impl FromStr for PairedQuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError {
            kind: "PairedQuestionId",
            raw: s.to_owned(),
        };
        let (number, suffix) = s.split_once('-').ok_or_else(err)?;
        let question_number = number.parse::<QuestionNumber>().map_err(|_| err())?;
        if suffix == "unified" {
            return Ok(Self::unified(question_number));
        }
        // Reject signs and padding that `usize::from_str` would otherwise accept.
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let index = suffix.parse::<usize>().map_err(|_| err())?;
        Ok(Self::answer(question_number, index))
    }
}

impl From<PairedQuestionId> for String {
    fn from(id: PairedQuestionId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PairedQuestionId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paired_id_display_uses_answer_index() {
        let id = PairedQuestionId::answer(QuestionNumber::new(20), 1);
        assert_eq!(id.to_string(), "20-1");
    }

    #[test]
    fn paired_id_display_unified() {
        let id = PairedQuestionId::unified(QuestionNumber::new(45));
        assert_eq!(id.to_string(), "45-unified");
        assert!(id.is_unified());
    }

    #[test]
    fn paired_id_parses_both_forms() {
        let single: PairedQuestionId = "7-3".parse().unwrap();
        assert_eq!(single, PairedQuestionId::answer(QuestionNumber::new(7), 3));

        let unified: PairedQuestionId = "12-unified".parse().unwrap();
        assert_eq!(unified, PairedQuestionId::unified(QuestionNumber::new(12)));
    }

    #[test]
    fn paired_id_rejects_plain_question_number() {
        assert!("42".parse::<PairedQuestionId>().is_err());
        assert!("42-".parse::<PairedQuestionId>().is_err());
        assert!("42-+1".parse::<PairedQuestionId>().is_err());
        assert!("x-1".parse::<PairedQuestionId>().is_err());
        assert!("42-all".parse::<PairedQuestionId>().is_err());
    }

    #[test]
    fn paired_id_serializes_as_string() {
        let id = PairedQuestionId::answer(QuestionNumber::new(3), 0);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"3-0\"");
        let back: PairedQuestionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn question_number_from_str_invalid() {
        let result = "not-a-number".parse::<QuestionNumber>();
        assert!(result.is_err());
    }
}
