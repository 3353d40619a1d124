use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::PairedQuestionId;

/// One recorded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub timestamp: DateTime<Utc>,
    pub correct: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, correct: bool) -> Self {
        Self { timestamp, correct }
    }
}

/// Append-only answer log for one paired question, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerHistory(Vec<AnswerRecord>);

impl AnswerHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records(records: Vec<AnswerRecord>) -> Self {
        Self(records)
    }

    /// Returns a copy with `record` appended.
    #[must_use]
    pub fn appended(&self, record: AnswerRecord) -> Self {
        let mut records = self.0.clone();
        records.push(record);
        Self(records)
    }

    #[must_use]
    pub fn records(&self) -> &[AnswerRecord] {
        &self.0
    }

    /// The `count` most recent records, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> &[AnswerRecord] {
        let start = self.0.len().saturating_sub(count);
        &self.0[start..]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Answer histories for every paired question the learner has seen.
///
/// Keys serialize as `"{n}-{index}"` / `"{n}-unified"` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryMap(BTreeMap<PairedQuestionId, AnswerHistory>);

impl HistoryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: PairedQuestionId) -> Option<&AnswerHistory> {
        self.0.get(&id)
    }

    /// Returns a copy with `record` appended to the history of `id`.
    #[must_use]
    pub fn with_answer(&self, id: PairedQuestionId, record: AnswerRecord) -> Self {
        let mut map = self.0.clone();
        let history = map.get(&id).map_or_else(
            || AnswerHistory::new().appended(record),
            |existing| existing.appended(record),
        );
        map.insert(id, history);
        Self(map)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairedQuestionId, &AnswerHistory)> {
        self.0.iter()
    }
}

impl FromIterator<(PairedQuestionId, AnswerHistory)> for HistoryMap {
    fn from_iter<I: IntoIterator<Item = (PairedQuestionId, AnswerHistory)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
