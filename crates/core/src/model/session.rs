use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{AnswerRecord, GameSettings, HistoryMap, PairedQuestionId, SessionId};

/// Wrong answers that end a session immediately.
pub const FAIL_THRESHOLD: u32 = 9;

/// A stored session snapshot that no sequence of answers could have produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("{correct} correct + {incorrect} incorrect does not equal {total} answered")]
    CounterMismatch {
        correct: u32,
        incorrect: u32,
        total: u32,
    },

    #[error("question index {index} does not follow {total} answers over {questions} questions")]
    IndexMismatch {
        index: usize,
        total: u32,
        questions: usize,
    },

    #[error("{total} answers exceed the limit of {max_questions}")]
    TooManyAnswers { total: u32, max_questions: u32 },

    #[error("counters run past the end thresholds ({correct} correct, {incorrect} incorrect)")]
    PastThreshold { correct: u32, incorrect: u32 },

    #[error("session is tagged {recorded:?} but its counters say {expected:?}")]
    OutcomeMismatch {
        recorded: Option<SessionOutcome>,
        expected: Option<SessionOutcome>,
    },

    #[error("session completed before it started")]
    CompletedBeforeStart,
}

//
// ─── SHARED STATE ──────────────────────────────────────────────────────────────
//

/// Fields shared by every session state.
///
/// Counters only change through the session transition, which keeps
/// `correct_answers + incorrect_answers == total_answered`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionStateRecord", into = "SessionStateRecord")]
pub struct SessionState {
    id: SessionId,
    question_ids: Vec<PairedQuestionId>,
    current_index: usize,
    correct_answers: u32,
    incorrect_answers: u32,
    total_answered: u32,
    started_at: DateTime<Utc>,
    history: HistoryMap,
    settings: GameSettings,
}

impl SessionState {
    pub(crate) fn start(
        id: SessionId,
        question_ids: Vec<PairedQuestionId>,
        started_at: DateTime<Utc>,
        history: HistoryMap,
        settings: GameSettings,
    ) -> Self {
        Self {
            id,
            question_ids,
            current_index: 0,
            correct_answers: 0,
            incorrect_answers: 0,
            total_answered: 0,
            started_at,
            history,
            settings,
        }
    }

    /// Copy of this state with one more answer counted and recorded.
    pub(crate) fn answered(&self, id: PairedQuestionId, correct: bool, at: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.total_answered += 1;
        if correct {
            next.correct_answers += 1;
        } else {
            next.incorrect_answers += 1;
        }
        next.current_index += 1;
        next.history = self.history.with_answer(id, AnswerRecord::new(at, correct));
        next
    }

    /// The end condition these counters meet, if any.
    ///
    /// Fail is checked before win, win before normal completion.
    #[must_use]
    pub fn end_condition(&self) -> Option<SessionOutcome> {
        if self.incorrect_answers >= FAIL_THRESHOLD {
            Some(SessionOutcome::EarlyFail)
        } else if self.correct_answers >= self.settings.win_threshold() {
            Some(SessionOutcome::EarlyWin)
        } else if self.total_answered >= self.settings.max_questions() || self.remaining() == 0 {
            Some(SessionOutcome::CompletedNormal)
        } else {
            None
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn question_ids(&self) -> &[PairedQuestionId] {
        &self.question_ids
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Id of the question awaiting an answer, if any remain.
    #[must_use]
    pub fn current_question_id(&self) -> Option<PairedQuestionId> {
        self.question_ids.get(self.current_index).copied()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.question_ids.len().saturating_sub(self.current_index)
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.incorrect_answers
    }

    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Prior history plus every answer recorded in this session.
    #[must_use]
    pub fn history(&self) -> &HistoryMap {
        &self.history
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }
}

/// Wire form of `SessionState`; checked on the way back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionStateRecord {
    id: SessionId,
    question_ids: Vec<PairedQuestionId>,
    current_index: usize,
    correct_answers: u32,
    incorrect_answers: u32,
    total_answered: u32,
    started_at: DateTime<Utc>,
    history: HistoryMap,
    settings: GameSettings,
}

impl From<SessionState> for SessionStateRecord {
    fn from(state: SessionState) -> Self {
        Self {
            id: state.id,
            question_ids: state.question_ids,
            current_index: state.current_index,
            correct_answers: state.correct_answers,
            incorrect_answers: state.incorrect_answers,
            total_answered: state.total_answered,
            started_at: state.started_at,
            history: state.history,
            settings: state.settings,
        }
    }
}

impl TryFrom<SessionStateRecord> for SessionState {
    type Error = SnapshotError;

    fn try_from(record: SessionStateRecord) -> Result<Self, Self::Error> {
        let (correct, incorrect, total) = (
            record.correct_answers,
            record.incorrect_answers,
            record.total_answered,
        );
        if correct.checked_add(incorrect) != Some(total) {
            return Err(SnapshotError::CounterMismatch {
                correct,
                incorrect,
                total,
            });
        }
        let questions = record.question_ids.len();
        if usize::try_from(total).ok() != Some(record.current_index)
            || record.current_index > questions
        {
            return Err(SnapshotError::IndexMismatch {
                index: record.current_index,
                total,
                questions,
            });
        }
        let max_questions = record.settings.max_questions();
        if total > max_questions {
            return Err(SnapshotError::TooManyAnswers {
                total,
                max_questions,
            });
        }
        if incorrect > FAIL_THRESHOLD || correct > record.settings.win_threshold() {
            return Err(SnapshotError::PastThreshold { correct, incorrect });
        }

        Ok(Self {
            id: record.id,
            question_ids: record.question_ids,
            current_index: record.current_index,
            correct_answers: correct,
            incorrect_answers: incorrect,
            total_answered: total,
            started_at: record.started_at,
            history: record.history,
            settings: record.settings,
        })
    }
}

/// State of a session that reached a terminal tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedSession {
    state: SessionState,
    completed_at: DateTime<Utc>,
}

impl FinishedSession {
    pub(crate) fn new(state: SessionState, completed_at: DateTime<Utc>) -> Self {
        Self {
            state,
            completed_at,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionOutcome {
    EarlyWin,
    EarlyFail,
    CompletedNormal,
}

/// A game session: in progress, or ended in exactly one way.
///
/// Values are never mutated; every answer produces a new `GameSession`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameSessionRecord", into = "GameSessionRecord")]
pub enum GameSession {
    InProgress(SessionState),
    EarlyWin(FinishedSession),
    EarlyFail(FinishedSession),
    CompletedNormal(FinishedSession),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "session", rename_all = "camelCase")]
enum GameSessionRecord {
    InProgress(SessionState),
    EarlyWin(FinishedSession),
    EarlyFail(FinishedSession),
    CompletedNormal(FinishedSession),
}

impl From<GameSession> for GameSessionRecord {
    fn from(session: GameSession) -> Self {
        match session {
            GameSession::InProgress(state) => Self::InProgress(state),
            GameSession::EarlyWin(finished) => Self::EarlyWin(finished),
            GameSession::EarlyFail(finished) => Self::EarlyFail(finished),
            GameSession::CompletedNormal(finished) => Self::CompletedNormal(finished),
        }
    }
}

/// The tag must match what the counters say, and a terminal session must not
/// complete before it started.
impl TryFrom<GameSessionRecord> for GameSession {
    type Error = SnapshotError;

    fn try_from(record: GameSessionRecord) -> Result<Self, Self::Error> {
        let session = match record {
            GameSessionRecord::InProgress(state) => Self::InProgress(state),
            GameSessionRecord::EarlyWin(finished) => Self::EarlyWin(finished),
            GameSessionRecord::EarlyFail(finished) => Self::EarlyFail(finished),
            GameSessionRecord::CompletedNormal(finished) => Self::CompletedNormal(finished),
        };

        let expected = session.state().end_condition();
        if session.outcome() != expected {
            return Err(SnapshotError::OutcomeMismatch {
                recorded: session.outcome(),
                expected,
            });
        }
        if session
            .finished()
            .is_some_and(|f| f.completed_at() < f.state().started_at())
        {
            return Err(SnapshotError::CompletedBeforeStart);
        }
        Ok(session)
    }
}

impl GameSession {
    #[must_use]
    pub fn state(&self) -> &SessionState {
        match self {
            GameSession::InProgress(state) => state,
            GameSession::EarlyWin(finished)
            | GameSession::EarlyFail(finished)
            | GameSession::CompletedNormal(finished) => finished.state(),
        }
    }

    #[must_use]
    pub fn finished(&self) -> Option<&FinishedSession> {
        match self {
            GameSession::InProgress(_) => None,
            GameSession::EarlyWin(finished)
            | GameSession::EarlyFail(finished)
            | GameSession::CompletedNormal(finished) => Some(finished),
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self {
            GameSession::InProgress(_) => None,
            GameSession::EarlyWin(_) => Some(SessionOutcome::EarlyWin),
            GameSession::EarlyFail(_) => Some(SessionOutcome::EarlyFail),
            GameSession::CompletedNormal(_) => Some(SessionOutcome::CompletedNormal),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameSession::InProgress(_))
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.finished().map(FinishedSession::completed_at)
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.state().id()
    }

    #[must_use]
    pub fn history(&self) -> &HistoryMap {
        self.state().history()
    }

    #[must_use]
    pub fn current_question_id(&self) -> Option<PairedQuestionId> {
        match self {
            GameSession::InProgress(state) => state.current_question_id(),
            _ => None,
        }
    }
}
