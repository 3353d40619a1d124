use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{GameSession, SessionId, SessionOutcome};

/// Immutable summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    session_id: SessionId,
    outcome: SessionOutcome,
    total_answered: u32,
    correct_answers: u32,
    incorrect_answers: u32,
    percentage: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl GameResult {
    /// Summarize a terminal session. Returns `None` while the session is in progress.
    #[must_use]
    pub fn from_session(session: &GameSession) -> Option<Self> {
        let outcome = session.outcome()?;
        let finished = session.finished()?;
        let state = finished.state();

        Some(Self {
            session_id: state.id(),
            outcome,
            total_answered: state.total_answered(),
            correct_answers: state.correct_answers(),
            incorrect_answers: state.incorrect_answers(),
            percentage: percentage(state.correct_answers(), state.total_answered()),
            started_at: state.started_at(),
            completed_at: finished.completed_at(),
        })
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    #[must_use]
    pub fn is_early_win(&self) -> bool {
        self.outcome == SessionOutcome::EarlyWin
    }

    #[must_use]
    pub fn is_early_fail(&self) -> bool {
        self.outcome == SessionOutcome::EarlyFail
    }

    #[must_use]
    pub fn is_completed_normal(&self) -> bool {
        self.outcome == SessionOutcome::CompletedNormal
    }

    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.incorrect_answers
    }

    /// Share of correct answers, rounded half up; `0` when nothing was answered.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (correct, total) = (u64::from(correct), u64::from(total));
    let rounded = (correct * 200 + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}
