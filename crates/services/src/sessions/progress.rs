use civics_core::model::GameSession;
use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProgress {
    pub total: usize,
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn of(session: &GameSession) -> Self {
        let state = session.state();
        let is_complete = session.is_terminal();
        Self {
            total: state.question_ids().len(),
            answered: state.total_answered(),
            correct: state.correct_answers(),
            incorrect: state.incorrect_answers(),
            remaining: if is_complete { 0 } else { state.remaining() },
            is_complete,
        }
    }
}
