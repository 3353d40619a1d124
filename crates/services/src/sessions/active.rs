use civics_core::engine::{SessionStart, ShortSession, display_of};
use civics_core::model::{GameResult, GameSession, PairedQuestion, QuestionDisplay, QuestionNumber};

use super::progress::SessionProgress;

/// A running session together with the questions served to it.
///
/// The wrapped `GameSession` is replaced, never mutated, on each answer.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub(crate) session: GameSession,
    served: Vec<PairedQuestion>,
    short: Option<ShortSession>,
    dropped: Vec<QuestionNumber>,
    pub(crate) result_index: Option<usize>,
}

impl ActiveSession {
    pub(crate) fn new(start: SessionStart) -> Self {
        Self {
            session: start.session,
            served: start.served,
            short: start.short,
            dropped: start.dropped,
            result_index: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn served(&self) -> &[PairedQuestion] {
        &self.served
    }

    /// Set when fewer questions were available than the settings asked for.
    #[must_use]
    pub fn short(&self) -> Option<ShortSession> {
        self.short
    }

    /// Raw questions skipped because no answer applied to the learner.
    #[must_use]
    pub fn dropped(&self) -> &[QuestionNumber] {
        &self.dropped
    }

    /// Position of the persisted result once the session has ended.
    #[must_use]
    pub fn result_index(&self) -> Option<usize> {
        self.result_index
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_terminal()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&PairedQuestion> {
        let id = self.session.current_question_id()?;
        self.served
            .get(self.session.state().current_index())
            .filter(|question| question.id() == id)
    }

    #[must_use]
    pub fn current_display(&self) -> Option<QuestionDisplay> {
        let question = self.current_question()?;
        let position = self.session.state().current_index() + 1;
        Some(display_of(question, position, self.served.len()))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::of(&self.session)
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        GameResult::from_session(&self.session)
    }
}
