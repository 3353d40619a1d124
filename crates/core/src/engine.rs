//! Session lifecycle: creation, per-answer transition, and results.
//!
//! Every function here is pure over its inputs. Randomness comes from the
//! `RandomSource` argument and time from the timestamps the caller passes in.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error;

use crate::model::{
    AnswerSelection, FinishedSession, GameResult, GameSession, GameSettings, HistoryMap,
    PairedQuestion, PairedQuestionId, QuestionBank, QuestionDisplay, QuestionNumber, SessionId,
    SessionOutcome, SessionState,
};
use crate::random::{EntropyError, RandomSource, sample};
use crate::selector::select_many;
use crate::transform::build_pool;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,

    #[error("session already completed")]
    Completed,

    #[error("session is still in progress")]
    InProgress,

    #[error("expected an answer for {expected}, got {received}")]
    UnexpectedQuestion {
        expected: PairedQuestionId,
        received: PairedQuestionId,
    },

    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

//
// ─── CREATION ──────────────────────────────────────────────────────────────────
//

/// Inputs for a new session.
#[derive(Debug, Clone, Copy)]
pub struct NewSession<'a> {
    pub id: SessionId,
    pub settings: &'a GameSettings,
    pub prior_history: &'a HistoryMap,
    pub started_at: DateTime<Utc>,
}

/// Fewer questions were eligible than the settings asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortSession {
    pub requested: u32,
    pub available: usize,
}

/// A freshly created session and the questions it will serve, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStart {
    pub session: GameSession,
    pub served: Vec<PairedQuestion>,
    pub short: Option<ShortSession>,
    pub dropped: Vec<QuestionNumber>,
}

/// Build the eligible pool and draw the questions for a new session.
///
/// With prior history the draw is history-weighted, otherwise uniform.
///
/// # Errors
///
/// Returns `SessionError::Empty` when no question applies to the learner, and
/// `SessionError::Entropy` when the random source fails.
pub fn create_session<R>(
    bank: &QuestionBank,
    request: NewSession<'_>,
    source: &mut R,
) -> Result<SessionStart, SessionError>
where
    R: RandomSource + ?Sized,
{
    let settings = request.settings;
    let pool = build_pool(bank, settings, source)?;
    if pool.is_empty() {
        return Err(SessionError::Empty);
    }

    let requested = usize::try_from(settings.max_questions()).unwrap_or(usize::MAX);
    let count = requested.min(pool.len());
    let ids = pool.ids();

    let drawn = if request.prior_history.is_empty() {
        sample(source, &ids, count)?
    } else {
        select_many(&ids, request.prior_history, count, source)?
    };

    let mut by_id: HashMap<PairedQuestionId, PairedQuestion> = pool
        .questions
        .into_iter()
        .map(|q| (q.id(), q))
        .collect();
    let served: Vec<PairedQuestion> = drawn.iter().filter_map(|id| by_id.remove(id)).collect();
    let question_ids = served.iter().map(PairedQuestion::id).collect();

    let short = (ids.len() < requested).then_some(ShortSession {
        requested: settings.max_questions(),
        available: ids.len(),
    });

    let state = SessionState::start(
        request.id,
        question_ids,
        request.started_at,
        request.prior_history.clone(),
        settings.clone(),
    );

    Ok(SessionStart {
        session: GameSession::InProgress(state),
        served,
        short,
        dropped: pool.dropped,
    })
}

//
// ─── TRANSITION ────────────────────────────────────────────────────────────────
//

/// A learner's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: PairedQuestionId,
    pub selection: AnswerSelection,
    pub timestamp: DateTime<Utc>,
}

/// Validate an answer against its question and advance the session.
///
/// # Errors
///
/// See [`record_answer`]. `question` must be the served question matching
/// `answer.question_id`.
pub fn submit_answer(
    session: &GameSession,
    question: &PairedQuestion,
    answer: &SubmittedAnswer,
) -> Result<GameSession, SessionError> {
    if question.id() != answer.question_id {
        return Err(SessionError::UnexpectedQuestion {
            expected: question.id(),
            received: answer.question_id,
        });
    }
    let correct = question.is_correct(&answer.selection);
    record_answer(session, answer.question_id, correct, answer.timestamp)
}

/// Count one answer and evaluate the end conditions.
///
/// Fail is checked before win, win before normal completion. `at` is used both
/// for the history record and, on a terminal transition, for `completed_at`.
///
/// # Errors
///
/// Returns `SessionError::Completed` for a terminal session and
/// `SessionError::UnexpectedQuestion` if `question_id` is not the current question.
pub fn record_answer(
    session: &GameSession,
    question_id: PairedQuestionId,
    correct: bool,
    at: DateTime<Utc>,
) -> Result<GameSession, SessionError> {
    let GameSession::InProgress(state) = session else {
        return Err(SessionError::Completed);
    };
    let expected = state.current_question_id().ok_or(SessionError::Completed)?;
    if expected != question_id {
        return Err(SessionError::UnexpectedQuestion {
            expected,
            received: question_id,
        });
    }

    let next = state.answered(question_id, correct, at);
    Ok(settle(next, at))
}

fn settle(state: SessionState, at: DateTime<Utc>) -> GameSession {
    match state.end_condition() {
        Some(SessionOutcome::EarlyFail) => GameSession::EarlyFail(FinishedSession::new(state, at)),
        Some(SessionOutcome::EarlyWin) => GameSession::EarlyWin(FinishedSession::new(state, at)),
        Some(SessionOutcome::CompletedNormal) => {
            GameSession::CompletedNormal(FinishedSession::new(state, at))
        }
        None => GameSession::InProgress(state),
    }
}

//
// ─── RESULTS & DISPLAY ─────────────────────────────────────────────────────────
//

/// Summarize a terminal session.
///
/// # Errors
///
/// Returns `SessionError::InProgress` if the session has not ended.
pub fn result_of(session: &GameSession) -> Result<GameResult, SessionError> {
    GameResult::from_session(session).ok_or(SessionError::InProgress)
}

/// Presentation view of a served question. `position` is 1-based.
#[must_use]
pub fn display_of(question: &PairedQuestion, position: usize, total: usize) -> QuestionDisplay {
    question.display(position, total)
}
