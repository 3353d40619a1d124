use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use civics_core::engine::{NewSession, SessionError, SubmittedAnswer, create_session, submit_answer};
use civics_core::model::{
    AnswerSelection, GameResult, GameSettings, PairedQuestionId, QuestionBank, SessionId,
};
use civics_core::{Clock, RandomSource, RngSource};
use serde::Serialize;
use storage::repository::{HistoryRepository, ResultRepository, SettingsRepository, Storage};
use tracing::{debug, info, warn};

use super::active::ActiveSession;
use crate::error::QuizServiceError;

type SharedSource = Arc<Mutex<Box<dyn RandomSource + Send>>>;

/// Outcome of answering the current question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAnswerResult {
    pub question_id: PairedQuestionId,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
    /// Display text of the correct answer, for feedback.
    pub correct_answer: String,
    pub is_complete: bool,
    pub result: Option<GameResult>,
}

/// Orchestrates session start and persisted answering.
///
/// Time comes from the injected `Clock` and every draw from the injected
/// random source; the core never reads either on its own.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    history: Arc<dyn HistoryRepository>,
    settings: Arc<dyn SettingsRepository>,
    results: Arc<dyn ResultRepository>,
    random: SharedSource,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        history: Arc<dyn HistoryRepository>,
        settings: Arc<dyn SettingsRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            bank,
            history,
            settings,
            results,
            random: Arc::new(Mutex::new(Box::new(RngSource::from_os()))),
        }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, bank: Arc<QuestionBank>, storage: &Storage) -> Self {
        Self::new(
            clock,
            bank,
            Arc::clone(&storage.history),
            Arc::clone(&storage.settings),
            Arc::clone(&storage.results),
        )
    }

    /// Replace the random source, e.g. with a seeded or replayed one.
    #[must_use]
    pub fn with_random_source(mut self, source: impl RandomSource + Send + 'static) -> Self {
        self.random = Arc::new(Mutex::new(Box::new(source)));
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Start a session with the learner's saved settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::MissingSettings` when nothing was saved, or the
    /// errors of [`Self::start_session_with`].
    pub async fn start_session(&self) -> Result<ActiveSession, QuizServiceError> {
        let settings = self
            .settings
            .load_settings()
            .await?
            .ok_or(QuizServiceError::MissingSettings)?;
        self.start_session_with(&settings).await
    }

    /// Start a session with explicit settings, weighted by stored history.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError` for storage failures, an empty question pool,
    /// or a failing random source.
    pub async fn start_session_with(
        &self,
        settings: &GameSettings,
    ) -> Result<ActiveSession, QuizServiceError> {
        let prior_history = self.history.load_history().await?;
        let request = NewSession {
            id: SessionId::generate(),
            settings,
            prior_history: &prior_history,
            started_at: self.clock.now(),
        };

        let start = {
            let mut source = self
                .random
                .lock()
                .map_err(|_| QuizServiceError::RandomSourcePoisoned)?;
            create_session(&self.bank, request, &mut **source)?
        };

        for number in &start.dropped {
            debug!(
                target: "services::session",
                question = %number,
                state = settings.user_state(),
                "no applicable answer; question skipped"
            );
        }
        if let Some(short) = start.short {
            warn!(
                target: "services::session",
                requested = short.requested,
                available = short.available,
                "fewer questions available than requested"
            );
        }
        info!(
            target: "services::session",
            session = %start.session.id(),
            questions = start.served.len(),
            prior_tracked = prior_history.len(),
            "session started"
        );

        Ok(ActiveSession::new(start))
    }

    /// Answer the current question, persist the new history snapshot, and
    /// append the result once the session ends.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` (wrapped) for a finished session, or
    /// `QuizServiceError::Storage` if persistence fails. On error the active
    /// session is left unchanged.
    pub async fn answer_current(
        &self,
        active: &mut ActiveSession,
        selection: AnswerSelection,
    ) -> Result<SessionAnswerResult, QuizServiceError> {
        let question = active
            .current_question()
            .cloned()
            .ok_or(SessionError::Completed)?;
        let answer = SubmittedAnswer {
            question_id: question.id(),
            selection,
            timestamp: self.clock.now(),
        };

        let next = submit_answer(active.session(), &question, &answer)?;
        let correct =
            next.state().correct_answers() > active.session().state().correct_answers();

        self.history.save_history(next.history()).await?;
        debug!(
            target: "services::session",
            question = %answer.question_id,
            correct,
            correct_total = next.state().correct_answers(),
            incorrect_total = next.state().incorrect_answers(),
            "answer recorded"
        );

        let result = GameResult::from_session(&next);
        if let Some(result) = &result {
            let index = self.results.append_result(result).await?;
            active.result_index = Some(index);
            info!(
                target: "services::session",
                session = %result.session_id(),
                outcome = ?result.outcome(),
                correct = result.correct_answers(),
                total = result.total_answered(),
                percentage = result.percentage(),
                "session finished"
            );
        }

        active.session = next;
        Ok(SessionAnswerResult {
            question_id: answer.question_id,
            correct,
            answered_at: answer.timestamp,
            correct_answer: question.correct_answer().to_owned(),
            is_complete: active.is_complete(),
            result,
        })
    }

    /// Results of earlier sessions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if results cannot be read.
    pub async fn past_results(&self) -> Result<Vec<GameResult>, QuizServiceError> {
        Ok(self.results.list_results().await?)
    }
}
