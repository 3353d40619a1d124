//! Shared error types for the services crate.

use thiserror::Error;

use civics_core::engine::SessionError;
use civics_core::model::SettingsError;
use storage::repository::StorageError;

/// Errors emitted by `GameSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizSessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("no game settings saved")]
    MissingSettings,
    #[error("random source lock poisoned")]
    RandomSourcePoisoned,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
