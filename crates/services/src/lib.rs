#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod settings_service;

pub use civics_core::Clock;
pub use sessions as session;

pub use error::{QuizServiceError, SettingsServiceError};
pub use sessions::{ActiveSession, QuizSessionService, SessionAnswerResult, SessionProgress};
pub use settings_service::GameSettingsService;
