mod active;
mod progress;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::QuizServiceError;
pub use active::ActiveSession;
pub use progress::SessionProgress;
pub use workflow::{QuizSessionService, SessionAnswerResult};
