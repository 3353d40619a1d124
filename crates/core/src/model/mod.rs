mod history;
mod ids;
mod paired;
mod question;
mod result;
mod session;
mod settings;

pub use ids::{PairedQuestionId, PairedVariant, ParseIdError, QuestionNumber, SessionId};

pub use history::{AnswerHistory, AnswerRecord, HistoryMap};
pub use paired::{AnswerSelection, PairedQuestion, QuestionDisplay};
pub use question::{
    AnswerType, ChoiceSet, DistractorBank, DistractorEntry, LearnerContext, QuestionBank,
    RawQuestion, TaggedChoice,
};
pub use result::GameResult;
pub use session::{
    FAIL_THRESHOLD, FinishedSession, GameSession, SessionOutcome, SessionState, SnapshotError,
};
pub use settings::{
    DEFAULT_MAX_QUESTIONS, DEFAULT_WIN_THRESHOLD, GameSettings, GameSettingsDraft, SettingsError,
};
