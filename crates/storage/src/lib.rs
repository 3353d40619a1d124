#![forbid(unsafe_code)]

pub mod bank;
pub mod repository;

pub use bank::load_question_bank;
pub use repository::{
    HistoryRepository, InMemoryRepository, ResultRepository, SettingsRepository, Storage,
    StorageError,
};
