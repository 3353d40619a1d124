use async_trait::async_trait;
use civics_core::model::{GameResult, GameSettings, HistoryMap};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Keys used by key-value backends.
pub mod keys {
    pub const ANSWER_HISTORY: &str = "civics.answer_history";
    pub const SETTINGS: &str = "civics.settings";
    pub const RESULTS: &str = "civics.results";
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Answer history per paired question.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Fetch the full history map; empty when nothing was stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stored value cannot be read or decoded.
    async fn load_history(&self) -> Result<HistoryMap, StorageError>;

    /// Replace the stored history with the latest snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_history(&self, history: &HistoryMap) -> Result<(), StorageError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch saved settings, or `None` when the learner never saved any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored record is invalid.
    async fn load_settings(&self) -> Result<Option<GameSettings>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be stored.
    async fn save_settings(&self, settings: &GameSettings) -> Result<(), StorageError>;
}

#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a finished session's result, returning its position in the log.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(&self, result: &GameResult) -> Result<usize, StorageError>;

    /// All stored results, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if stored results cannot be decoded.
    async fn list_results(&self) -> Result<Vec<GameResult>, StorageError>;
}

//
// ─── IN-MEMORY KEY-VALUE ───────────────────────────────────────────────────────
//

/// In-memory key-value repository.
///
/// Values are stored as JSON strings, so everything goes through the same
/// serialized form a browser or file backend would persist.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Raw stored value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    /// Overwrite the raw stored value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.into());
        Ok(())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.raw(key)?
            .map(|raw| serde_json::from_str(&raw).map_err(ser))
            .transpose()
    }

    fn put_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(ser)?;
        debug!(target: "storage", key, bytes = raw.len(), "stored value");
        self.put_raw(key, raw)
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn load_history(&self) -> Result<HistoryMap, StorageError> {
        Ok(self
            .get_json::<HistoryMap>(keys::ANSWER_HISTORY)?
            .unwrap_or_default())
    }

    async fn save_history(&self, history: &HistoryMap) -> Result<(), StorageError> {
        self.put_json(keys::ANSWER_HISTORY, history)
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn load_settings(&self) -> Result<Option<GameSettings>, StorageError> {
        self.get_json(keys::SETTINGS)
    }

    async fn save_settings(&self, settings: &GameSettings) -> Result<(), StorageError> {
        self.put_json(keys::SETTINGS, settings)
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(&self, result: &GameResult) -> Result<usize, StorageError> {
        let mut results: Vec<GameResult> = self.get_json(keys::RESULTS)?.unwrap_or_default();
        results.push(result.clone());
        self.put_json(keys::RESULTS, &results)?;
        Ok(results.len() - 1)
    }

    async fn list_results(&self) -> Result<Vec<GameResult>, StorageError> {
        Ok(self.get_json(keys::RESULTS)?.unwrap_or_default())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub history: Arc<dyn HistoryRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            history: Arc::new(repo.clone()),
            settings: Arc::new(repo.clone()),
            results: Arc::new(repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civics_core::model::{AnswerRecord, PairedQuestionId, QuestionNumber};
    use civics_core::time::fixed_now;

    #[tokio::test]
    async fn history_defaults_to_empty() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_round_trips_through_json() {
        let repo = InMemoryRepository::new();
        let id = PairedQuestionId::answer(QuestionNumber::new(20), 1);
        let history = HistoryMap::new().with_answer(id, AnswerRecord::new(fixed_now(), true));

        repo.save_history(&history).await.unwrap();

        let raw = repo.raw(keys::ANSWER_HISTORY).unwrap().unwrap();
        assert!(raw.contains("\"20-1\""));
        assert_eq!(repo.load_history().await.unwrap(), history);
    }

    #[tokio::test]
    async fn invalid_stored_settings_surface_as_serialization_error() {
        let repo = InMemoryRepository::new();
        repo.put_raw(
            keys::SETTINGS,
            r#"{"maxQuestions":10,"winThreshold":0,"userState":"CA"}"#,
        )
        .unwrap();

        let err = repo.load_settings().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.load_settings().await.unwrap(), None);

        let settings = GameSettings::new(10, 6, "OR", Some("3".into())).unwrap();
        repo.save_settings(&settings).await.unwrap();
        assert_eq!(repo.load_settings().await.unwrap(), Some(settings));
    }
}
