use std::sync::Arc;

use civics_core::model::{GameSettings, GameSettingsDraft};
use storage::repository::SettingsRepository;
use tracing::info;

use crate::error::SettingsServiceError;

#[derive(Clone)]
pub struct GameSettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl GameSettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings, if the learner saved any.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<Option<GameSettings>, SettingsServiceError> {
        Ok(self.repo.load_settings().await?)
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` if validation fails or persistence fails.
    pub async fn save(
        &self,
        draft: GameSettingsDraft,
    ) -> Result<GameSettings, SettingsServiceError> {
        let settings = draft.validate()?;
        self.repo.save_settings(&settings).await?;
        info!(
            target: "services::settings",
            state = settings.user_state(),
            max_questions = settings.max_questions(),
            win_threshold = settings.win_threshold(),
            "saved game settings"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn invalid_draft_leaves_saved_settings_untouched() {
        let service = GameSettingsService::new(Arc::new(InMemoryRepository::new()));
        assert_eq!(service.load().await.unwrap(), None);

        let saved = service
            .save(GameSettingsDraft::for_state("ca"))
            .await
            .unwrap();
        assert_eq!(saved.user_state(), "CA");

        let mut bad = GameSettingsDraft::for_state("CA");
        bad.win_threshold = 30;
        let err = service.save(bad).await.unwrap_err();
        assert!(matches!(err, SettingsServiceError::Settings(_)));

        assert_eq!(service.load().await.unwrap(), Some(saved));
    }
}
