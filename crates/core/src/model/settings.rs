use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionNumber;
use crate::model::question::LearnerContext;

/// Questions asked per session in the civics test format.
pub const DEFAULT_MAX_QUESTIONS: u32 = 20;

/// Correct answers needed to pass.
pub const DEFAULT_WIN_THRESHOLD: u32 = 12;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("max questions must be > 0")]
    InvalidMaxQuestions,

    #[error("win threshold must be > 0")]
    InvalidWinThreshold,

    #[error("win threshold ({win_threshold}) exceeds max questions ({max_questions})")]
    ThresholdExceedsMax {
        win_threshold: u32,
        max_questions: u32,
    },

    #[error("user state cannot be empty")]
    EmptyState,

    #[error("question subset cannot be empty when provided")]
    EmptyQuestionSubset,
}

/// Per-learner game configuration.
///
/// Always validated: a `GameSettings` value can be handed to the session engine
/// without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameSettingsDraft", into = "GameSettingsDraft")]
pub struct GameSettings {
    max_questions: u32,
    win_threshold: u32,
    user_state: String,
    user_district: Option<String>,
    question_numbers: Option<Vec<QuestionNumber>>,
}

/// Unvalidated settings, as entered by the learner or read from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsDraft {
    pub max_questions: u32,
    pub win_threshold: u32,
    pub user_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_numbers: Option<Vec<QuestionNumber>>,
}

impl GameSettingsDraft {
    /// Draft with the standard test format for a learner in `user_state`.
    #[must_use]
    pub fn for_state(user_state: impl Into<String>) -> Self {
        Self {
            max_questions: DEFAULT_MAX_QUESTIONS,
            win_threshold: DEFAULT_WIN_THRESHOLD,
            user_state: user_state.into(),
            user_district: None,
            question_numbers: None,
        }
    }

    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` for zero thresholds, a win threshold above the
    /// question count, a blank state, or an empty explicit question subset.
    pub fn validate(self) -> Result<GameSettings, SettingsError> {
        if self.max_questions == 0 {
            return Err(SettingsError::InvalidMaxQuestions);
        }
        if self.win_threshold == 0 {
            return Err(SettingsError::InvalidWinThreshold);
        }
        if self.win_threshold > self.max_questions {
            return Err(SettingsError::ThresholdExceedsMax {
                win_threshold: self.win_threshold,
                max_questions: self.max_questions,
            });
        }

        let user_state = self.user_state.trim().to_ascii_uppercase();
        if user_state.is_empty() {
            return Err(SettingsError::EmptyState);
        }
        let user_district = self
            .user_district
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if self.question_numbers.as_ref().is_some_and(Vec::is_empty) {
            return Err(SettingsError::EmptyQuestionSubset);
        }

        Ok(GameSettings {
            max_questions: self.max_questions,
            win_threshold: self.win_threshold,
            user_state,
            user_district,
            question_numbers: self.question_numbers,
        })
    }
}

impl GameSettings {
    /// # Errors
    ///
    /// See [`GameSettingsDraft::validate`].
    pub fn new(
        max_questions: u32,
        win_threshold: u32,
        user_state: impl Into<String>,
        user_district: Option<String>,
    ) -> Result<Self, SettingsError> {
        GameSettingsDraft {
            max_questions,
            win_threshold,
            user_state: user_state.into(),
            user_district,
            question_numbers: None,
        }
        .validate()
    }

    /// Standard 20-question / 12-to-pass settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::EmptyState` for a blank state.
    pub fn standard(user_state: impl Into<String>) -> Result<Self, SettingsError> {
        GameSettingsDraft::for_state(user_state).validate()
    }

    /// Restricts the session to an explicit set of question numbers.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::EmptyQuestionSubset` for an empty list.
    pub fn with_question_numbers(
        self,
        numbers: Vec<QuestionNumber>,
    ) -> Result<Self, SettingsError> {
        GameSettingsDraft {
            question_numbers: Some(numbers),
            ..GameSettingsDraft::from(self)
        }
        .validate()
    }

    #[must_use]
    pub fn max_questions(&self) -> u32 {
        self.max_questions
    }

    #[must_use]
    pub fn win_threshold(&self) -> u32 {
        self.win_threshold
    }

    #[must_use]
    pub fn user_state(&self) -> &str {
        &self.user_state
    }

    #[must_use]
    pub fn user_district(&self) -> Option<&str> {
        self.user_district.as_deref()
    }

    #[must_use]
    pub fn question_numbers(&self) -> Option<&[QuestionNumber]> {
        self.question_numbers.as_deref()
    }

    #[must_use]
    pub fn learner_context(&self) -> LearnerContext {
        LearnerContext::new(self.user_state.clone(), self.user_district.clone())
    }
}

impl TryFrom<GameSettingsDraft> for GameSettings {
    type Error = SettingsError;

    fn try_from(draft: GameSettingsDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<GameSettings> for GameSettingsDraft {
    fn from(settings: GameSettings) -> Self {
        Self {
            max_questions: settings.max_questions,
            win_threshold: settings.win_threshold,
            user_state: settings.user_state,
            user_district: settings.user_district,
            question_numbers: settings.question_numbers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_settings_use_test_format() {
        let settings = GameSettings::standard("ca").unwrap();
        assert_eq!(settings.max_questions(), 20);
        assert_eq!(settings.win_threshold(), 12);
        assert_eq!(settings.user_state(), "CA");
    }

    #[test]
    fn rejects_zero_thresholds() {
        assert_eq!(
            GameSettings::new(0, 1, "CA", None).unwrap_err(),
            SettingsError::InvalidMaxQuestions
        );
        assert_eq!(
            GameSettings::new(10, 0, "CA", None).unwrap_err(),
            SettingsError::InvalidWinThreshold
        );
    }

    #[test]
    fn rejects_win_threshold_above_max() {
        let err = GameSettings::new(10, 11, "CA", None).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::ThresholdExceedsMax {
                win_threshold: 11,
                max_questions: 10
            }
        ));
    }

    #[test]
    fn blank_district_is_dropped() {
        let settings = GameSettings::new(20, 12, "NY", Some("  ".into())).unwrap();
        assert_eq!(settings.user_district(), None);
    }

    #[test]
    fn empty_subset_is_rejected() {
        let err = GameSettings::standard("TX")
            .unwrap()
            .with_question_numbers(Vec::new())
            .unwrap_err();
        assert_eq!(err, SettingsError::EmptyQuestionSubset);
    }

    #[test]
    fn invalid_persisted_settings_fail_to_deserialize() {
        let json = r#"{"maxQuestions":5,"winThreshold":6,"userState":"CA"}"#;
        assert!(serde_json::from_str::<GameSettings>(json).is_err());

        let ok = r#"{"maxQuestions":5,"winThreshold":3,"userState":"ca","userDistrict":"12"}"#;
        let settings: GameSettings = serde_json::from_str(ok).unwrap();
        assert_eq!(settings.user_state(), "CA");
        assert_eq!(settings.user_district(), Some("12"));
    }
}
