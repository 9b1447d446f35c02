//! Settings service
//!
//! Manages application settings persistence using JSON file storage.

use crate::config;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// Title suggestion configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionSettings {
    #[serde(default = "default_suggestion_model")]
    pub model: String,
    #[serde(default = "default_suggestion_base_url")]
    pub base_url: String,
}

fn default_suggestion_model() -> String {
    config::DEFAULT_SUGGESTION_MODEL.to_string()
}

fn default_suggestion_base_url() -> String {
    config::DEFAULT_SUGGESTION_BASE_URL.to_string()
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            model: default_suggestion_model(),
            base_url: default_suggestion_base_url(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub suggestions: SuggestionSettings,
    /// SQLite file name inside the data directory
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_database_file() -> String {
    "faithstream.db".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            suggestions: SuggestionSettings::default(),
            database_file: default_database_file(),
        }
    }
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join("settings.json"),
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !fs::try_exists(&self.settings_path).await? {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Generic(format!("Failed to serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    pub async fn get_suggestions(&self) -> Result<SuggestionSettings> {
        let settings = self.load().await?;
        Ok(settings.suggestions)
    }

    pub async fn update_suggestions(&self, suggestions: SuggestionSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.suggestions = suggestions;
        self.save(&settings).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.suggestions.model, "gemini-3-flash-preview");
        assert_eq!(
            settings.suggestions.base_url,
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(settings.database_file, "faithstream.db");
        assert!(temp.path().join("settings.json").exists());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(settings_path.clone());
            service
                .update_suggestions(SuggestionSettings {
                    model: "custom-model".to_string(),
                    base_url: "http://localhost:8080".to_string(),
                })
                .await
                .unwrap();
        }

        {
            let service = SettingsService::new(settings_path);
            let loaded = service.get_suggestions().await.unwrap();
            assert_eq!(loaded.model, "custom-model");
            assert_eq!(loaded.base_url, "http://localhost:8080");
        }
    }

    #[tokio::test]
    async fn test_missing_fields_take_defaults() {
        let (service, temp) = create_test_service();
        std::fs::write(
            temp.path().join("settings.json"),
            r#"{ "suggestions": { "model": "other" } }"#,
        )
        .unwrap();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.suggestions.model, "other");
        assert_eq!(
            settings.suggestions.base_url,
            config::DEFAULT_SUGGESTION_BASE_URL
        );
        assert_eq!(settings.database_file, "faithstream.db");
    }

    #[tokio::test]
    async fn test_unparseable_settings_is_an_error() {
        let (service, temp) = create_test_service();
        std::fs::write(temp.path().join("settings.json"), "{ nope").unwrap();

        assert!(matches!(service.load().await, Err(AppError::Generic(_))));
    }
}
