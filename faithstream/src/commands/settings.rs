//! Settings commands

use crate::app::AppState;
use crate::error::{AppError, Result};
use crate::services::{AppSettings, SettingsService, SuggestionSettings};
use crate::storage::KeyValueStore;

fn settings_service<S>(state: &AppState<S>) -> SettingsService {
    SettingsService::new(state.app_data_dir.clone())
}

/// Settings as stored on disk
pub async fn get_settings<S: KeyValueStore>(state: &AppState<S>) -> Result<AppSettings> {
    settings_service(state).load().await
}

/// Change the suggestion model or API base URL; takes effect on next start
pub async fn update_suggestion_settings<S: KeyValueStore>(
    state: &AppState<S>,
    model: Option<String>,
    base_url: Option<String>,
) -> Result<SuggestionSettings> {
    let service = settings_service(state);
    let mut suggestions = service.get_suggestions().await?;

    if let Some(model) = model {
        if model.trim().is_empty() {
            return Err(AppError::Validation("Model must not be empty".to_string()));
        }
        suggestions.model = model.trim().to_string();
    }
    if let Some(base_url) = base_url {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::Validation(format!(
                "Base URL must start with http:// or https://: {}",
                base_url
            )));
        }
        suggestions.base_url = base_url.trim_end_matches('/').to_string();
    }

    service.update_suggestions(suggestions.clone()).await?;
    Ok(suggestions)
}
