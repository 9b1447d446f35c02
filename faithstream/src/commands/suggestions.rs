//! Title suggestion and API key commands

use crate::app::AppState;
use crate::database::Media;
use crate::error::{AppError, Result};
use crate::services::{CredentialManager, FormErrors, KeySource, MediaForm, MetadataSuggestion};
use crate::storage::KeyValueStore;
use serde::Serialize;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Run `fut` unless Ctrl+C arrives first; the future is dropped on interrupt
async fn until_interrupted<F: Future>(fut: F) -> Option<F::Output> {
    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler available: never interrupt
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        output = fut => Some(output),
        _ = interrupt => {
            tracing::info!("Interrupted, cancelling suggestion");
            None
        }
    }
}

/// Ask the model for a title; `None` when unavailable or cancelled
pub async fn suggest_metadata<S: KeyValueStore>(
    state: &AppState<S>,
    description: &str,
) -> Result<Option<MetadataSuggestion>> {
    if description.trim().is_empty() {
        return Err(AppError::Validation(
            "Enter a description first so AI can analyze it".to_string(),
        ));
    }

    // Dropping the pending handle on interrupt cancels the request task
    let pending = state.suggestions.spawn(description);
    Ok(until_interrupted(pending.wait()).await.flatten())
}

/// Retitle existing media from its description
pub async fn apply_suggested_title<S: KeyValueStore>(
    state: &AppState<S>,
    id: &str,
) -> Result<Option<Media>> {
    let dashboard = state.dashboard().await?;
    let existing = state.media_service.get_media(id).await?;

    let mut form = MediaForm::from_media(&existing);
    let mut errors = FormErrors::default();
    let cancel = CancellationToken::new();
    let changed = until_interrupted(dashboard.suggest_title(
        &state.suggestions,
        &mut form,
        &mut errors,
        &cancel,
    ))
    .await
    .unwrap_or(false);

    if let Some(message) = errors.description {
        return Err(AppError::Validation(message));
    }
    if !changed {
        return Ok(None);
    }

    dashboard.submit_media(Some(id), &form).await.map(Some)
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialStatus {
    pub configured: bool,
    pub source: KeySource,
}

pub async fn set_api_key(key: &str) -> Result<()> {
    CredentialManager::store_api_key(key)
}

pub async fn clear_api_key() -> Result<()> {
    CredentialManager::delete_api_key()
}

pub async fn api_key_status() -> Result<CredentialStatus> {
    let (key, source) = CredentialManager::resolve_api_key();
    Ok(CredentialStatus {
        configured: key.is_some(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AppSettings;
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    fn create_test_state(temp: &TempDir) -> AppState<MemoryStore> {
        AppState::new(
            temp.path().to_path_buf(),
            AppSettings::default(),
            MemoryStore::new(),
            None,
        )
    }

    #[tokio::test]
    async fn test_completed_future_is_returned() {
        assert_eq!(until_interrupted(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        let temp = TempDir::new().unwrap();
        let state = create_test_state(&temp);

        assert!(matches!(
            suggest_metadata(&state, "  ").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_without_key_nothing_changes() {
        let temp = TempDir::new().unwrap();
        let state = create_test_state(&temp);
        state
            .auth_service
            .login("admin@church.com", "password")
            .await
            .unwrap();

        assert!(suggest_metadata(&state, "grace").await.unwrap().is_none());
        assert!(apply_suggested_title(&state, "1").await.unwrap().is_none());
        assert_eq!(
            state.media_service.get_media("1").await.unwrap().title,
            "The Power of Grace"
        );
    }
}
