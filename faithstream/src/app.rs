//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::database::{create_pool, Repository};
use crate::error::{AppError, Result};
use crate::services::{
    AppSettings, AuthService, CredentialManager, Dashboard, MediaService, NoticesService,
    SearchHistory, SettingsService, SuggestionClient,
};
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Central application state holding all services
pub struct AppState<S> {
    pub app_data_dir: PathBuf,
    pub settings: AppSettings,
    pub repo: Repository<S>,
    pub media_service: MediaService<S>,
    pub notices_service: NoticesService<S>,
    pub auth_service: AuthService<S>,
    pub search_history: SearchHistory<S>,
    pub suggestions: SuggestionClient,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(
        app_data_dir: PathBuf,
        settings: AppSettings,
        store: S,
        api_key: Option<String>,
    ) -> Self {
        let repo = Repository::new(store);
        let suggestions = SuggestionClient::new(
            api_key,
            settings.suggestions.model.clone(),
            settings.suggestions.base_url.clone(),
        );

        Self {
            app_data_dir,
            media_service: MediaService::new(repo.clone()),
            notices_service: NoticesService::new(repo.clone()),
            auth_service: AuthService::new(repo.clone()),
            search_history: SearchHistory::new(repo.store().clone()),
            suggestions,
            settings,
            repo,
        }
    }

    /// Dashboard for the logged-in admin
    pub async fn dashboard(&self) -> Result<Dashboard<S>> {
        let user = self
            .auth_service
            .restore_session()
            .await?
            .ok_or_else(|| AppError::PermissionDenied("Log in to use the dashboard".to_string()))?;

        Ok(Dashboard::new(user, self.repo.clone()))
    }
}

/// Platform data directory for the application
pub fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "faithstream", "faithstream")
        .ok_or_else(|| AppError::Generic("Failed to get app data dir".to_string()))?;
    Ok(dirs.data_dir().to_path_buf())
}

async fn prepare(app_data_dir: &Path) -> Result<AppSettings> {
    tracing::info!("App data directory: {:?}", app_data_dir);
    tokio::fs::create_dir_all(app_data_dir).await?;

    SettingsService::new(app_data_dir.to_path_buf()).load().await
}

/// Application setup backed by the SQLite store in `app_data_dir`
pub async fn setup(app_data_dir: PathBuf) -> Result<AppState<SqliteStore>> {
    tracing::info!("Initializing application");

    let settings = prepare(&app_data_dir).await?;
    let pool = create_pool(&app_data_dir.join(&settings.database_file)).await?;
    let (api_key, source) = CredentialManager::resolve_api_key();
    tracing::debug!("Suggestion API key source: {:?}", source);

    let state = AppState::new(app_data_dir, settings, SqliteStore::new(pool), api_key);

    tracing::info!("Application initialized successfully");
    Ok(state)
}

/// Application setup whose data lives only for this process
pub async fn setup_ephemeral(app_data_dir: PathBuf) -> Result<AppState<MemoryStore>> {
    tracing::info!("Initializing application with an in-memory store");

    let settings = prepare(&app_data_dir).await?;
    let (api_key, _) = CredentialManager::resolve_api_key();

    Ok(AppState::new(app_data_dir, settings, MemoryStore::new(), api_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::AdminRole;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_dashboard_requires_session() {
        let temp = TempDir::new().unwrap();
        let state = AppState::new(
            temp.path().to_path_buf(),
            AppSettings::default(),
            MemoryStore::new(),
            None,
        );

        assert!(matches!(
            state.dashboard().await,
            Err(AppError::PermissionDenied(_))
        ));

        state
            .auth_service
            .login("admin@church.com", "password")
            .await
            .unwrap();
        let dashboard = state.dashboard().await.unwrap();
        assert_eq!(dashboard.user().role, AdminRole::FullAccess);
    }

    #[tokio::test]
    async fn test_setup_creates_settings_and_database() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("data");

        let state = setup(data_dir.clone()).await.unwrap();

        assert!(data_dir.join("settings.json").exists());
        assert!(data_dir.join("faithstream.db").exists());
        assert_eq!(state.media_service.list_media().await.unwrap().len(), 2);
    }
}
