//! Media commands
//!
//! Library browsing, playback and download counters, and the staff
//! create/edit/delete flow.

use crate::app::AppState;
use crate::config;
use crate::database::{Category, Media};
use crate::error::{AppError, Result};
use crate::services::{
    uploads, DownloadTicket, FileInfo, FormErrors, LibraryStats, MediaForm, MediaQuery, Player,
    PlayerState,
};
use crate::storage::KeyValueStore;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::watch;

/// Field values supplied for a create or edit; `None` keeps the form value
#[derive(Debug, Clone, Default)]
pub struct MediaInput {
    pub title: Option<String>,
    pub preacher: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub date_preached: Option<NaiveDate>,
    pub duration: Option<String>,
    pub audio: Option<PathBuf>,
    pub thumbnail: Option<PathBuf>,
}

impl MediaInput {
    async fn fill(self, form: &mut MediaForm) -> Result<FormErrors> {
        let mut errors = FormErrors::default();

        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(preacher) = self.preacher {
            form.preacher = preacher;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(date) = self.date_preached {
            form.date_preached = Some(date);
        }
        if let Some(duration) = self.duration {
            form.duration = duration;
        }
        if let Some(path) = self.audio {
            let file = FileInfo::from_path(&path).await?;
            let url = file_url(&path).await;
            if form.attach_audio(&mut errors, &file, &url) {
                report_upload(&file.name).await;
            }
        }
        if let Some(path) = self.thumbnail {
            let file = FileInfo::from_path(&path).await?;
            let url = file_url(&path).await;
            if form.attach_thumbnail(&mut errors, &file, &url) {
                report_upload(&file.name).await;
            }
        }

        Ok(errors)
    }
}

async fn file_url(path: &Path) -> String {
    let absolute = tokio::fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}

/// Log simulated upload progress until it completes
async fn report_upload(name: &str) {
    let (tx, mut rx) = watch::channel(0u8);
    let task = tokio::spawn(uploads::simulate_upload(
        tx,
        Duration::from_millis(config::UPLOAD_TICK_MS),
    ));

    while rx.changed().await.is_ok() {
        tracing::debug!("Uploading {}: {}%", name, *rx.borrow_and_update());
    }
    if let Err(e) = task.await {
        tracing::warn!("Upload progress task failed: {}", e);
    }
    tracing::info!("Attached {}", name);
}

/// Filter and sort the library; searches of 3+ characters are remembered
pub async fn list_media<S: KeyValueStore>(
    state: &AppState<S>,
    query: &MediaQuery,
) -> Result<Vec<Media>> {
    let media = state.media_service.list_media().await?;

    if !query.text.trim().is_empty() {
        state.search_history.record(&query.text).await?;
    }

    Ok(query.apply(&media))
}

pub async fn get_media<S: KeyValueStore>(state: &AppState<S>, id: &str) -> Result<Media> {
    state.media_service.get_media(id).await
}

/// Create media from a fresh form
pub async fn create_media<S: KeyValueStore>(
    state: &AppState<S>,
    input: MediaInput,
) -> Result<Media> {
    let dashboard = state.dashboard().await?;

    let mut form = MediaForm::default();
    let errors = input.fill(&mut form).await?;
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.to_string()));
    }

    dashboard.submit_media(None, &form).await
}

/// Edit media, starting from its current values
pub async fn update_media<S: KeyValueStore>(
    state: &AppState<S>,
    id: &str,
    input: MediaInput,
) -> Result<Media> {
    let dashboard = state.dashboard().await?;
    let existing = state.media_service.get_media(id).await?;

    let mut form = MediaForm::from_media(&existing);
    let errors = input.fill(&mut form).await?;
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.to_string()));
    }

    dashboard.submit_media(Some(id), &form).await
}

pub async fn delete_media<S: KeyValueStore>(state: &AppState<S>, id: &str) -> Result<()> {
    state.dashboard().await?.delete_media(id).await
}

/// Load media into a player, counting one play
pub async fn play_media<S: KeyValueStore>(state: &AppState<S>, id: &str) -> Result<PlayerState> {
    let media = state.media_service.get_media(id).await?;

    let mut player = Player::new(state.media_service.clone());
    player.select(media).await?;

    Ok(player.state().clone())
}

pub async fn download_media<S: KeyValueStore>(
    state: &AppState<S>,
    id: &str,
) -> Result<DownloadTicket> {
    state.media_service.record_download(id).await
}

pub async fn get_stats<S: KeyValueStore>(state: &AppState<S>) -> Result<LibraryStats> {
    state.media_service.stats().await
}
