//! Staff dashboard
//!
//! Everything the dashboard page does on behalf of a logged-in admin:
//! the media form and its validation, media/notice management gated on
//! editor rights, admin management gated on full access, totals, and the
//! AI title suggestion.

use crate::config;
use crate::database::{
    Admin, AdminRole, Category, Media, MediaUpdate, NewMedia, NewNotice, Notice, Repository,
};
use crate::error::{AppError, Result};
use crate::services::media::{LibraryStats, MediaService};
use crate::services::notices::NoticesService;
use crate::services::suggestions::SuggestionClient;
use crate::services::uploads::{self, FileInfo};
use crate::storage::KeyValueStore;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Inline messages per media form field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub title: Option<String>,
    pub preacher: Option<String>,
    pub date_preached: Option<String>,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.messages().next().is_none()
    }

    fn messages(&self) -> impl Iterator<Item = &str> {
        [
            &self.title,
            &self.preacher,
            &self.date_preached,
            &self.description,
            &self.file_url,
            &self.thumbnail_url,
        ]
        .into_iter()
        .filter_map(|m| m.as_deref())
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.messages().collect();
        f.write_str(&joined.join("; "))
    }
}

/// State of the create/edit media form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaForm {
    pub title: String,
    pub preacher: String,
    pub category: Category,
    pub description: String,
    pub date_preached: Option<NaiveDate>,
    pub file_url: String,
    pub thumbnail_url: String,
    pub duration: String,
}

impl Default for MediaForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            preacher: String::new(),
            category: Category::Sermon,
            description: String::new(),
            date_preached: Some(Local::now().date_naive()),
            file_url: String::new(),
            thumbnail_url: String::new(),
            duration: config::DEFAULT_DURATION.to_string(),
        }
    }
}

impl MediaForm {
    /// Prefill the form for editing `media`
    pub fn from_media(media: &Media) -> Self {
        Self {
            title: media.title.clone(),
            preacher: media.preacher.clone(),
            category: media.category,
            description: media.description.clone().unwrap_or_default(),
            date_preached: Some(media.date_preached),
            file_url: media.file_url.clone(),
            thumbnail_url: media.thumbnail_url.clone(),
            duration: media.duration.clone(),
        }
    }

    /// Check every required field, returning the record to store
    pub fn validate(&self) -> std::result::Result<NewMedia, FormErrors> {
        let mut errors = FormErrors::default();

        if self.title.trim().is_empty() {
            errors.title = Some("A message title is required".to_string());
        }
        if self.preacher.trim().is_empty() {
            errors.preacher = Some("The preacher/speaker name is required".to_string());
        }
        if self.date_preached.is_none() {
            errors.date_preached = Some("A valid preaching date is required".to_string());
        }
        if self.description.trim().is_empty() {
            errors.description =
                Some("A brief description helps members find content".to_string());
        }
        if self.file_url.is_empty() {
            errors.file_url = Some("Please upload an MP3 audio file".to_string());
        }
        if self.thumbnail_url.is_empty() {
            errors.thumbnail_url = Some("A thumbnail image is required".to_string());
        }

        match self.date_preached {
            Some(date_preached) if errors.is_empty() => Ok(NewMedia {
                title: self.title.trim().to_string(),
                preacher: self.preacher.trim().to_string(),
                category: self.category,
                description: Some(self.description.trim().to_string()),
                date_preached,
                file_url: self.file_url.clone(),
                thumbnail_url: self.thumbnail_url.clone(),
                duration: self.duration.clone(),
            }),
            _ => Err(errors),
        }
    }

    /// Accept an audio file reference, or record why it was refused
    pub fn attach_audio(&mut self, errors: &mut FormErrors, file: &FileInfo, url: &str) -> bool {
        match uploads::check_audio(file) {
            Ok(()) => {
                self.file_url = url.to_string();
                errors.file_url = None;
                true
            }
            Err(message) => {
                errors.file_url = Some(message);
                false
            }
        }
    }

    /// Accept a thumbnail reference, or record why it was refused
    pub fn attach_thumbnail(
        &mut self,
        errors: &mut FormErrors,
        file: &FileInfo,
        url: &str,
    ) -> bool {
        match uploads::check_image(file) {
            Ok(()) => {
                self.thumbnail_url = url.to_string();
                errors.thumbnail_url = None;
                true
            }
            Err(message) => {
                errors.thumbnail_url = Some(message);
                false
            }
        }
    }
}

/// Dashboard actions performed as `user`
pub struct Dashboard<S> {
    user: Admin,
    repo: Repository<S>,
    media: MediaService<S>,
    notices: NoticesService<S>,
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn new(user: Admin, repo: Repository<S>) -> Self {
        Self {
            user,
            media: MediaService::new(repo.clone()),
            notices: NoticesService::new(repo.clone()),
            repo,
        }
    }

    pub fn user(&self) -> &Admin {
        &self.user
    }

    pub fn can_edit_media(&self) -> bool {
        self.user.role.can_edit_media()
    }

    pub fn can_manage_admins(&self) -> bool {
        self.user.role.can_manage_admins()
    }

    fn require_editor(&self) -> Result<()> {
        if self.can_edit_media() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "{} accounts cannot change media or notices",
                self.user.role
            )))
        }
    }

    fn require_full_access(&self) -> Result<()> {
        if self.can_manage_admins() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(format!(
                "{} accounts cannot manage admins",
                self.user.role
            )))
        }
    }

    // ===== Media =====

    pub async fn list_media(&self) -> Result<Vec<Media>> {
        self.media.list_media().await
    }

    pub async fn stats(&self) -> Result<LibraryStats> {
        self.media.stats().await
    }

    /// Validate the form and create (no `editing_id`) or update media
    pub async fn submit_media(&self, editing_id: Option<&str>, form: &MediaForm) -> Result<Media> {
        self.require_editor()?;

        let fields = form
            .validate()
            .map_err(|errors| AppError::Validation(errors.to_string()))?;

        match editing_id {
            Some(id) => {
                self.media
                    .update_media(id, MediaUpdate::from(fields))
                    .await
            }
            None => self.media.create_media(fields).await,
        }
    }

    pub async fn delete_media(&self, id: &str) -> Result<()> {
        self.require_editor()?;
        self.media.delete_media(id).await
    }

    /// Replace the form title with a model suggestion.
    ///
    /// Needs a description to work from. Returns whether the title changed;
    /// a failed or cancelled suggestion leaves the form as it was.
    pub async fn suggest_title(
        &self,
        client: &SuggestionClient,
        form: &mut MediaForm,
        errors: &mut FormErrors,
        cancel: &CancellationToken,
    ) -> bool {
        if form.description.trim().is_empty() {
            errors.description = Some("Enter a description first so AI can analyze it".to_string());
            return false;
        }

        match client.suggest(&form.description, cancel).await {
            Some(suggestion) => {
                form.title = suggestion.suggested_title;
                errors.title = None;
                true
            }
            None => false,
        }
    }

    // ===== Notices =====

    pub async fn create_notice(&self, req: NewNotice) -> Result<Notice> {
        self.require_editor()?;
        self.notices.create_notice(req).await
    }

    pub async fn delete_notice(&self, id: &str) -> Result<()> {
        self.require_editor()?;
        self.notices.delete_notice(id).await
    }

    // ===== Admins =====

    pub async fn list_admins(&self) -> Result<Vec<Admin>> {
        self.repo.list_admins().await
    }

    pub async fn add_admin(&self, email: &str, role: AdminRole) -> Result<Admin> {
        self.require_full_access()?;
        if email.trim().is_empty() {
            return Err(AppError::Validation("An email is required".to_string()));
        }

        let admin = self.repo.add_admin(email, role).await?;
        tracing::info!("{} granted {} access to {}", self.user.email, role, admin.email);
        Ok(admin)
    }

    pub async fn update_admin(&self, id: &str, email: &str, role: AdminRole) -> Result<Admin> {
        self.require_full_access()?;
        if email.trim().is_empty() {
            return Err(AppError::Validation("An email is required".to_string()));
        }

        let admin = self
            .repo
            .update_admin(id, email, role)
            .await?
            .ok_or_else(|| AppError::AdminNotFound(id.to_string()))?;
        tracing::info!("{} updated admin {}", self.user.email, admin.email);
        Ok(admin)
    }

    pub async fn remove_admin(&self, id: &str) -> Result<()> {
        self.require_full_access()?;

        if !self.repo.remove_admin(id).await? {
            return Err(AppError::AdminNotFound(id.to_string()));
        }
        tracing::info!("{} revoked admin {}", self.user.email, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Priority;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn admin(role: AdminRole) -> Admin {
        Admin {
            id: "tester".to_string(),
            email: "tester@church.com".to_string(),
            role,
        }
    }

    fn create_test_dashboard(role: AdminRole) -> Dashboard<MemoryStore> {
        Dashboard::new(admin(role), Repository::new(MemoryStore::new()))
    }

    fn filled_form() -> MediaForm {
        MediaForm {
            title: "Walking in Dominion".to_string(),
            preacher: "Pastor Ade".to_string(),
            category: Category::Conference,
            description: "Keynote from the annual convention".to_string(),
            date_preached: NaiveDate::from_ymd_opt(2024, 12, 8),
            file_url: "blob:dominion.mp3".to_string(),
            thumbnail_url: "blob:dominion.png".to_string(),
            ..MediaForm::default()
        }
    }

    #[test]
    fn test_default_form() {
        let form = MediaForm::default();
        assert_eq!(form.category, Category::Sermon);
        assert_eq!(form.duration, "40:00");
        assert!(form.date_preached.is_some());
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let form = MediaForm {
            date_preached: None,
            ..MediaForm::default()
        };

        let errors = form.validate().unwrap_err();

        assert_eq!(errors.title.as_deref(), Some("A message title is required"));
        assert_eq!(
            errors.preacher.as_deref(),
            Some("The preacher/speaker name is required")
        );
        assert_eq!(
            errors.date_preached.as_deref(),
            Some("A valid preaching date is required")
        );
        assert_eq!(
            errors.description.as_deref(),
            Some("A brief description helps members find content")
        );
        assert_eq!(errors.file_url.as_deref(), Some("Please upload an MP3 audio file"));
        assert_eq!(
            errors.thumbnail_url.as_deref(),
            Some("A thumbnail image is required")
        );
    }

    #[test]
    fn test_valid_form_produces_record() {
        let fields = filled_form().validate().unwrap();
        assert_eq!(fields.title, "Walking in Dominion");
        assert_eq!(fields.duration, "40:00");
    }

    #[test]
    fn test_attachments_update_form_and_errors() {
        let mut form = MediaForm::default();
        let mut errors = FormErrors::default();

        let wav = FileInfo::new("talk.wav", "audio/wav", 10);
        assert!(!form.attach_audio(&mut errors, &wav, "blob:wav"));
        assert!(form.file_url.is_empty());
        assert!(errors.file_url.is_some());

        let mp3 = FileInfo::new("talk.mp3", "audio/mpeg", 10);
        assert!(form.attach_audio(&mut errors, &mp3, "blob:mp3"));
        assert_eq!(form.file_url, "blob:mp3");
        assert!(errors.file_url.is_none());

        let huge = FileInfo::new("cover.png", "image/png", config::MAX_IMAGE_SIZE + 1);
        assert!(!form.attach_thumbnail(&mut errors, &huge, "blob:png"));
        assert_eq!(errors.thumbnail_url.as_deref(), Some("Thumbnail exceeds 5MB limit."));
    }

    #[tokio::test]
    async fn test_editor_creates_and_edits_media() {
        let dashboard = create_test_dashboard(AdminRole::Editor);

        let created = dashboard.submit_media(None, &filled_form()).await.unwrap();
        assert_eq!(dashboard.list_media().await.unwrap().len(), 3);

        let mut form = MediaForm::from_media(&created);
        form.title = "Walking in Greater Dominion".to_string();
        let edited = dashboard.submit_media(Some(&created.id), &form).await.unwrap();

        assert_eq!(edited.id, created.id);
        assert_eq!(edited.title, "Walking in Greater Dominion");
        assert_eq!(edited.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_saved() {
        let dashboard = create_test_dashboard(AdminRole::FullAccess);

        let result = dashboard.submit_media(None, &MediaForm::default()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(dashboard.list_media().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_viewer_is_read_only() {
        let dashboard = create_test_dashboard(AdminRole::Viewer);

        assert!(dashboard.list_media().await.is_ok());
        assert!(matches!(
            dashboard.submit_media(None, &filled_form()).await,
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            dashboard.delete_media("1").await,
            Err(AppError::PermissionDenied(_))
        ));
        assert!(matches!(
            dashboard
                .create_notice(NewNotice {
                    title: "x".to_string(),
                    message: "y".to_string(),
                    date: Utc::now(),
                    priority: Priority::Normal,
                    active: true,
                    image_url: None,
                })
                .await,
            Err(AppError::PermissionDenied(_))
        ));
        assert_eq!(dashboard.list_media().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_only_full_access_manages_admins() {
        let editor = create_test_dashboard(AdminRole::Editor);
        assert!(matches!(
            editor.add_admin("new@church.com", AdminRole::Viewer).await,
            Err(AppError::PermissionDenied(_))
        ));

        let owner = create_test_dashboard(AdminRole::FullAccess);
        let added = owner.add_admin("new@church.com", AdminRole::Viewer).await.unwrap();
        let updated = owner
            .update_admin(&added.id, "new@church.com", AdminRole::Editor)
            .await
            .unwrap();
        assert_eq!(updated.role, AdminRole::Editor);

        owner.remove_admin(&added.id).await.unwrap();
        assert!(matches!(
            owner.remove_admin("admin-1").await,
            Err(AppError::LastAdmin)
        ));
    }

    #[tokio::test]
    async fn test_suggest_title_requires_description() {
        let dashboard = create_test_dashboard(AdminRole::Editor);
        let client = SuggestionClient::new(None, "m", "http://127.0.0.1:9");
        let mut form = MediaForm::default();
        let mut errors = FormErrors::default();

        let changed = dashboard
            .suggest_title(&client, &mut form, &mut errors, &CancellationToken::new())
            .await;

        assert!(!changed);
        assert_eq!(
            errors.description.as_deref(),
            Some("Enter a description first so AI can analyze it")
        );
    }

    #[tokio::test]
    async fn test_failed_suggestion_leaves_form() {
        let dashboard = create_test_dashboard(AdminRole::Editor);
        let client = SuggestionClient::new(None, "m", "http://127.0.0.1:9");
        let mut form = filled_form();
        let before = form.clone();
        let mut errors = FormErrors::default();

        let changed = dashboard
            .suggest_title(&client, &mut form, &mut errors, &CancellationToken::new())
            .await;

        assert!(!changed);
        assert_eq!(form, before);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_form_errors_display() {
        let errors = FormErrors {
            title: Some("a".to_string()),
            file_url: Some("b".to_string()),
            ..FormErrors::default()
        };
        assert_eq!(errors.to_string(), "a; b");
    }
}
