//! Notices service
//!
//! Announcements shown on the home page. Notices are created and deleted;
//! there is no in-place edit.

use crate::database::{NewNotice, Notice, Repository};
use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;

pub struct NoticesService<S> {
    repo: Repository<S>,
}

impl<S> Clone for NoticesService<S> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<S: KeyValueStore> NoticesService<S> {
    pub fn new(repo: Repository<S>) -> Self {
        Self { repo }
    }

    pub async fn list_notices(&self) -> Result<Vec<Notice>> {
        self.repo.list_notices().await
    }

    /// Notices flagged active, in stored order
    pub async fn active_notices(&self) -> Result<Vec<Notice>> {
        Ok(self
            .list_notices()
            .await?
            .into_iter()
            .filter(|n| n.active)
            .collect())
    }

    pub async fn create_notice(&self, req: NewNotice) -> Result<Notice> {
        if req.title.trim().is_empty() || req.message.trim().is_empty() {
            return Err(AppError::Validation(
                "A notice needs a title and a message".to_string(),
            ));
        }

        tracing::info!("Creating notice: {}", req.title);
        let notice = self.repo.add_notice(req).await?;
        tracing::info!("Notice created successfully: {}", notice.id);

        Ok(notice)
    }

    pub async fn delete_notice(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting notice: {}", id);

        if !self.repo.delete_notice(id).await? {
            return Err(AppError::NoticeNotFound(id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Priority;
    use crate::storage::MemoryStore;
    use chrono::Utc;

    fn create_test_service() -> NoticesService<MemoryStore> {
        NoticesService::new(Repository::new(MemoryStore::new()))
    }

    fn notice(title: &str, active: bool) -> NewNotice {
        NewNotice {
            title: title.to_string(),
            message: "Details inside".to_string(),
            date: Utc::now(),
            priority: Priority::Normal,
            active,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_active_notices_skip_inactive() {
        let service = create_test_service();
        service.create_notice(notice("Draft", false)).await.unwrap();
        let live = service.create_notice(notice("Live", true)).await.unwrap();

        let active = service.active_notices().await.unwrap();

        assert_eq!(active.len(), 3);
        assert_eq!(active[0].id, live.id);
        assert!(active.iter().all(|n| n.title != "Draft"));
    }

    #[tokio::test]
    async fn test_blank_notice_rejected() {
        let service = create_test_service();

        let result = service.create_notice(notice("  ", true)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_notice() {
        let service = create_test_service();

        assert!(matches!(
            service.delete_notice("missing").await,
            Err(AppError::NoticeNotFound(_))
        ));
        service.delete_notice("n1").await.unwrap();
        assert_eq!(service.list_notices().await.unwrap().len(), 1);
    }
}
