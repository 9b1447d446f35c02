//! Media service
//!
//! High-level operations on the media library: lifecycle, engagement
//! counters and dashboard totals.

use crate::config;
use crate::database::{Media, MediaUpdate, NewMedia, Repository};
use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;
use serde::Serialize;

/// What a client needs to start a browser download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadTicket {
    pub media_id: String,
    pub file_url: String,
    /// Suggested file name, `<title>.mp3`
    pub filename: String,
    pub download_count: u64,
}

/// Aggregate counters shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub total_media: usize,
    pub total_plays: u64,
    pub total_downloads: u64,
}

impl LibraryStats {
    pub fn from_media(media: &[Media]) -> Self {
        Self {
            total_media: media.len(),
            total_plays: media.iter().map(|m| m.play_count).sum(),
            total_downloads: media.iter().map(|m| m.download_count).sum(),
        }
    }
}

/// Service for managing media items
pub struct MediaService<S> {
    repo: Repository<S>,
}

impl<S> Clone for MediaService<S> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<S: KeyValueStore> MediaService<S> {
    pub fn new(repo: Repository<S>) -> Self {
        Self { repo }
    }

    /// List all media in stored order
    pub async fn list_media(&self) -> Result<Vec<Media>> {
        self.repo.list_media().await
    }

    /// Get a media item by ID
    pub async fn get_media(&self, id: &str) -> Result<Media> {
        self.repo.get_media(id).await
    }

    /// The most recently added media, as shown on the home page
    pub async fn recent_media(&self) -> Result<Vec<Media>> {
        let mut media = self.list_media().await?;
        media.truncate(config::HOME_RECENT_MEDIA);
        Ok(media)
    }

    /// Create a new media item
    pub async fn create_media(&self, req: NewMedia) -> Result<Media> {
        tracing::info!("Creating media: {}", req.title);

        let media = self.repo.add_media(req).await?;

        tracing::info!("Media created successfully: {}", media.id);
        Ok(media)
    }

    /// Update a media item
    pub async fn update_media(&self, id: &str, update: MediaUpdate) -> Result<Media> {
        tracing::debug!("Updating media: {}", id);

        self.repo
            .update_media(id, update)
            .await?
            .ok_or_else(|| AppError::MediaNotFound(id.to_string()))
    }

    /// Delete a media item
    pub async fn delete_media(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting media: {}", id);

        if !self.repo.delete_media(id).await? {
            return Err(AppError::MediaNotFound(id.to_string()));
        }

        tracing::info!("Media deleted successfully: {}", id);
        Ok(())
    }

    /// Count one play of a media item; returns the new play count
    pub async fn record_play(&self, id: &str) -> Result<u64> {
        let count = self
            .repo
            .increment_play(id)
            .await?
            .ok_or_else(|| AppError::MediaNotFound(id.to_string()))?;

        tracing::debug!("Play recorded for {}: {}", id, count);
        Ok(count)
    }

    /// Count one download and hand back what the client should fetch
    pub async fn record_download(&self, id: &str) -> Result<DownloadTicket> {
        let download_count = self
            .repo
            .increment_download(id)
            .await?
            .ok_or_else(|| AppError::MediaNotFound(id.to_string()))?;

        let media = self.repo.get_media(id).await?;

        tracing::debug!("Download recorded for {}: {}", id, download_count);

        Ok(DownloadTicket {
            media_id: media.id,
            filename: format!("{}.mp3", media.title),
            file_url: media.file_url,
            download_count,
        })
    }

    /// Totals across the whole library
    pub async fn stats(&self) -> Result<LibraryStats> {
        let media = self.list_media().await?;
        Ok(LibraryStats::from_media(&media))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Category;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn create_test_service() -> MediaService<MemoryStore> {
        MediaService::new(Repository::new(MemoryStore::new()))
    }

    fn new_media(title: &str) -> NewMedia {
        NewMedia {
            title: title.to_string(),
            preacher: "Bishop Test".to_string(),
            category: Category::Youth,
            description: None,
            date_preached: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            file_url: "https://cdn.example/youth.mp3".to_string(),
            thumbnail_url: "https://cdn.example/youth.png".to_string(),
            duration: "30:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_stats_sum_counters() {
        let service = create_test_service();

        let stats = service.stats().await.unwrap();

        assert_eq!(stats.total_media, 2);
        assert_eq!(stats.total_plays, 1250 + 3400);
        assert_eq!(stats.total_downloads, 450 + 890);
    }

    #[tokio::test]
    async fn test_record_download_returns_ticket() {
        let service = create_test_service();

        let ticket = service.record_download("1").await.unwrap();

        assert_eq!(ticket.filename, "The Power of Grace.mp3");
        assert_eq!(ticket.download_count, 451);
        assert!(ticket.file_url.ends_with("SoundHelix-Song-1.mp3"));
    }

    #[tokio::test]
    async fn test_missing_media_errors() {
        let service = create_test_service();

        assert!(matches!(
            service.record_play("ghost").await,
            Err(AppError::MediaNotFound(_))
        ));
        assert!(matches!(
            service.delete_media("ghost").await,
            Err(AppError::MediaNotFound(_))
        ));
        assert!(matches!(
            service.update_media("ghost", MediaUpdate::default()).await,
            Err(AppError::MediaNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_recent_media_is_capped() {
        let service = create_test_service();
        service.create_media(new_media("Third")).await.unwrap();
        let newest = service.create_media(new_media("Fourth")).await.unwrap();

        let recent = service.recent_media().await.unwrap();

        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, newest.id);
    }
}
