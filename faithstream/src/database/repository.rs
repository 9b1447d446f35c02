//! Repository layer over the stored collections
//!
//! Media, admins and notices are each stored as one JSON array under a fixed
//! key. Every mutation reads the whole array, changes it and writes it back.
//!
//! Each collection has a single writer: mutations on a collection hold that
//! collection's lock for the whole read-modify-write cycle. Clones of a
//! `Repository` share the locks, so build one per store and clone it.
//! Processes that open the same store do not share locks and the last write
//! wins.

use super::models::*;
use super::seed;
use crate::config;
use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// One stored collection and the lock of its single writer
struct Collection<T> {
    key: &'static str,
    defaults: fn() -> Vec<T>,
    writer: Mutex<()>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn new(key: &'static str, defaults: fn() -> Vec<T>) -> Self {
        Self {
            key,
            defaults,
            writer: Mutex::new(()),
        }
    }

    /// Read the collection, seeding the defaults if the key is absent
    async fn load<S: KeyValueStore>(&self, store: &S) -> Result<Vec<T>> {
        if let Some(raw) = store.get(self.key).await? {
            return Ok(serde_json::from_str(&raw)?);
        }

        let _writer = self.writer.lock().await;
        self.read_or_seed(store).await
    }

    /// Caller must hold the writer lock
    async fn read_or_seed<S: KeyValueStore>(&self, store: &S) -> Result<Vec<T>> {
        match store.get(self.key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                tracing::info!("Seeding default data for {}", self.key);
                let items = (self.defaults)();
                self.save(store, &items).await?;
                Ok(items)
            }
        }
    }

    async fn save<S: KeyValueStore>(&self, store: &S, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        store.set(self.key, &raw).await
    }

    /// Run `f` on the loaded collection and persist the result.
    ///
    /// Nothing is written when `f` fails.
    async fn mutate<S, R, F>(&self, store: &S, f: F) -> Result<R>
    where
        S: KeyValueStore,
        F: FnOnce(&mut Vec<T>) -> Result<R> + Send,
        R: Send,
    {
        let _writer = self.writer.lock().await;
        let mut items = self.read_or_seed(store).await?;
        let out = f(&mut items)?;
        self.save(store, &items).await?;
        Ok(out)
    }
}

/// Repository for the media, admin and notice collections
pub struct Repository<S> {
    store: Arc<S>,
    media: Arc<Collection<Media>>,
    admins: Arc<Collection<Admin>>,
    notices: Arc<Collection<Notice>>,
}

impl<S> Clone for Repository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            media: Arc::clone(&self.media),
            admins: Arc::clone(&self.admins),
            notices: Arc::clone(&self.notices),
        }
    }
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            store,
            media: Arc::new(Collection::new(config::MEDIA_KEY, seed::default_media)),
            admins: Arc::new(Collection::new(config::ADMIN_KEY, seed::default_admins)),
            notices: Arc::new(Collection::new(config::NOTICE_KEY, seed::default_notices)),
        }
    }

    /// The underlying store, for keys outside the three collections
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    // ===== Media =====

    /// List all media in stored order (newest additions first)
    pub async fn list_media(&self) -> Result<Vec<Media>> {
        self.media.load(self.store.as_ref()).await
    }

    /// Get a media item by ID
    pub async fn get_media(&self, id: &str) -> Result<Media> {
        self.list_media()
            .await?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::MediaNotFound(id.to_string()))
    }

    /// Create a media item with zeroed counters and prepend it
    pub async fn add_media(&self, req: NewMedia) -> Result<Media> {
        let media = self
            .media
            .mutate(self.store.as_ref(), move |items| {
                let media = Media {
                    id: unique_id(items.iter().map(|m| m.id.as_str())),
                    title: req.title,
                    preacher: req.preacher,
                    category: req.category,
                    description: req.description,
                    date_preached: req.date_preached,
                    file_url: req.file_url,
                    thumbnail_url: req.thumbnail_url,
                    duration: req.duration,
                    play_count: 0,
                    download_count: 0,
                    created_at: Utc::now(),
                };
                items.insert(0, media.clone());
                Ok(media)
            })
            .await?;

        tracing::debug!("Created media: {}", media.id);
        Ok(media)
    }

    /// Merge `update` into the media with `id`; `None` when the id is absent
    pub async fn update_media(&self, id: &str, update: MediaUpdate) -> Result<Option<Media>> {
        let updated = self
            .media
            .mutate(self.store.as_ref(), move |items| {
                Ok(items.iter_mut().find(|m| m.id == id).map(|media| {
                    update.apply_to(media);
                    media.clone()
                }))
            })
            .await?;

        match &updated {
            Some(_) => tracing::debug!("Updated media: {}", id),
            None => tracing::debug!("Update skipped, media not found: {}", id),
        }
        Ok(updated)
    }

    /// Remove the media with `id`; returns whether anything was removed
    pub async fn delete_media(&self, id: &str) -> Result<bool> {
        let removed = self
            .media
            .mutate(self.store.as_ref(), |items| {
                let before = items.len();
                items.retain(|m| m.id != id);
                Ok(items.len() != before)
            })
            .await?;

        tracing::debug!("Deleted media: {} (removed: {})", id, removed);
        Ok(removed)
    }

    /// Add one play; returns the new count, `None` when the id is absent
    pub async fn increment_play(&self, id: &str) -> Result<Option<u64>> {
        self.media
            .mutate(self.store.as_ref(), |items| {
                Ok(items.iter_mut().find(|m| m.id == id).map(|m| {
                    m.play_count = m.play_count.saturating_add(1);
                    m.play_count
                }))
            })
            .await
    }

    /// Add one download; returns the new count, `None` when the id is absent
    pub async fn increment_download(&self, id: &str) -> Result<Option<u64>> {
        self.media
            .mutate(self.store.as_ref(), |items| {
                Ok(items.iter_mut().find(|m| m.id == id).map(|m| {
                    m.download_count = m.download_count.saturating_add(1);
                    m.download_count
                }))
            })
            .await
    }

    // ===== Admins =====

    /// List admins in insertion order
    pub async fn list_admins(&self) -> Result<Vec<Admin>> {
        self.admins.load(self.store.as_ref()).await
    }

    /// Find an admin by case-insensitive email
    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let wanted = normalize_email(email);
        Ok(self
            .list_admins()
            .await?
            .into_iter()
            .find(|a| normalize_email(&a.email) == wanted))
    }

    /// Append a new admin; refused when the email is already registered
    pub async fn add_admin(&self, email: &str, role: AdminRole) -> Result<Admin> {
        let email = email.trim().to_string();

        let admin = self
            .admins
            .mutate(self.store.as_ref(), move |admins| {
                let wanted = normalize_email(&email);
                if admins.iter().any(|a| normalize_email(&a.email) == wanted) {
                    return Err(AppError::DuplicateAdmin(email));
                }
                let admin = Admin {
                    id: unique_id(admins.iter().map(|a| a.id.as_str())),
                    email,
                    role,
                };
                admins.push(admin.clone());
                Ok(admin)
            })
            .await?;

        tracing::debug!("Created admin: {} ({})", admin.id, admin.role);
        Ok(admin)
    }

    /// Replace email and role of the admin with `id`; `None` when absent
    pub async fn update_admin(
        &self,
        id: &str,
        email: &str,
        role: AdminRole,
    ) -> Result<Option<Admin>> {
        let email = email.trim().to_string();

        let updated = self
            .admins
            .mutate(self.store.as_ref(), move |admins| {
                let wanted = normalize_email(&email);
                if admins
                    .iter()
                    .any(|a| a.id != id && normalize_email(&a.email) == wanted)
                {
                    return Err(AppError::DuplicateAdmin(email));
                }
                Ok(admins.iter_mut().find(|a| a.id == id).map(|admin| {
                    admin.email = email;
                    admin.role = role;
                    admin.clone()
                }))
            })
            .await?;

        tracing::debug!("Updated admin: {} (found: {})", id, updated.is_some());
        Ok(updated)
    }

    /// Remove the admin with `id`. Refused while one or fewer admins remain.
    pub async fn remove_admin(&self, id: &str) -> Result<bool> {
        let removed = self
            .admins
            .mutate(self.store.as_ref(), |admins| {
                if admins.len() <= 1 {
                    return Err(AppError::LastAdmin);
                }
                let before = admins.len();
                admins.retain(|a| a.id != id);
                Ok(admins.len() != before)
            })
            .await?;

        tracing::debug!("Removed admin: {} (removed: {})", id, removed);
        Ok(removed)
    }

    // ===== Notices =====

    /// List notices, newest additions first
    pub async fn list_notices(&self) -> Result<Vec<Notice>> {
        self.notices.load(self.store.as_ref()).await
    }

    /// Create a notice and prepend it
    pub async fn add_notice(&self, req: NewNotice) -> Result<Notice> {
        let notice = self
            .notices
            .mutate(self.store.as_ref(), move |notices| {
                let notice = Notice {
                    id: unique_id(notices.iter().map(|n| n.id.as_str())),
                    title: req.title,
                    message: req.message,
                    date: req.date,
                    priority: req.priority,
                    active: req.active,
                    image_url: req.image_url,
                };
                notices.insert(0, notice.clone());
                Ok(notice)
            })
            .await?;

        tracing::debug!("Created notice: {}", notice.id);
        Ok(notice)
    }

    /// Remove the notice with `id`; returns whether anything was removed
    pub async fn delete_notice(&self, id: &str) -> Result<bool> {
        let removed = self
            .notices
            .mutate(self.store.as_ref(), |notices| {
                let before = notices.len();
                notices.retain(|n| n.id != id);
                Ok(notices.len() != before)
            })
            .await?;

        tracing::debug!("Deleted notice: {} (removed: {})", id, removed);
        Ok(removed)
    }
}

/// Fresh random id not present in `existing`
/// Emails compare trimmed and Unicode-lowercased everywhere
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn unique_id<'a>(existing: impl Iterator<Item = &'a str> + Clone) -> String {
    loop {
        let id = Uuid::new_v4().simple().to_string();
        if !existing.clone().any(|e| e == id) {
            return id;
        }
    }
}
