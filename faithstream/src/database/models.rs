//! Database models
//!
//! Rust structs representing stored entities.
//! Field names serialize in camelCase, matching the stored JSON arrays.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of message a media item holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Sermon,
    Worship,
    #[serde(rename = "Bible Study")]
    BibleStudy,
    Conference,
    Youth,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Sermon,
        Category::Worship,
        Category::BibleStudy,
        Category::Conference,
        Category::Youth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Sermon => "Sermon",
            Category::Worship => "Worship",
            Category::BibleStudy => "Bible Study",
            Category::Conference => "Conference",
            Category::Youth => "Youth",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Staff access level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminRole {
    #[serde(rename = "Full Access")]
    FullAccess,
    Editor,
    Viewer,
}

impl AdminRole {
    pub fn label(self) -> &'static str {
        match self {
            AdminRole::FullAccess => "Full Access",
            AdminRole::Editor => "Editor",
            AdminRole::Viewer => "Viewer",
        }
    }

    /// Whether this role may create, edit and delete media and notices
    pub fn can_edit_media(self) -> bool {
        matches!(self, AdminRole::FullAccess | AdminRole::Editor)
    }

    /// Whether this role may add, edit and remove other admins
    pub fn can_manage_admins(self) -> bool {
        self == AdminRole::FullAccess
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "full access" | "full" => Ok(AdminRole::FullAccess),
            "editor" => Ok(AdminRole::Editor),
            "viewer" => Ok(AdminRole::Viewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Notice importance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Normal,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "normal" => Ok(Priority::Normal),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// A single audio message with engagement counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    pub title: String,
    pub preacher: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date_preached: NaiveDate,
    pub file_url: String,
    pub thumbnail_url: String,
    /// Free text such as "45:20"
    pub duration: String,
    pub play_count: u64,
    pub download_count: u64,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when adding media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedia {
    pub title: String,
    pub preacher: String,
    pub category: Category,
    pub description: Option<String>,
    pub date_preached: NaiveDate,
    pub file_url: String,
    pub thumbnail_url: String,
    pub duration: String,
}

/// Partial media update. Id, counters and creation time are not updatable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUpdate {
    pub title: Option<String>,
    pub preacher: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub date_preached: Option<NaiveDate>,
    pub file_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
}

impl MediaUpdate {
    /// Merge the present fields into `media`
    pub fn apply_to(self, media: &mut Media) {
        if let Some(title) = self.title {
            media.title = title;
        }
        if let Some(preacher) = self.preacher {
            media.preacher = preacher;
        }
        if let Some(category) = self.category {
            media.category = category;
        }
        if let Some(description) = self.description {
            media.description = Some(description);
        }
        if let Some(date) = self.date_preached {
            media.date_preached = date;
        }
        if let Some(file_url) = self.file_url {
            media.file_url = file_url;
        }
        if let Some(thumbnail_url) = self.thumbnail_url {
            media.thumbnail_url = thumbnail_url;
        }
        if let Some(duration) = self.duration {
            media.duration = duration;
        }
    }
}

impl From<NewMedia> for MediaUpdate {
    fn from(m: NewMedia) -> Self {
        Self {
            title: Some(m.title),
            preacher: Some(m.preacher),
            category: Some(m.category),
            description: m.description,
            date_preached: Some(m.date_preached),
            file_url: Some(m.file_url),
            thumbnail_url: Some(m.thumbnail_url),
            duration: Some(m.duration),
        }
    }
}

/// Staff account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub email: String,
    pub role: AdminRole,
}

/// Announcement shown on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub priority: Priority,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Fields supplied when adding a notice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotice {
    pub title: String,
    pub message: String,
    pub date: DateTime<Utc>,
    pub priority: Priority,
    pub active: bool,
    pub image_url: Option<String>,
}
