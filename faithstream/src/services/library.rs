//! Library filtering and sorting
//!
//! Pure functions over an in-memory media list. The same query over the same
//! list always yields the same ordered result.

use crate::database::{Category, Media};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Category selector; `All` disables category filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, media: &Media) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => media.category == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Field a media list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    DatePreached,
    Title,
    Preacher,
    PlayCount,
    DownloadCount,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "date" | "date-preached" => Ok(SortKey::DatePreached),
            "title" => Ok(SortKey::Title),
            "preacher" => Ok(SortKey::Preacher),
            "plays" | "play-count" => Ok(SortKey::PlayCount),
            "downloads" | "download-count" => Ok(SortKey::DownloadCount),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    fn compare(&self, a: &Media, b: &Media) -> Ordering {
        let ordering = match self.key {
            SortKey::DatePreached => a.date_preached.cmp(&b.date_preached),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Preacher => a.preacher.to_lowercase().cmp(&b.preacher.to_lowercase()),
            SortKey::PlayCount => a.play_count.cmp(&b.play_count),
            SortKey::DownloadCount => a.download_count.cmp(&b.download_count),
        };
        match self.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Search text, category and optional sort applied to a media list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaQuery {
    pub text: String,
    pub category: CategoryFilter,
    pub sort: Option<SortSpec>,
}

impl MediaQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn sorted_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some(SortSpec::new(key, order));
        self
    }

    /// Flip the sort direction, or sort by `key` descending if `key` is new
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = Some(match self.sort {
            Some(spec) if spec.key == key => SortSpec::new(key, spec.order.toggled()),
            _ => SortSpec::new(key, SortOrder::default()),
        });
    }

    /// Whether `media` passes the text and category filters
    pub fn matches(&self, media: &Media) -> bool {
        self.category.matches(media) && matches_text(&self.text, media)
    }

    /// Filter and sort `media`, keeping stored order for ties
    pub fn apply(&self, media: &[Media]) -> Vec<Media> {
        let mut results: Vec<Media> = media.iter().filter(|m| self.matches(m)).cloned().collect();

        if let Some(spec) = &self.sort {
            results.sort_by(|a, b| spec.compare(a, b));
        }

        results
    }
}

/// Case-insensitive substring match on title, preacher and description
fn matches_text(query: &str, media: &Media) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    media.title.to_lowercase().contains(&q)
        || media.preacher.to_lowercase().contains(&q)
        || media
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&q))
}
