//! Home page feed: latest media and active notices

use crate::database::{Media, Notice, Repository};
use crate::error::Result;
use crate::services::media::MediaService;
use crate::services::notices::NoticesService;
use crate::storage::KeyValueStore;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeFeed {
    pub recent_media: Vec<Media>,
    pub notices: Vec<Notice>,
}

pub async fn load_home<S: KeyValueStore>(repo: &Repository<S>) -> Result<HomeFeed> {
    let recent_media = MediaService::new(repo.clone()).recent_media().await?;
    let notices = NoticesService::new(repo.clone()).active_notices().await?;

    Ok(HomeFeed {
        recent_media,
        notices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Category, NewMedia};
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn sample(title: &str) -> NewMedia {
        NewMedia {
            title: title.to_string(),
            preacher: "Guest".to_string(),
            category: Category::Youth,
            description: None,
            date_preached: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            file_url: "f".to_string(),
            thumbnail_url: "t".to_string(),
            duration: "10:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_home_shows_three_newest_and_active_notices() {
        let repo = Repository::new(MemoryStore::new());
        repo.add_media(sample("third")).await.unwrap();
        repo.add_media(sample("newest")).await.unwrap();

        let feed = load_home(&repo).await.unwrap();

        let titles: Vec<&str> = feed.recent_media.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles.len(), 3);
        assert_eq!(titles[0], "newest");
        assert_eq!(titles[1], "third");
        assert!(feed.notices.iter().all(|n| n.active));
        assert_eq!(feed.notices.len(), 2);
    }
}
