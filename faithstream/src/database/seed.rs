//! Default collections written the first time a key is read.

use super::models::{Admin, AdminRole, Category, Media, Notice, Priority};
use chrono::{NaiveDate, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn default_media() -> Vec<Media> {
    let now = Utc::now();
    vec![
        Media {
            id: "1".to_string(),
            title: "The Power of Grace".to_string(),
            preacher: "Pastor John Doe".to_string(),
            category: Category::Sermon,
            description: Some(
                "An inspiring message about the transformative power of grace in our daily lives."
                    .to_string(),
            ),
            date_preached: date(2023, 10, 15),
            file_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3".to_string(),
            thumbnail_url: "https://picsum.photos/seed/sermon1/800/600".to_string(),
            duration: "45:20".to_string(),
            play_count: 1250,
            download_count: 450,
            created_at: now,
        },
        Media {
            id: "2".to_string(),
            title: "Morning Worship Session".to_string(),
            preacher: "Faith Choir".to_string(),
            category: Category::Worship,
            description: Some(
                "A soul-stirring worship session to start your week with praise.".to_string(),
            ),
            date_preached: date(2023, 11, 1),
            file_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3".to_string(),
            thumbnail_url: "https://picsum.photos/seed/worship1/800/600".to_string(),
            duration: "15:10".to_string(),
            play_count: 3400,
            download_count: 890,
            created_at: now,
        },
    ]
}

pub fn default_admins() -> Vec<Admin> {
    vec![Admin {
        id: "admin-1".to_string(),
        email: "admin@church.com".to_string(),
        role: AdminRole::FullAccess,
    }]
}

pub fn default_notices() -> Vec<Notice> {
    let now = Utc::now();
    vec![
        Notice {
            id: "n1".to_string(),
            title: "Mid-Week Communion Service".to_string(),
            message: "Join us this Wednesday for a special communion service as we partake in the table of the Lord. Time: 6:00 PM.".to_string(),
            date: now,
            priority: Priority::High,
            active: true,
            image_url: Some("https://picsum.photos/seed/communion/800/400".to_string()),
        },
        Notice {
            id: "n2".to_string(),
            title: "Youth Aflame Summit".to_string(),
            message: "Calling all youths! The annual Youth Aflame Summit is here. Theme: \"Dominion\". Don't miss out!".to_string(),
            date: now,
            priority: Priority::Normal,
            active: true,
            image_url: Some("https://picsum.photos/seed/youth/800/400".to_string()),
        },
    ]
}
