//! Services module
//!
//! Business logic services that coordinate between commands and repository.

pub mod auth;
pub mod credentials;
pub mod dashboard;
pub mod home;
pub mod library;
pub mod media;
pub mod notices;
pub mod player;
pub mod search_history;
pub mod settings;
pub mod suggestions;
pub mod uploads;

pub use auth::{AuthService, LoginError};
pub use credentials::{CredentialManager, KeySource};
pub use dashboard::{Dashboard, FormErrors, MediaForm};
pub use home::{load_home, HomeFeed};
pub use library::{CategoryFilter, MediaQuery, SortKey, SortOrder, SortSpec};
pub use media::{DownloadTicket, LibraryStats, MediaService};
pub use notices::NoticesService;
pub use player::{format_time, Player, PlayerState};
pub use search_history::SearchHistory;
pub use settings::{AppSettings, SettingsService, SuggestionSettings};
pub use suggestions::{MetadataSuggestion, PendingSuggestion, SuggestionClient};
pub use uploads::FileInfo;
