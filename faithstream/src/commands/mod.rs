//! Commands exposed to the command-line front end
//!
//! This module organizes commands into logical submodules:
//! - `media`: Library listing, playback counters and media editing
//! - `notices`: Notices and the home feed
//! - `admins`: Login, session, routes and admin management
//! - `history`: Recent library searches
//! - `suggestions`: AI title suggestions and the API key
//! - `settings`: Suggestion model and endpoint settings

pub mod admins;
pub mod history;
pub mod media;
pub mod notices;
pub mod settings;
pub mod suggestions;

use crate::app::AppState;
use crate::error::Result;
use crate::storage::KeyValueStore;

pub use admins::*;
pub use history::*;
pub use media::*;
pub use notices::*;
pub use settings::*;
pub use suggestions::*;

// ===== General Commands =====

/// Get application information
pub async fn get_app_info<S: KeyValueStore>(state: &AppState<S>) -> Result<AppInfo> {
    Ok(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        app_data_dir: state.app_data_dir.to_string_lossy().to_string(),
        suggestion_model: state.settings.suggestions.model.clone(),
        suggestions_enabled: state.suggestions.has_api_key(),
    })
}

/// Application information structure
#[derive(serde::Serialize)]
pub struct AppInfo {
    pub version: String,
    pub app_data_dir: String,
    pub suggestion_model: String,
    pub suggestions_enabled: bool,
}
