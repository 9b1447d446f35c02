//! Notice commands

use crate::app::AppState;
use crate::database::{NewNotice, Notice};
use crate::error::Result;
use crate::services::{load_home, HomeFeed};
use crate::storage::KeyValueStore;

/// List notices; only active ones unless `include_inactive`
pub async fn list_notices<S: KeyValueStore>(
    state: &AppState<S>,
    include_inactive: bool,
) -> Result<Vec<Notice>> {
    if include_inactive {
        state.notices_service.list_notices().await
    } else {
        state.notices_service.active_notices().await
    }
}

pub async fn create_notice<S: KeyValueStore>(
    state: &AppState<S>,
    req: NewNotice,
) -> Result<Notice> {
    state.dashboard().await?.create_notice(req).await
}

pub async fn delete_notice<S: KeyValueStore>(state: &AppState<S>, id: &str) -> Result<()> {
    state.dashboard().await?.delete_notice(id).await
}

/// Latest media and active notices for the home page
pub async fn get_home<S: KeyValueStore>(state: &AppState<S>) -> Result<HomeFeed> {
    load_home(&state.repo).await
}
