//! Search history commands

use crate::app::AppState;
use crate::error::Result;
use crate::storage::KeyValueStore;

pub async fn list_history<S: KeyValueStore>(state: &AppState<S>) -> Result<Vec<String>> {
    state.search_history.list().await
}

pub async fn remove_history_term<S: KeyValueStore>(
    state: &AppState<S>,
    term: &str,
) -> Result<Vec<String>> {
    state.search_history.remove(term).await
}

pub async fn clear_history<S: KeyValueStore>(state: &AppState<S>) -> Result<()> {
    state.search_history.clear().await
}
