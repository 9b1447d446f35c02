//! Recent library searches
//!
//! Stored as a JSON array of strings, most recent first. Unlike the
//! collections, a corrupt list is not an error: it reads as empty.

use crate::config;
use crate::error::Result;
use crate::storage::KeyValueStore;
use std::sync::Arc;

pub struct SearchHistory<S> {
    store: Arc<S>,
}

impl<S> Clone for SearchHistory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> SearchHistory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stored terms, most recent first
    pub async fn list(&self) -> Result<Vec<String>> {
        let Some(raw) = self.store.get(config::SEARCH_HISTORY_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(terms) => Ok(terms),
            Err(e) => {
                tracing::warn!("Discarding unreadable search history: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Remember a search term.
    ///
    /// Terms shorter than three characters after trimming are ignored. A term
    /// already at the top is left alone; an earlier case-insensitive duplicate
    /// moves to the top. Returns the resulting list.
    pub async fn record(&self, query: &str) -> Result<Vec<String>> {
        let term = query.trim();
        let mut terms = self.list().await?;

        if term.chars().count() < config::MIN_HISTORY_TERM_LENGTH {
            return Ok(terms);
        }
        if terms.first().map(String::as_str) == Some(term) {
            return Ok(terms);
        }

        let lowered = term.to_lowercase();
        terms.retain(|t| t.to_lowercase() != lowered);
        terms.insert(0, term.to_string());
        terms.truncate(config::MAX_SEARCH_HISTORY);

        self.save(&terms).await?;
        tracing::debug!("Recorded search term: {}", term);
        Ok(terms)
    }

    /// Forget one exact term
    pub async fn remove(&self, term: &str) -> Result<Vec<String>> {
        let mut terms = self.list().await?;
        terms.retain(|t| t != term);
        self.save(&terms).await?;
        Ok(terms)
    }

    /// Forget everything
    pub async fn clear(&self) -> Result<()> {
        self.store.remove(config::SEARCH_HISTORY_KEY).await?;
        tracing::info!("Search history cleared");
        Ok(())
    }

    async fn save(&self, terms: &[String]) -> Result<()> {
        let raw = serde_json::to_string(terms)?;
        self.store.set(config::SEARCH_HISTORY_KEY, &raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn create_test_history() -> (SearchHistory<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (SearchHistory::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn test_record_most_recent_first() {
        let (history, _store) = create_test_history();

        history.record("grace").await.unwrap();
        let terms = history.record("  faith  ").await.unwrap();

        assert_eq!(terms, vec!["faith", "grace"]);
        assert_eq!(history.list().await.unwrap(), terms);
    }

    #[tokio::test]
    async fn test_short_terms_ignored() {
        let (history, _store) = create_test_history();

        let terms = history.record(" go ").await.unwrap();

        assert!(terms.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_move_to_top() {
        let (history, _store) = create_test_history();

        history.record("Grace").await.unwrap();
        history.record("faith").await.unwrap();
        let terms = history.record("grace").await.unwrap();

        assert_eq!(terms, vec!["grace", "faith"]);
    }

    #[tokio::test]
    async fn test_capped_at_six() {
        let (history, _store) = create_test_history();

        for term in ["one", "two", "three", "four", "five", "six", "seven"] {
            history.record(term).await.unwrap();
        }

        let terms = history.list().await.unwrap();
        assert_eq!(terms.len(), 6);
        assert_eq!(terms[0], "seven");
        assert!(!terms.contains(&"one".to_string()));
    }

    #[tokio::test]
    async fn test_corrupt_history_reads_empty() {
        let (history, store) = create_test_history();
        store.set(config::SEARCH_HISTORY_KEY, "{broken").await.unwrap();

        assert!(history.list().await.unwrap().is_empty());

        let terms = history.record("worship").await.unwrap();
        assert_eq!(terms, vec!["worship"]);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (history, store) = create_test_history();
        history.record("grace").await.unwrap();
        history.record("faith").await.unwrap();

        let terms = history.remove("grace").await.unwrap();
        assert_eq!(terms, vec!["faith"]);

        history.clear().await.unwrap();
        assert_eq!(store.get(config::SEARCH_HISTORY_KEY).await.unwrap(), None);
    }
}
