//! In-memory key-value store
//!
//! Used by tests and by the `--ephemeral` mode of the binary.

use super::KeyValueStore;
use crate::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-local store backed by a shared map
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| crate::error::AppError::Generic(format!("Store lock poisoned: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| crate::error::AppError::Generic(format!("Store lock poisoned: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| crate::error::AppError::Generic(format!("Store lock poisoned: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();

        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("shared", "yes").await.unwrap();

        assert_eq!(other.get("shared").await.unwrap(), Some("yes".to_string()));
    }
}
