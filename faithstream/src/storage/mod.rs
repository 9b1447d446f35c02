//! Storage module
//!
//! The key-value capability every collection is persisted through.
//! Values are opaque strings; callers store JSON.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use std::future::Future;

/// Key-value storage injected into the repository and session helpers.
///
/// Implementations only need to be consistent within one process. Two
/// processes writing the same key race, and the later write wins.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Read the raw value stored under `key`, if any
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}
