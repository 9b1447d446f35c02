/// Credential Manager Service
/// Storage for the suggestion API key in the OS credential store
use crate::config;
use crate::error::{AppError, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "FaithStream";
const SUGGESTION_API_KEY: &str = "suggestion_api_key";

/// Where the active API key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    CredentialStore,
    Environment(&'static str),
    Missing,
}

/// Credential manager for the suggestion API key
pub struct CredentialManager;

impl CredentialManager {
    fn entry() -> Result<Entry> {
        Entry::new(SERVICE_NAME, SUGGESTION_API_KEY)
            .map_err(|e| AppError::Credentials(format!("Failed to create keyring entry: {}", e)))
    }

    /// Store the API key in the OS credential store
    pub fn store_api_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(AppError::Validation("API key must not be empty".to_string()));
        }

        Self::entry()?
            .set_password(key.trim())
            .map_err(|e| AppError::Credentials(format!("Failed to store API key: {}", e)))?;

        tracing::info!("Suggestion API key stored in credential manager");
        Ok(())
    }

    /// Delete the API key from the OS credential store
    pub fn delete_api_key() -> Result<()> {
        Self::entry()?
            .delete_credential()
            .map_err(|e| AppError::Credentials(format!("Failed to delete API key: {}", e)))?;

        tracing::info!("Suggestion API key deleted from credential manager");
        Ok(())
    }

    fn stored_api_key() -> Option<String> {
        Self::entry()
            .ok()
            .and_then(|entry| entry.get_password().ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Resolve the API key: credential store first, then the environment
    pub fn resolve_api_key() -> (Option<String>, KeySource) {
        if let Some(key) = Self::stored_api_key() {
            return (Some(key), KeySource::CredentialStore);
        }

        match key_from_env(|name| std::env::var(name).ok()) {
            Some((name, key)) => (Some(key), KeySource::Environment(name)),
            None => {
                tracing::debug!("No suggestion API key configured");
                (None, KeySource::Missing)
            }
        }
    }
}

/// First non-empty value among the API key variables
fn key_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<(&'static str, String)> {
    config::API_KEY_ENV_VARS.iter().find_map(|&name| {
        lookup(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn test_gemini_key_wins() {
        let vars = HashMap::from([("GEMINI_API_KEY", "g"), ("API_KEY", "a")]);
        assert_eq!(
            key_from_env(lookup(&vars)),
            Some(("GEMINI_API_KEY", "g".to_string()))
        );
    }

    #[test]
    fn test_falls_back_to_generic_key() {
        let vars = HashMap::from([("GEMINI_API_KEY", " "), ("API_KEY", "a")]);
        assert_eq!(key_from_env(lookup(&vars)), Some(("API_KEY", "a".to_string())));
    }

    #[test]
    fn test_no_key() {
        let vars = HashMap::new();
        assert_eq!(key_from_env(lookup(&vars)), None);
    }

    #[test]
    fn test_empty_key_refused() {
        assert!(matches!(
            CredentialManager::store_api_key("   "),
            Err(AppError::Validation(_))
        ));
    }
}
