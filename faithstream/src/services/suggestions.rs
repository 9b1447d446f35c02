//! Title suggestions from a generative language model
//!
//! One request per call, no retry and no caching. Every failure (missing
//! key, network, bad status, malformed body, cancellation) is logged and
//! reported as `None`, leaving the caller's form untouched.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Structured suggestion returned by the model. Only the title is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSuggestion {
    pub suggested_title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// Client for the `generateContent` endpoint
#[derive(Clone)]
pub struct SuggestionClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl SuggestionClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("FaithStream/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask for a title, giving up as soon as `cancel` fires
    pub async fn suggest(
        &self,
        description: &str,
        cancel: &CancellationToken,
    ) -> Option<MetadataSuggestion> {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Title suggestion cancelled");
                None
            }
            result = self.request(description) => match result {
                Ok(suggestion) => {
                    tracing::info!("Suggested title: {}", suggestion.suggested_title);
                    Some(suggestion)
                }
                Err(e) => {
                    tracing::warn!("Title suggestion failed: {}", e);
                    None
                }
            },
        }
    }

    /// Run the request on its own task; dropping the handle aborts it
    pub fn spawn(&self, description: impl Into<String>) -> PendingSuggestion {
        let cancel = CancellationToken::new();
        let client = self.clone();
        let description = description.into();
        let token = cancel.clone();

        let handle = tokio::spawn(async move { client.suggest(&description, &token).await });

        PendingSuggestion {
            cancel,
            handle: Some(handle),
        }
    }

    async fn request(&self, description: &str) -> Result<MetadataSuggestion> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Credentials("No API key configured".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(description))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Generic(format!(
                "Suggestion service returned status: {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// A suggestion running in the background, cancelled when dropped
pub struct PendingSuggestion {
    cancel: CancellationToken,
    handle: Option<JoinHandle<Option<MetadataSuggestion>>>,
}

impl PendingSuggestion {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait for the result; `None` on failure or cancellation
    pub async fn wait(mut self) -> Option<MetadataSuggestion> {
        let handle = self.handle.take()?;
        match handle.await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Suggestion task failed: {}", e);
                None
            }
        }
    }
}

impl Drop for PendingSuggestion {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn prompt(description: &str) -> String {
    format!(
        "Given this church message description: \"{}\", suggest a catchy spiritual title and 3 relevant tags.",
        description
    )
}

fn request_body(description: &str) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt(description) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "suggestedTitle": { "type": "STRING" },
                    "tags": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["suggestedTitle", "tags"]
            }
        }
    })
}

/// Pull the suggestion JSON out of the first candidate's text
fn parse_response(body: &str) -> Result<MetadataSuggestion> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    let text = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or_else(|| AppError::Generic("Suggestion response had no text".to_string()))?;

    Ok(serde_json::from_str(text.trim())?)
}
