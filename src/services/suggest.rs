//! Example sentence suggestions from the Gemini API
//!
//! Callers always get a string back. Failures are logged and turned into
//! a fixed placeholder that can be shown as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Settings;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const MISSING_KEY_MESSAGE: &str = "API key not configured.";
pub const FAILURE_MESSAGE: &str = "Could not generate an example.";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[async_trait]
pub trait ExampleSuggester: Send + Sync {
    /// A learner-level example sentence using `word`, written in `language`
    async fn suggest(&self, word: &str, language: &str) -> String;
}

#[derive(Error, Debug)]
enum SuggestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response contained no text")]
    Empty,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
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

pub struct GeminiSuggester {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiSuggester {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Failed to build HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Key from the settings file, else from `GEMINI_API_KEY`
    pub fn from_settings(settings: &Settings) -> Self {
        let key = settings
            .gemini_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok());
        Self::new(key, settings.gemini_model.clone())
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, api_key: &str, prompt: String) -> Result<String, SuggestError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            return Err(SuggestError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl ExampleSuggester for GeminiSuggester {
    async fn suggest(&self, word: &str, language: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            log::error!("{} is not set and no key is configured", API_KEY_ENV);
            return MISSING_KEY_MESSAGE.to_string();
        };

        match self.generate(api_key, prompt(word, language)).await {
            Ok(text) => clean_suggestion(&text),
            Err(e) => {
                log::error!("Error fetching example for '{}': {}", word, e);
                FAILURE_MESSAGE.to_string()
            }
        }
    }
}

fn prompt(word: &str, language: &str) -> String {
    format!(
        "Provide a simple, clear example sentence for the word \"{}\" in {}. \
         The sentence should be appropriate for a language learner. Return only the sentence.",
        word, language
    )
}

/// Trim the model's answer and drop double quotes
pub fn clean_suggestion(text: &str) -> String {
    text.trim().replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_suggestion() {
        assert_eq!(clean_suggestion("  \"Jag har ett hus.\"\n"), "Jag har ett hus.");
        assert_eq!(clean_suggestion("Han sa \"hej\"."), "Han sa hej.");
    }

    #[test]
    fn test_prompt_mentions_word_and_language() {
        let p = prompt("hus", "Swedish");
        assert!(p.contains("\"hus\""));
        assert!(p.contains("in Swedish."));
    }

    #[tokio::test]
    async fn test_missing_key_placeholder() {
        let suggester = GeminiSuggester::new(Some("   ".to_string()), "gemini-2.5-flash");
        assert!(!suggester.has_key());
        assert_eq!(suggester.suggest("hus", "Swedish").await, MISSING_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_gives_failure_placeholder() {
        let suggester = GeminiSuggester::new(Some("key".to_string()), "gemini-2.5-flash")
            .with_base_url("http://127.0.0.1:9");
        assert_eq!(suggester.suggest("hus", "Swedish").await, FAILURE_MESSAGE);
    }

    #[test]
    fn test_response_text_is_joined() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Ett "},{"text":"hus."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect();
        assert_eq!(text, "Ett hus.");
    }
}
