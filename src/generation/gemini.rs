// Google Gemini implementation of GenerationClient.
//
// Calls the generateContent endpoint once per attempt with the fixed sampling
// configuration and returns the concatenated text parts of the first
// candidate. Every failure mode collapses into ServiceFailure so the retry
// loop can treat them alike.
//
// API docs: https://ai.google.dev/api/generate-content

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::build_prompt;
use super::traits::{GenerationClient, GenerationConfig};
use crate::error::ServiceFailure;
use crate::output::truncate_chars;

/// Public Gemini REST endpoint (v1beta).
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used unless GEMINI_MODEL overrides it.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini generateContent client.
pub struct GeminiClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    config: GenerationConfig,
}

impl GeminiClient {
    /// Create a client. `request_timeout` bounds each individual call.
    pub fn new(
        api_url: &str,
        api_key: String,
        model: String,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tailfinder/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            config: GenerationConfig::default(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the generateContent request for one topic.
    ///
    /// The key travels in the `x-goog-api-key` header and never in the URL.
    fn build_request(&self, topic: &str) -> reqwest::Result<reqwest::Request> {
        let url = format!("{}/models/{}:generateContent", self.api_url, self.model);

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart {
                    text: build_prompt(topic),
                }],
            }],
            generation_config: self.config,
        };

        self.client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .build()
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, topic: &str) -> Result<String, ServiceFailure> {
        let request = self
            .build_request(topic)
            .map_err(|e| ServiceFailure::new(format!("Failed to build Gemini request: {e}")))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ServiceFailure::new(format!("Gemini request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceFailure::new(format!(
                "Gemini API returned {}: {}",
                status,
                truncate_chars(&body, 300)
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ServiceFailure::new(format!("Failed to parse Gemini response: {e}")))?;

        let text = extract_text(&body)?;

        debug!(
            topic = topic,
            model = %self.model,
            chars = text.len(),
            text_preview = %truncate_chars(&text, 80),
            "Generated raw keyword text"
        );

        Ok(text)
    }
}

/// Join the text parts of the first candidate.
///
/// A response with no candidates (e.g. a blocked prompt) or only blank text
/// is treated as a service failure.
pub fn extract_text(response: &GenerateContentResponse) -> Result<String, ServiceFailure> {
    let candidate = response.candidates.first().ok_or_else(|| {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
            .unwrap_or("no candidates");
        ServiceFailure::new(format!("Invalid API response structure: {reason}"))
    })?;

    let text: String = candidate
        .content
        .as_ref()
        .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ServiceFailure::new("Empty response from API"));
    }
    Ok(text)
}

// --- Gemini API request/response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}
