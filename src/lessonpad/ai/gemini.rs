//! Google Generative Language (`generateContent`) endpoint.

use super::{SuggestError, TextCompletion};
use crate::config::AiConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::debug;

pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Builds a client from config, reading the API key from the environment
    /// variable the config names.
    pub fn from_config(config: &AiConfig) -> Result<Self, SuggestError> {
        debug!(model = %config.model, base_url = %config.base_url, "GeminiClient::from_config");
        let api_key = env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SuggestError::MissingCredential(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    pub fn new(config: &AiConfig, api_key: String) -> Result<Self, SuggestError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint_url(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

impl TextCompletion for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String, SuggestError> {
        let url = self.endpoint_url();
        debug!(%url, "complete: sending request");
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            debug!(status = status.as_u16(), "complete: API error");
            return Err(SuggestError::Upstream {
                status: Some(status.as_u16()),
                message: api_error_message(&message),
            });
        }

        let envelope: GenerateContentResponse = response.json()?;
        response_text(envelope)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Joins the text parts of the first candidate.
fn response_text(envelope: GenerateContentResponse) -> Result<String, SuggestError> {
    if let Some(reason) = envelope.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(SuggestError::Upstream {
            status: None,
            message: format!("prompt blocked: {}", reason),
        });
    }

    let text = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

/// Prefers the `error.message` field of a JSON error body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
