//! AI suggestion client.
//!
//! The completion endpoint is opaque: it takes a prompt and returns free-form
//! text. [`suggest`] turns a draft into a prompt, calls the endpoint, and runs
//! an explicit extract-then-parse step over the reply so that every way the
//! reply can be unusable has its own [`SuggestError`] variant.

use crate::model::{LessonRecord, Suggestion};
use thiserror::Error;
use tracing::debug;

pub mod extract;
mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;

/// Errors from asking the endpoint for a suggestion.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("{}", upstream_message(.status, .message))]
    Upstream { status: Option<u16>, message: String },

    #[error("Empty response from AI model")]
    EmptyResponse,

    #[error("Failed to parse AI response: {0}")]
    MalformedResponse(String),

    #[error("No API key found; set the {0} environment variable")]
    MissingCredential(String),
}

fn upstream_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("AI service returned {}: {}", status, message),
        None => format!("AI service unreachable: {}", message),
    }
}

impl From<reqwest::Error> for SuggestError {
    fn from(e: reqwest::Error) -> Self {
        SuggestError::Upstream {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

/// A text-completion endpoint.
pub trait TextCompletion {
    fn complete(&self, prompt: &str) -> Result<String, SuggestError>;
}

/// Asks `endpoint` to fill in `draft`.
///
/// Callers are expected to have checked that topic, subject and grade level
/// are filled in. Nothing is persisted.
pub fn suggest<E: TextCompletion + ?Sized>(
    endpoint: &E,
    draft: &LessonRecord,
) -> Result<Suggestion, SuggestError> {
    let prompt = prompt::build_prompt(draft);
    debug!(prompt_len = prompt.len(), topic = %draft.topic, "suggest: requesting completion");

    let text = endpoint.complete(&prompt)?;
    debug!(response_len = text.len(), "suggest: got response");

    let json = extract::extract_json(&text)?;
    serde_json::from_str(json).map_err(|e| SuggestError::MalformedResponse(e.to_string()))
}
