//! Pulls the JSON payload out of a free-form model reply.
//!
//! Models usually answer with the object inside a fenced code block, often
//! tagged `json`, sometimes with a sentence before or after it. Extraction
//! only strips that wrapping; deciding whether what is left is valid is the
//! parser's job.

use super::SuggestError;

const FENCE: &str = "```";

/// Returns the part of `text` that should hold the JSON object.
///
/// Fails with [`SuggestError::EmptyResponse`] when the reply, or the fenced
/// block inside it, is blank.
pub fn extract_json(text: &str) -> Result<&str, SuggestError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SuggestError::EmptyResponse);
    }

    let body = strip_fence(trimmed).unwrap_or(trimmed).trim();
    if body.is_empty() {
        return Err(SuggestError::EmptyResponse);
    }
    if body.starts_with('{') || body.starts_with('[') {
        return Ok(body);
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&body[start..=end]),
        _ => Ok(body),
    }
}

/// The contents of the first fenced block, if there is one.
fn strip_fence(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after = &text[open + FENCE.len()..];

    // An info string such as `json` runs to the end of the opening line.
    let content = match after.find('\n') {
        Some(newline) if is_info_string(&after[..newline]) => &after[newline + 1..],
        _ => after,
    };

    match content.find(FENCE) {
        Some(close) => Some(&content[..close]),
        None => Some(content),
    }
}

fn is_info_string(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
