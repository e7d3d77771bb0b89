//! Decoding of the provider's reply text.

use tracing::trace;

use crate::error::{Error, Result};
use crate::plan::AiResult;

/// Remove one surrounding markdown code fence (```` ```json ... ``` ````), if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (`json`) on the opening fence line.
    match body.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => body.trim(),
    }
}

/// Decode a reply into one of the two result shapes.
pub fn parse_ai_response(text: &str) -> Result<AiResult> {
    trace!("Raw AI response: {}", text);

    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(Error::SchemaMismatch("empty response".to_string()));
    }

    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::SchemaMismatch(format!("response is not valid JSON: {e}")))?;
    AiResult::from_value(value)
}
