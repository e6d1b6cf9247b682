//! Response normalization
//!
//! Maps the outcome of one chat-completion exchange onto the text the CLI
//! prints, according to the selected [`OutputMode`].

use crate::client::RawResponse;
use crate::models::{ChatCompletionResponse, OutputMode};
use crate::{Error, Result};

/// Success carries the rendered content; failure carries the typed error.
pub type ResponseOutcome = Result<String>;

pub fn normalize(raw: Result<RawResponse>, mode: OutputMode) -> ResponseOutcome {
    let raw = raw?.error_for_status()?;

    match mode {
        OutputMode::Raw => Ok(raw.body),
        OutputMode::PrettyJson => pretty_json(&raw.body),
        OutputMode::Parsed => extract_text(&raw.body),
    }
}

/// Content of `choices[0].message.content`.
pub fn extract_text(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!("Failed to parse chat completion response: {}\nBody: {}", e, body);
        Error::MalformedBody(format!("Failed to parse chat completion response: {}", e))
    })?;

    response
        .into_text()
        .ok_or_else(|| Error::MalformedBody("Response has no choices[0].message.content".to_string()))
}

/// Re-serializes the body with two-space indentation, keeping key order.
pub fn pretty_json(body: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| Error::MalformedBody(format!("Response body is not valid JSON: {}", e)))?;

    serde_json::to_string_pretty(&value)
        .map_err(|e| Error::MalformedBody(format!("Failed to format response JSON: {}", e)))
}
