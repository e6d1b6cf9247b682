//! Data models and structures
//!
//! Defines the chat-completion wire payloads exchanged with the SGLang
//! server and the client configuration resolved from the environment.

use crate::message::DEFAULT_PROMPT;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 30000;
pub const DEFAULT_MODEL: &str = "OPEA/Mistral-Small-3.1-24B-Instruct-2503-int4-AutoRound-awq-sym";
pub const DEFAULT_MAX_TOKENS: u32 = 300;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// Image URL wrapper for multimodal message payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One content segment in a multipart message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

/// Request body for `/v1/chat/completions`.
///
/// `messages` is a one-element array, so a payload carrying any other number
/// of messages fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub model: String,
    pub messages: [ChatMessage; 1],
    pub max_tokens: u32,
}

impl RequestPayload {
    pub fn message(&self) -> &ChatMessage {
        &self.messages[0]
    }
}

/// Top-level chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if the server produced one.
    pub fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

/// How a successful response body is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Only the assistant's message text.
    #[default]
    Parsed,
    /// The response body exactly as received.
    Raw,
    /// The whole response, re-indented.
    PrettyJson,
}

impl OutputMode {
    pub fn from_flags(raw: bool, json: bool) -> Self {
        match (raw, json) {
            (true, _) => OutputMode::Raw,
            (false, true) => OutputMode::PrettyJson,
            (false, false) => OutputMode::Parsed,
        }
    }
}

/// Server address the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url())
    }
}

// Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Endpoint,
    pub model: String,
    pub api_key: Option<String>,
    pub default_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            default_prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` (if present) and resolves configuration from the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        load_dotenv()?;
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("SGLANG_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                Error::Config(format!("SGLANG_PORT must be a port number, got '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            endpoint: Endpoint::new(
                non_empty("SGLANG_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            ),
            model: non_empty("SGLANG_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: non_empty("SGLANG_API_KEY"),
            default_prompt: non_empty("SGLANG_DEFAULT_PROMPT")
                .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        })
    }

    /// Applies command-line overrides on top of environment values.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        model: Option<String>,
    ) -> Self {
        if let Some(host) = host {
            self.endpoint.host = host;
        }
        if let Some(port) = port {
            self.endpoint.port = port;
        }
        if let Some(model) = model {
            self.model = model;
        }
        self
    }
}

/// Loads `.env` from the working directory; a missing file is not an error.
pub fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}
