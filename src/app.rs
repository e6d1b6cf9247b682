//! Application orchestration for a single chat invocation.

use crate::client::{ChatService, SglangClient};
use crate::message::PayloadBuilder;
use crate::models::{Config, OutputMode};
use crate::response::{normalize, ResponseOutcome};
use crate::Result;
use tracing::{debug, info};

/// What the user asked for on one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatRequest {
    pub text: Option<String>,
    pub image_urls: Vec<String>,
    pub mode: OutputMode,
}

/// Builds the payload, sends it, and renders the reply.
pub struct App {
    chat: Box<dyn ChatService>,
    builder: PayloadBuilder,
}

impl App {
    /// Build an app around an arbitrary transport, e.g. a mock.
    pub fn with_service(chat: Box<dyn ChatService>, builder: PayloadBuilder) -> Self {
        Self { chat, builder }
    }

    /// Build an app that talks to the server described by `config`.
    pub fn new(config: &Config, max_tokens: u32) -> Result<Self> {
        let client = SglangClient::new(config)?;
        info!("Using {}", client);

        let builder = PayloadBuilder::new(config.model.clone(), max_tokens)
            .with_default_prompt(config.default_prompt.clone());

        Ok(Self::with_service(Box::new(client), builder))
    }

    pub async fn run(&self, request: &ChatRequest) -> ResponseOutcome {
        let payload = self
            .builder
            .build(request.text.as_deref(), &request.image_urls);
        debug!(
            "Built payload with {} image(s) for model {}",
            request.image_urls.len(),
            payload.model
        );

        let raw = self.chat.send(&payload).await;
        normalize(raw, request.mode)
    }

    pub async fn health_check(&self) -> bool {
        self.chat.health_check().await
    }
}
