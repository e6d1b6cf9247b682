use super::{ChatService, RawResponse};
use crate::models::RequestPayload;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

enum MockReply {
    Response(RawResponse),
    NetworkError(String),
}

/// In-memory [`ChatService`] that records payloads and replays canned replies.
#[derive(Clone)]
pub struct MockChatClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<RequestPayload>>>,
    healthy: bool,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            healthy: true,
        }
    }

    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Response(RawResponse::new(status, body)));
        self
    }

    pub fn with_network_error(self, detail: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::NetworkError(detail.into()));
        self
    }

    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<RequestPayload> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn send(&self, payload: &RequestPayload) -> Result<RawResponse> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(payload.clone());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Ok(RawResponse::new(
                200,
                r#"{"choices":[{"message":{"role":"assistant","content":"mock reply"}}]}"#,
            ));
        }

        let index = (requests.len() - 1) % replies.len();
        match &replies[index] {
            MockReply::Response(raw) => raw.clone().error_for_status(),
            MockReply::NetworkError(detail) => Err(Error::Network(detail.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}
