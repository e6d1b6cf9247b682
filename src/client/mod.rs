//! Chat-completion transport
//!
//! A [`ChatService`] performs the single HTTP exchange with the model server.
//! [`SglangClient`] talks to a real server; [`MockChatClient`] replays canned
//! responses for tests.

pub mod http;
pub mod mock;

pub use http::SglangClient;
pub use mock::MockChatClient;

use crate::models::RequestPayload;
use crate::{Error, Result};
use async_trait::async_trait;

/// Status and fully-read body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts a non-2xx response into [`Error::HttpStatus`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::http_status(self.status, &self.body))
        }
    }
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// POSTs `payload` to the chat-completions endpoint exactly once.
    async fn send(&self, payload: &RequestPayload) -> Result<RawResponse>;

    /// Returns true when the server answers its health probe with 200.
    async fn health_check(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }

    #[test]
    fn test_error_for_status() {
        let ok = RawResponse::new(200, "{}").error_for_status().unwrap();
        assert_eq!(ok.body, "{}");

        let err = RawResponse::new(503, "busy").error_for_status().unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    }
}
