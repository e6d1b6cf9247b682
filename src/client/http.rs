use super::{ChatService, RawResponse};
use crate::models::{Config, Endpoint, RequestPayload, CHAT_COMPLETIONS_PATH, HEALTH_PATH};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Upper bound on one chat-completion round trip, including body download.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for an SGLang server's OpenAI-compatible API.
pub struct SglangClient {
    client: Client,
    endpoint: Endpoint,
    model: String,
    api_key: Option<String>,
}

impl SglangClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new_with_client(config, client))
    }

    pub fn new_with_client(config: &Config, client: Client) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Display for SglangClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SglangClient(host='{}', port={}, model='{}')",
            self.endpoint.host, self.endpoint.port, self.model
        )
    }
}

#[async_trait]
impl ChatService for SglangClient {
    async fn send(&self, payload: &RequestPayload) -> Result<RawResponse> {
        let url = self.endpoint.url(CHAT_COMPLETIONS_PATH);
        tracing::debug!(
            "Sending chat completion request to {} ({} content parts)",
            url,
            payload.message().content.len()
        );

        let mut request = self.client.post(&url).json(payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("Error making request to {}: {}", url, e);
            Error::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", url, e);
            Error::Network(e.to_string())
        })?;

        let raw = RawResponse::new(status, body);
        if !raw.is_success() {
            tracing::error!("Server error from {} (status {}): {}", url, status, raw.body);
        }
        raw.error_for_status()
    }

    async fn health_check(&self) -> bool {
        let url = self.endpoint.url(HEALTH_PATH);
        match self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                tracing::debug!("Health check against {} failed: {}", url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::PayloadBuilder;
    use crate::models::DEFAULT_MODEL;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        let addr = server.address();
        Config {
            endpoint: Endpoint::new(addr.ip().to_string(), addr.port()),
            ..Config::default()
        }
    }

    /// Config pointing at a port that was bound and released, so nothing listens.
    fn closed_port_config() -> Config {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        Config {
            endpoint: Endpoint::new("127.0.0.1", port),
            ..Config::default()
        }
    }

    fn text_payload(text: &str) -> RequestPayload {
        PayloadBuilder::new(DEFAULT_MODEL, 300).build::<&str>(Some(text), &[])
    }

    #[tokio::test]
    async fn test_send_posts_payload_as_json() {
        let server = MockServer::start().await;
        let payload = PayloadBuilder::new(DEFAULT_MODEL, 300)
            .build(Some("Describe"), &["https://example.com/a.jpg"]);

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "model": DEFAULT_MODEL,
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "Describe"},
                        {"type": "image_url", "image_url": {"url": "https://example.com/a.jpg"}}
                    ]
                }],
                "max_tokens": 300
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"choices\":[]}"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SglangClient::new(&config_for(&server)).unwrap();
        let raw = client.send(&payload).await.unwrap();

        assert_eq!(raw.status, 200);
        assert_eq!(raw.body, "{\"choices\":[]}");
    }

    #[tokio::test]
    async fn test_send_attaches_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            api_key: Some("test-key".to_string()),
            ..config_for(&server)
        };
        let client = SglangClient::new(&config).unwrap();
        client.send(&text_payload("hi")).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_server_error_returns_http_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("{\"error\":\"oom\"}"))
            .mount(&server)
            .await;

        let client = SglangClient::new(&config_for(&server)).unwrap();
        let err = client.send(&text_payload("hi")).await.unwrap_err();

        match err {
            Error::HttpStatus { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("oom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_unreachable_server_returns_network_error() {
        let config = closed_port_config();

        let client = SglangClient::new(&config).unwrap();
        let err = client.send(&text_payload("hi")).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_send_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let http = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let client = SglangClient::new_with_client(&config_for(&server), http);

        let err = client.send(&text_payload("hi")).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = SglangClient::new(&config_for(&server)).unwrap();
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_non_200_is_unhealthy() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SglangClient::new(&config_for(&server)).unwrap();
        assert!(!client.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable_is_unhealthy() {
        let config = closed_port_config();

        let client = SglangClient::new(&config).unwrap();
        assert!(!client.health_check().await);
    }

    #[test]
    fn test_display() {
        let config = Config {
            endpoint: Endpoint::new("192.168.1.100", 8080),
            model: "custom-model".to_string(),
            ..Config::default()
        };
        let client = SglangClient::new(&config).unwrap();
        assert_eq!(
            client.to_string(),
            "SglangClient(host='192.168.1.100', port=8080, model='custom-model')"
        );
    }
}
