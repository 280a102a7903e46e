//! HTTP transport used by the completion client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ChatError;

/// Configuration for the underlying HTTP client
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Total request timeout. `None` keeps reqwest's default, which never times out.
    pub timeout: Option<Duration>,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// One request/response exchange with the completion endpoint.
///
/// Non-success statuses are returned as a [`RawResponse`], not as an error;
/// only failures to complete the exchange at all are errors.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> Result<RawResponse, ChatError>;
}

/// reqwest-backed transport.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig, user_agent: Option<&str>) -> Result<Self, ChatError> {
        let default_ua = format!("rschat/{}", env!("CARGO_PKG_VERSION"));
        let ua = user_agent.unwrap_or(&default_ua);

        let mut builder = reqwest::Client::builder().user_agent(ua);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            ChatError::Configuration(format!("Failed to build reqwest client: {e}"))
        })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ChatTransport for HttpClient {
    #[tracing::instrument(
        name = "http_post_json",
        skip(self, headers, body),
        fields(url = %url),
        err
    )]
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> Result<RawResponse, ChatError> {
        let mut req_builder = self.client.post(url).json(body);
        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        let res = req_builder.send().await.map_err(|e| ChatError::Transport {
            message: "Request failed".to_string(),
            source: Box::new(e),
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| ChatError::Transport {
            message: "Failed to read response body".to_string(),
            source: Box::new(e),
        })?;

        if status.is_success() {
            debug!(status = %status, bytes = body.len(), "HTTP request successful");
        } else {
            warn!(status = %status, "API returned error status");
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_no_timeout() {
        assert!(HttpClientConfig::default().timeout.is_none());
    }

    #[test]
    fn test_client_builds_with_timeout() {
        let config = HttpClientConfig {
            timeout: Some(Duration::from_secs(5)),
        };
        assert!(HttpClient::new(config, Some("rschat-test")).is_ok());
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Grab a free port, then close it so nothing is listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::new(HttpClientConfig::default(), None).unwrap();
        let err = client
            .post_json(&format!("http://{addr}/chat/completions"), &[], &Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Transport { .. }));
    }
}
