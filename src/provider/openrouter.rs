//! OpenRouter provider configuration.

use crate::core::HttpClientConfig;
use crate::provider::constants::openrouter;

/// OpenRouter-specific configuration for the completion client
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: String,
    pub base_url: String,
    pub http_referer: Option<String>,
    pub x_title: Option<String>,
    pub http_config: HttpClientConfig,
}

impl OpenRouterConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: openrouter::API_BASE.to_string(),
            http_referer: None,
            x_title: None,
            http_config: HttpClientConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn with_http_referer(mut self, http_referer: String) -> Self {
        self.http_referer = Some(http_referer);
        self
    }

    pub fn with_x_title(mut self, x_title: String) -> Self {
        self.x_title = Some(x_title);
        self
    }

    /// Attribution headers the original chatbot sent with every request.
    pub fn with_default_attribution(self) -> Self {
        self.with_http_referer(openrouter::DEFAULT_HTTP_REFERER.to_string())
            .with_x_title(openrouter::DEFAULT_X_TITLE.to_string())
    }

    pub fn provider(&self) -> crate::provider::Provider {
        crate::provider::Provider::OpenRouter
    }

    /// Full chat completions URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, openrouter::CHAT_COMPLETIONS_ENDPOINT)
    }

    /// Get the authentication header as (name, value) tuple
    pub fn auth_header(&self) -> (String, String) {
        (
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )
    }

    /// Attribution headers sent alongside the auth header
    pub fn extra_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        if let Some(referer) = &self.http_referer {
            headers.push(("HTTP-Referer".to_string(), referer.clone()));
        }

        if let Some(title) = &self.x_title {
            headers.push(("X-Title".to_string(), title.clone()));
        }

        headers
    }

    /// User agent sent with every request
    pub fn user_agent(&self) -> String {
        format!("rschat/{}", env!("CARGO_PKG_VERSION"))
    }
}
