pub(crate) mod constants;
pub(crate) mod openrouter;

pub use constants::openrouter::DEFAULT_MODEL;
pub use openrouter::OpenRouterConfig;

use crate::core::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenRouter => write!(f, "OpenRouter"),
        }
    }
}

impl Provider {
    /// Get the default environment variable name for this provider's API key
    pub fn default_api_key_env_var(&self) -> &'static str {
        match self {
            Provider::OpenRouter => constants::openrouter::API_KEY_ENV_VAR,
        }
    }
}

/// Where the API key comes from. Keys are never compiled into the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKey {
    /// Read from the provider's default environment variable.
    Default,
    Custom(String),
}

impl ApiKey {
    pub fn resolve(&self, provider: Provider) -> Result<String, ChatError> {
        self.resolve_with(provider, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit variable lookup.
    pub fn resolve_with<F>(&self, provider: Provider, lookup: F) -> Result<String, ChatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = match self {
            ApiKey::Custom(key) => Some(key.clone()),
            ApiKey::Default => lookup(provider.default_api_key_env_var()),
        };

        key.map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ChatError::Configuration(format!(
                    "{} not set.",
                    provider.default_api_key_env_var()
                ))
            })
    }
}
