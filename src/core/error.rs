use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every way a single chat turn can fail.
///
/// Variants that originate from an HTTP status always carry the numeric
/// status and the raw response body, and both show up in the rendered message.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Authentication failed: {status} - {body}")]
    Authentication { status: u16, body: String },

    #[error("Rate limited: {status} - {body}")]
    RateLimited { status: u16, body: String },

    #[error("Error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {message}")]
    MalformedResponse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Network error: {message}: {source}")]
    Transport {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("A message is already being sent")]
    Busy,

    #[error("Chat worker has stopped")]
    WorkerStopped,
}

impl ChatError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => ChatError::Authentication { status, body },
            402 | 429 => ChatError::RateLimited { status, body },
            _ => ChatError::Api { status, body },
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ChatError::MalformedResponse {
            message: message.into(),
            source: None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ChatError::Authentication { status, .. }
            | ChatError::RateLimited { status, .. }
            | ChatError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ChatError::from_status(401, "unauthorized"),
            ChatError::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            ChatError::from_status(403, ""),
            ChatError::Authentication { .. }
        ));
        assert!(matches!(
            ChatError::from_status(429, "slow down"),
            ChatError::RateLimited { status: 429, .. }
        ));
        assert!(matches!(
            ChatError::from_status(402, "no credits"),
            ChatError::RateLimited { .. }
        ));
        assert!(matches!(
            ChatError::from_status(500, "boom"),
            ChatError::Api { status: 500, .. }
        ));
    }

    #[test]
    fn test_display_carries_status_and_body() {
        let rendered = ChatError::from_status(401, "unauthorized").to_string();
        assert!(rendered.contains("401"));
        assert!(rendered.contains("unauthorized"));

        let rendered = ChatError::from_status(503, "upstream down").to_string();
        assert_eq!(rendered, "Error: 503 - upstream down");
    }

    #[test]
    fn test_status_code_only_for_http_failures() {
        assert_eq!(ChatError::from_status(429, "").status_code(), Some(429));
        assert_eq!(ChatError::malformed("bad json").status_code(), None);
        assert_eq!(ChatError::Busy.status_code(), None);
    }
}
