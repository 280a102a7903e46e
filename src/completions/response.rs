//! Chat completions response body.
//!
//! Only `choices[0].message.content` drives the conversation. The remaining
//! fields are kept for logging.

use serde::Deserialize;

use crate::core::ChatError;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
    /// Some upstreams report failures inside a 200 body.
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ChatCompletionResponse {
    pub fn parse(body: &str) -> Result<Self, ChatError> {
        serde_json::from_str(body).map_err(|e| ChatError::MalformedResponse {
            message: "Failed to parse response as JSON".to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Extracts `choices[0].message.content`.
    pub fn reply_text(self) -> Result<String, ChatError> {
        if let Some(error) = self.error {
            let message = error.message.unwrap_or_else(|| "Unknown error".to_string());
            let code = error
                .code
                .as_ref()
                .and_then(|c| c.as_u64())
                .and_then(|c| u16::try_from(c).ok());
            return Err(match code {
                Some(code) => ChatError::from_status(code, message),
                None => ChatError::malformed(format!("API error: {message}")),
            });
        }

        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::malformed("Response contained no choices"))?
            .message
            .content
            .ok_or_else(|| ChatError::malformed("First choice has no message content"))
    }
}
