use serde::Serialize;

use crate::core::{Message, types::ChatRole};
use crate::provider::DEFAULT_MODEL;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Please respond in English only. Be conversational, friendly, and helpful.";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Chat completions request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Composes the system prompt, prior history and the new user message into a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model identifier sent as `model`.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the instruction sent as the first message of every request.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Upper bound on reply length.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// `history` must not already contain `new_user_text`; it is appended exactly once here.
    pub fn build(&self, history: &[Message], new_user_text: &str) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::new(ChatRole::System, self.system_prompt.as_str()));
        messages.extend(history.iter().cloned());
        messages.push(Message::new(ChatRole::User, new_user_text));

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}
