//! Conversational client for chat-completion style providers.

use tracing::{debug, info, warn};

use super::request::{ChatCompletionRequest, RequestBuilder};
use super::response::ChatCompletionResponse;
use crate::core::{ChatError, ChatRole, ChatTransport, ConversationStore, HttpClient, Message};
use crate::provider::OpenRouterConfig;

/// What happens to the user message of a turn that failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailedTurnPolicy {
    /// Leave it in history unanswered. See [`ConversationStore::unanswered`].
    #[default]
    KeepOrphan,
    /// Remove it so history stays strictly paired.
    Rollback,
}

/// A single conversation with a remote model.
///
/// Each client owns its own history; at most one turn may be in flight at a
/// time, which `&mut self` on [`CompletionClient::send`] enforces.
pub struct CompletionClient {
    pub config: OpenRouterConfig,
    pub builder: RequestBuilder,
    store: ConversationStore,
    transport: Box<dyn ChatTransport>,
    failed_turn_policy: FailedTurnPolicy,
}

impl CompletionClient {
    /// Create a client that talks HTTP to the configured provider.
    pub fn new(config: OpenRouterConfig) -> Result<Self, ChatError> {
        let user_agent = config.user_agent();
        let http = HttpClient::new(config.http_config.clone(), Some(&user_agent))?;
        Ok(Self::with_transport(config, http))
    }

    /// Create a client over any [`ChatTransport`], e.g. a stub in tests.
    pub fn with_transport(
        config: OpenRouterConfig,
        transport: impl ChatTransport + 'static,
    ) -> Self {
        Self {
            config,
            builder: RequestBuilder::default(),
            store: ConversationStore::new(),
            transport: Box::new(transport),
            failed_turn_policy: FailedTurnPolicy::default(),
        }
    }

    pub fn with_request_builder(mut self, builder: RequestBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_failed_turn_policy(mut self, policy: FailedTurnPolicy) -> Self {
        self.failed_turn_policy = policy;
        self
    }

    /// Messages recorded so far, oldest first.
    pub fn history(&self) -> &[Message] {
        self.store.snapshot()
    }

    pub fn unanswered(&self) -> Vec<usize> {
        self.store.unanswered()
    }

    /// Forget the conversation. The next turn starts from the system prompt alone.
    pub fn clear(&mut self) {
        self.store.clear();
        debug!("Conversation history cleared");
    }

    pub fn show_history(&self) -> String {
        self.store.show_history()
    }

    /// Run one turn and return the reply, or a tagged failure.
    ///
    /// The user message is recorded before the request goes out. The reply is
    /// recorded only on success.
    #[tracing::instrument(
        name = "chat_turn",
        skip(self, text),
        fields(provider = %self.config.provider(), history_len = self.store.len()),
        err
    )]
    pub async fn send(&mut self, text: &str) -> Result<String, ChatError> {
        let request = self.builder.build(self.store.snapshot(), text);
        self.store.append(ChatRole::User, text);

        match self.exchange(&request).await {
            Ok(reply) => {
                self.store.append(ChatRole::Assistant, reply.as_str());
                info!(reply_len = reply.len(), "Turn completed");
                Ok(reply)
            }
            Err(e) => {
                if self.failed_turn_policy == FailedTurnPolicy::Rollback {
                    self.store.pop_user();
                }
                Err(e)
            }
        }
    }

    /// Like [`send`](Self::send), but renders any failure as display text.
    pub async fn send_message(&mut self, text: &str) -> String {
        self.send(text).await.unwrap_or_else(|e| e.to_string())
    }

    async fn exchange(&self, request: &ChatCompletionRequest) -> Result<String, ChatError> {
        let body = serde_json::to_value(request).map_err(|e| ChatError::MalformedResponse {
            message: "Failed to serialize request".to_string(),
            source: Some(Box::new(e)),
        })?;

        let mut headers = vec![self.config.auth_header()];
        headers.extend(self.config.extra_headers());

        debug!(messages = request.messages.len(), model = %request.model, "Sending completion request");
        let response = self
            .transport
            .post_json(&self.config.url(), &headers, &body)
            .await?;

        if response.status != 200 {
            warn!(status = response.status, "Completion request failed");
            return Err(ChatError::from_status(response.status, response.body));
        }

        let parsed = ChatCompletionResponse::parse(&response.body)?;
        if let Some(usage) = &parsed.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Token usage"
            );
        }
        parsed.reply_text()
    }
}
