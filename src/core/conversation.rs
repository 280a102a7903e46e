//! In-memory conversation history for a single client.

use super::types::{ChatRole, Message};

/// Ordered, role-tagged history of one conversation.
///
/// The system prompt is never stored here; it is added when a request is built.
/// Role alternation is not enforced, so two user messages in a row are accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message at the end of the history. Content is stored verbatim.
    ///
    /// ```
    /// use rschat::{ChatRole, ConversationStore, Message};
    ///
    /// let mut store = ConversationStore::new();
    /// store.append(ChatRole::User, "  hi  ");
    /// assert_eq!(store.snapshot(), &[Message::user("  hi  ")]);
    /// ```
    pub fn append(&mut self, role: ChatRole, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Read-only view of the history in insertion order.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Removes the last message if it is a user message and returns it.
    pub(crate) fn pop_user(&mut self) -> Option<Message> {
        match self.messages.last() {
            Some(message) if message.role == ChatRole::User => self.messages.pop(),
            _ => None,
        }
    }

    /// Indices of user messages that never received an assistant reply.
    pub fn unanswered(&self) -> Vec<usize> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(i, message)| {
                message.role == ChatRole::User
                    && self
                        .messages
                        .get(i + 1)
                        .is_none_or(|next| next.role != ChatRole::Assistant)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Numbered "You"/"Bot" rendering of the history.
    pub fn show_history(&self) -> String {
        if self.messages.is_empty() {
            return "No conversation history.".to_string();
        }

        let mut out = String::from("--- Conversation History ---\n");
        for (i, message) in self.messages.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}: {}\n\n",
                i + 1,
                message.role.label(),
                message.content
            ));
        }
        out
    }
}
