pub mod conversation;
pub mod error;
pub mod http;
pub mod types;

pub use conversation::ConversationStore;
pub use error::ChatError;
pub use http::{ChatTransport, HttpClient, HttpClientConfig, RawResponse};
pub use types::{ChatRole, Message};
