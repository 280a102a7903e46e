//! Chat completions: request assembly, response parsing and the conversational client.

pub mod client;
pub mod request;
pub mod response;

pub use client::{CompletionClient, FailedTurnPolicy};
pub use request::{ChatCompletionRequest, RequestBuilder};
pub use response::ChatCompletionResponse;
