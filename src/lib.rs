//! # rschat
//!
//! A small conversational client for OpenRouter chat completions.
//!
//! The client keeps the conversation in memory, prepends a fixed system prompt
//! to every request, and turns each reply (or failure) into a result the caller
//! can render. Two front-ends ship with the crate: a terminal REPL and a static
//! file server for a browser UI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rschat::{ApiKey, CompletionClient, OpenRouterConfig, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = ApiKey::Default.resolve(Provider::OpenRouter)?;
//!     let mut client = CompletionClient::new(OpenRouterConfig::new(api_key))?;
//!
//!     match client.send("Hello!").await {
//!         Ok(reply) => println!("Bot: {reply}"),
//!         Err(e) => eprintln!("{e}"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod completions;
pub mod core;
pub mod provider;
pub mod repl;
pub mod server;
pub mod worker;

pub use crate::core::{
    ChatError, ChatRole, ChatTransport, ConversationStore, HttpClient, HttpClientConfig, Message,
};
pub use completions::{CompletionClient, FailedTurnPolicy, RequestBuilder};
pub use provider::{ApiKey, OpenRouterConfig, Provider};
pub use worker::{ChatWorker, WorkerEvent, WorkerHandle};
