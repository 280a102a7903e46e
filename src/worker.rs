//! Background chat worker.
//!
//! The worker task owns the [`CompletionClient`]. Front-ends talk to it only
//! through a [`WorkerHandle`]: commands go in over one channel and results come
//! back over another, to be drained on whichever thread owns the UI. The handle
//! refuses a new message while a reply is still outstanding.

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::completions::CompletionClient;
use crate::core::ChatError;

enum Command {
    Send(String),
    Clear,
    History(oneshot::Sender<String>),
}

/// Results delivered back to the owning thread.
#[derive(Debug)]
pub enum WorkerEvent {
    Reply(Result<String, ChatError>),
    Cleared,
}

pub struct ChatWorker;

impl ChatWorker {
    /// Move `client` onto a tokio task. Must be called inside a runtime.
    pub fn spawn(client: CompletionClient) -> WorkerHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(client, command_rx, event_tx));

        WorkerHandle {
            commands: command_tx,
            events: event_rx,
            in_flight: false,
            task,
        }
    }
}

async fn run(
    mut client: CompletionClient,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<WorkerEvent>,
) {
    while let Some(command) = commands.recv().await {
        let event = match command {
            Command::Send(text) => WorkerEvent::Reply(client.send(&text).await),
            Command::Clear => {
                client.clear();
                WorkerEvent::Cleared
            }
            Command::History(reply) => {
                let _ = reply.send(client.show_history());
                continue;
            }
        };

        if events.send(event).is_err() {
            break;
        }
    }
    debug!("Chat worker stopped");
}

pub struct WorkerHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: mpsc::UnboundedReceiver<WorkerEvent>,
    in_flight: bool,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    /// True from a successful [`submit`](Self::submit) until its reply has been received.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn submit(&mut self, text: impl Into<String>) -> Result<(), ChatError> {
        if self.in_flight {
            return Err(ChatError::Busy);
        }
        self.commands
            .send(Command::Send(text.into()))
            .map_err(|_| ChatError::WorkerStopped)?;
        self.in_flight = true;
        Ok(())
    }

    /// Queue a history reset. Runs after any turn already submitted.
    pub fn clear(&self) -> Result<(), ChatError> {
        self.commands
            .send(Command::Clear)
            .map_err(|_| ChatError::WorkerStopped)
    }

    pub async fn history(&self) -> Result<String, ChatError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::History(tx))
            .map_err(|_| ChatError::WorkerStopped)?;
        rx.await.map_err(|_| ChatError::WorkerStopped)
    }

    /// Wait for the next event. `None` once the worker has stopped.
    pub async fn next_event(&mut self) -> Option<WorkerEvent> {
        let event = self.events.recv().await;
        self.observe(event)
    }

    /// Non-blocking poll, for UI loops that drain events once per frame.
    pub fn try_next_event(&mut self) -> Option<WorkerEvent> {
        match self.events.try_recv() {
            Ok(event) => self.observe(Some(event)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.observe(None),
        }
    }

    /// Submit a message and wait for its reply.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<String, ChatError> {
        self.submit(text)?;
        loop {
            match self.next_event().await {
                Some(WorkerEvent::Reply(reply)) => return reply,
                Some(WorkerEvent::Cleared) => continue,
                None => return Err(ChatError::WorkerStopped),
            }
        }
    }

    /// Stop the worker. A turn still in flight is abandoned rather than awaited.
    pub async fn shutdown(self) {
        drop(self.commands);
        if self.in_flight {
            self.task.abort();
        }
        let _ = self.task.await;
    }

    fn observe(&mut self, event: Option<WorkerEvent>) -> Option<WorkerEvent> {
        match &event {
            Some(WorkerEvent::Reply(_)) | None => self.in_flight = false,
            Some(WorkerEvent::Cleared) => {}
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChatTransport, RawResponse};
    use crate::provider::OpenRouterConfig;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Replies with the last user message, optionally waiting for a release signal.
    struct EchoTransport {
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl ChatTransport for EchoTransport {
        async fn post_json(
            &self,
            _url: &str,
            _headers: &[(String, String)],
            body: &Value,
        ) -> Result<RawResponse, ChatError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let messages = body["messages"].as_array().unwrap();
            let last = messages.last().unwrap()["content"].as_str().unwrap();
            Ok(RawResponse {
                status: 200,
                body: serde_json::json!({
                    "choices": [{ "message": { "content": format!("echo: {last}") } }]
                })
                .to_string(),
            })
        }
    }

    fn spawn(gate: Option<Arc<Notify>>) -> WorkerHandle {
        let client = CompletionClient::with_transport(
            OpenRouterConfig::new("sk-test".to_string()),
            EchoTransport { gate },
        );
        ChatWorker::spawn(client)
    }

    #[tokio::test]
    async fn test_send_round_trip() {
        let mut handle = spawn(None);

        assert_eq!(handle.send("hello").await.unwrap(), "echo: hello");
        assert!(!handle.is_busy());

        let history = handle.history().await.unwrap();
        assert!(history.contains("1. You: hello"));
        assert!(history.contains("2. Bot: echo: hello"));

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_second_submission_is_rejected_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let mut handle = spawn(Some(gate.clone()));

        handle.submit("first").unwrap();
        assert!(handle.is_busy());
        assert!(matches!(handle.submit("second"), Err(ChatError::Busy)));
        assert!(handle.try_next_event().is_none());

        gate.notify_one();
        let event = tokio::time::timeout(Duration::from_secs(5), handle.next_event())
            .await
            .expect("reply in time");
        assert!(matches!(event, Some(WorkerEvent::Reply(Ok(ref r))) if r == "echo: first"));
        assert!(!handle.is_busy());

        handle.submit("third").unwrap();
        gate.notify_one();
        handle.next_event().await;
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_clear_resets_worker_history() {
        let mut handle = spawn(None);
        handle.send("hello").await.unwrap();

        handle.clear().unwrap();
        assert!(matches!(handle.next_event().await, Some(WorkerEvent::Cleared)));
        assert_eq!(handle.history().await.unwrap(), "No conversation history.");

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_abandons_turn_in_flight() {
        let gate = Arc::new(Notify::new());
        let mut handle = spawn(Some(gate));

        handle.submit("never answered").unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
            .await
            .expect("shutdown does not wait for the reply");
    }
}
