//! Terminal front-end.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::worker::{WorkerEvent, WorkerHandle};

const BANNER: &str = "\
🤖 DeepSeek ChatBot
================
Type 'quit' to exit
Type 'clear' to clear conversation history
Type 'history' to show conversation history
Type your message and press Enter to chat!
";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Clear,
    History,
    Empty,
    Chat(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "quit" | "exit" | "bye" => Command::Quit,
            "clear" => Command::Clear,
            "history" => Command::History,
            "" => Command::Empty,
            _ => Command::Chat(trimmed.to_string()),
        }
    }
}

pub struct Repl<R, W> {
    input: R,
    output: W,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read commands until `quit` or end of input.
    pub async fn run(&mut self, chat: &mut WorkerHandle) -> io::Result<()> {
        self.run_until(chat, std::future::pending()).await
    }

    /// Like [`run`](Self::run), but also says goodbye and returns as soon as
    /// `shutdown` completes, even while waiting for input or a reply.
    pub async fn run_until<F>(&mut self, chat: &mut WorkerHandle, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = std::pin::pin!(shutdown);
        writeln!(self.output, "{BANNER}")?;

        loop {
            write!(self.output, "You: ")?;
            self.output.flush()?;

            let mut line = String::new();
            let read = tokio::select! {
                read = self.input.read_line(&mut line) => read?,
                () = &mut shutdown => return self.goodbye(),
            };
            if read == 0 {
                return self.goodbye();
            }

            match Command::parse(&line) {
                Command::Quit => {
                    writeln!(self.output, "👋 Goodbye!")?;
                    return Ok(());
                }
                Command::Clear => {
                    let status = match clear(chat).await {
                        Ok(()) => "Conversation history cleared!".to_string(),
                        Err(e) => e.to_string(),
                    };
                    writeln!(self.output, "{status}")?;
                }
                Command::History => {
                    let history = chat.history().await.unwrap_or_else(|e| e.to_string());
                    writeln!(self.output, "\n{history}")?;
                }
                Command::Empty => writeln!(self.output, "Please enter a message.")?,
                Command::Chat(text) => {
                    write!(self.output, "Bot: ")?;
                    self.output.flush()?;
                    let reply = tokio::select! {
                        reply = chat.send(text) => reply.unwrap_or_else(|e| e.to_string()),
                        () = &mut shutdown => return self.goodbye(),
                    };
                    writeln!(self.output, "{reply}\n")?;
                }
            }
        }
    }

    /// Farewell for end of input or an interrupt.
    fn goodbye(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n👋 Goodbye!")?;
        self.output.flush()
    }
}

async fn clear(chat: &mut WorkerHandle) -> Result<(), crate::core::ChatError> {
    chat.clear()?;
    loop {
        match chat.next_event().await {
            Some(WorkerEvent::Cleared) => return Ok(()),
            Some(WorkerEvent::Reply(_)) => continue,
            None => return Err(crate::core::ChatError::WorkerStopped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands_case_insensitively() {
        assert_eq!(Command::parse("quit\n"), Command::Quit);
        assert_eq!(Command::parse("  EXIT "), Command::Quit);
        assert_eq!(Command::parse("Bye"), Command::Quit);
        assert_eq!(Command::parse("Clear"), Command::Clear);
        assert_eq!(Command::parse("HISTORY\r\n"), Command::History);
    }

    #[test]
    fn test_parse_empty_and_chat() {
        assert_eq!(Command::parse("   \n"), Command::Empty);
        assert_eq!(
            Command::parse("  Tell me a joke \n"),
            Command::Chat("Tell me a joke".to_string())
        );
        assert_eq!(
            Command::parse("clear the table"),
            Command::Chat("clear the table".to_string())
        );
    }
}
