//! Where command output goes

use async_trait::async_trait;
use parking_lot::Mutex;
use std::io::Write;

use crate::error::Result;

/// Sink for the messages of one command invocation
#[async_trait]
pub trait Responder: Send + Sync {
    /// Acknowledge a command that will take a while
    async fn defer(&self) -> Result<()>;

    /// Send one message
    async fn send(&self, content: &str) -> Result<()>;
}

/// Prints messages to standard output
#[derive(Debug, Default)]
pub struct ConsoleResponder;

#[async_trait]
impl Responder for ConsoleResponder {
    async fn defer(&self) -> Result<()> {
        tracing::info!("Working on it...");
        Ok(())
    }

    async fn send(&self, content: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}\n", content)?;
        Ok(())
    }
}

/// Keeps messages in memory for the HTTP transport
#[derive(Debug, Default)]
pub struct CollectingResponder {
    deferred: Mutex<bool>,
    messages: Mutex<Vec<String>>,
}

impl CollectingResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `defer` was called
    pub fn deferred(&self) -> bool {
        *self.deferred.lock()
    }

    /// Messages sent so far, in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl Responder for CollectingResponder {
    async fn defer(&self) -> Result<()> {
        *self.deferred.lock() = true;
        Ok(())
    }

    async fn send(&self, content: &str) -> Result<()> {
        self.messages.lock().push(content.to_string());
        Ok(())
    }
}
