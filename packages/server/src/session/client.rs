//! Write path of one connection.

use std::{error::Error, fmt, sync::Arc};

use crate::{
    domain::{ClientAddr, LineSink, SessionId},
    protocol::format_error,
};

/// A connected client: its address, session id and write handle.
///
/// Cloning is cheap; every clone writes to the same connection.
#[derive(Clone)]
pub struct Client {
    addr: ClientAddr,
    session_id: SessionId,
    sink: Arc<dyn LineSink>,
}

impl Client {
    /// Bind a freshly accepted connection, issuing a new session id.
    pub fn new(addr: ClientAddr, sink: Arc<dyn LineSink>) -> Self {
        Self {
            addr,
            session_id: SessionId::generate(),
            sink,
        }
    }

    pub fn addr(&self) -> &ClientAddr {
        &self.addr
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Write a response line. A failed write is reported through
    /// [`write_error`](Self::write_error).
    pub async fn write_response(&self, response: &str) {
        match self.sink.send_line(response).await {
            Ok(()) => tracing::debug!("Wrote to '{}': {}", self.addr, response),
            Err(e) => {
                tracing::warn!("Failed to write response to '{}': {}", self.addr, e);
                self.write_error(&e).await;
            }
        }
    }

    /// Write `ERROR <description>`. A failure here is logged and dropped.
    pub async fn write_error(&self, error: &(dyn Error + Send + Sync)) {
        let line = format_error(error);
        match self.sink.send_line(&line).await {
            Ok(()) => tracing::debug!("Wrote to '{}': {}", self.addr, line),
            Err(e) => tracing::warn!(
                "Failed to report error to '{}', giving up: {}",
                self.addr,
                e
            ),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("addr", &self.addr)
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

/// Sink that keeps every line in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    lines: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl LineSink for RecordingSink {
    async fn send_line(&self, line: &str) -> Result<(), crate::domain::SinkError> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}
