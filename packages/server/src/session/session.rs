//! Read side of one connection.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::{
    actor::{Command, HandleError, ServerHandle},
    protocol::{FALSE_RESPONSE, LINE_DELIMITER, ParsedLine, parse_line},
};

use super::client::Client;

/// Longest accepted line in bytes, delimiter included
pub const DEFAULT_MAX_LINE_LENGTH: u64 = 8 * 1024 * 1024;

/// Why a read loop ended without an I/O error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("EOF")]
    EndOfStream,

    #[error("line too long (max {0} bytes)")]
    LineTooLong(u64),
}

/// Turns incoming lines into commands for the server actor.
#[derive(Clone, Debug)]
pub struct Session {
    client: Client,
    handle: ServerHandle,
    max_line_length: u64,
}

impl Session {
    pub fn new(client: Client, handle: ServerHandle) -> Self {
        Self {
            client,
            handle,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    pub fn with_max_line_length(mut self, max_line_length: u64) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Decode one line and act on it.
    ///
    /// Malformed lines are answered here and never reach the actor. Fails only
    /// when the actor is gone.
    pub async fn handle_line(&self, line: &str) -> Result<(), HandleError> {
        match parse_line(line) {
            Ok(ParsedLine::Request(request)) => {
                self.handle
                    .submit(Command::new(self.client.clone(), request))
                    .await?
            }
            Ok(ParsedLine::Unrecognized) => {
                tracing::debug!("Unrecognized line from '{}': {:?}", self.client.addr(), line);
                self.client.write_response(FALSE_RESPONSE).await;
            }
            Err(e) => {
                tracing::debug!("Malformed line from '{}': {}", self.client.addr(), e);
                self.client.write_error(&e).await;
            }
        }
        Ok(())
    }

    /// Read lines until end of stream or a read error, then announce the
    /// client offline. The connection is never retried.
    ///
    /// Every way out of the loop except a stopped actor is reported to the
    /// connection first: `ERROR EOF` at end of stream, `ERROR <err>` otherwise.
    pub async fn run<R>(self, mut reader: R)
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = (&mut reader)
                .take(self.max_line_length)
                .read_until(LINE_DELIMITER as u8, &mut buf)
                .await;
            match read {
                Ok(0) => {
                    tracing::info!("Client '{}' closed the connection", self.client.addr());
                    self.client.write_error(&ReadError::EndOfStream).await;
                    break;
                }
                Ok(n)
                    if n as u64 == self.max_line_length
                        && buf.last() != Some(&(LINE_DELIMITER as u8)) =>
                {
                    let e = ReadError::LineTooLong(self.max_line_length);
                    tracing::warn!("Read from '{}' failed: {}", self.client.addr(), e);
                    self.client.write_error(&e).await;
                    break;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    if let Err(e) = self.handle_line(&line).await {
                        tracing::error!("Dropping session of '{}': {}", self.client.addr(), e);
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("Read from '{}' failed: {}", self.client.addr(), e);
                    self.client.write_error(&e).await;
                    break;
                }
            }
        }
        self.close().await;
    }

    /// Announce the client offline.
    pub async fn close(&self) {
        if let Err(e) = self.handle.offline(&self.client).await {
            tracing::warn!(
                "Could not announce '{}' offline: {}",
                self.client.addr(),
                e
            );
        }
    }
}
