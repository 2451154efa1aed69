//! Byte-stream `LineSink`.

use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    net::tcp::OwnedWriteHalf,
    sync::Mutex,
};

use crate::{
    domain::{LineSink, SinkError},
    protocol::frame_line,
};

/// Line sink over the write half of a raw TCP connection
pub type TcpLineSink = StreamLineSink<OwnedWriteHalf>;

/// Writes `\n`-terminated lines to any async byte stream.
///
/// The writer sits behind a lock: the session's error path and the actor's
/// response path may write concurrently, and lines must not interleave.
pub struct StreamLineSink<W> {
    writer: Mutex<W>,
}

impl<W> StreamLineSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

#[async_trait]
impl<W> LineSink for StreamLineSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_line(&self, line: &str) -> Result<(), SinkError> {
        let framed = frame_line(line);
        let mut writer = self.writer.lock().await;
        writer.write_all(framed.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}
