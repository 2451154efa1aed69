//! WebSocket を使った LineSink 実装
//!
//! WebSocket の生成と送信タスクは UI 層（`ui/handler/websocket.rs`）が持ちます。
//! この実装は送信タスクにつながる `UnboundedSender` だけを保持します。
//! 1 行は 1 つのテキストフレームになり、改行は付けません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{LineSink, SinkError};

pub struct WebSocketLineSink {
    sender: mpsc::UnboundedSender<String>,
}

impl WebSocketLineSink {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl LineSink for WebSocketLineSink {
    async fn send_line(&self, line: &str) -> Result<(), SinkError> {
        self.sender
            .send(line.to_string())
            .map_err(|_| SinkError::Closed)
    }
}
