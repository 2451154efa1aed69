//! LineSink trait 定義
//!
//! 1 つの接続に対してレスポンス行を書き込むためのインターフェース。
//! ドメイン層は書き込み先が TCP か WebSocket かを知りません。

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while writing to a connection
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying transport failed
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The connection's writer has gone away
    #[error("connection closed")]
    Closed,
}

/// Write half of one client connection.
///
/// Implementations must serialize concurrent `send_line` calls so that two
/// lines never interleave on the wire.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LineSink: Send + Sync {
    /// Write one line. The implementation adds the transport's line framing.
    async fn send_line(&self, line: &str) -> Result<(), SinkError>;
}
