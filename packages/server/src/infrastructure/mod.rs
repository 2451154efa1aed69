//! Infrastructure 層
//!
//! ドメイン層の `LineSink` trait を TCP / WebSocket で実装します。

pub mod line_sink;

pub use line_sink::{StreamLineSink, TcpLineSink, WebSocketLineSink};
