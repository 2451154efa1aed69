//! `LineSink` の具体的な実装
//!
//! - `stream`: バイトストリーム（TCP）向け。行末に改行を付ける
//! - `websocket`: WebSocket 向け。1 行 = 1 テキストフレーム

pub mod stream;
pub mod websocket;

pub use stream::{StreamLineSink, TcpLineSink};
pub use websocket::WebSocketLineSink;
