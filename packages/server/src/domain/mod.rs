//! ドメイン層
//!
//! クライアント・チャンネル・メッセージのモデルと、それらを保持する `Registry` を定義します。
//! I/O は一切行いません。接続への書き込みは `LineSink` trait として抽象化し、
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod line_sink;
pub mod registry;
pub mod value_object;

pub use entity::{Channel, Message};
pub use error::{RegistryError, ValueObjectError};
pub use line_sink::{LineSink, SinkError};
#[cfg(test)]
pub use line_sink::MockLineSink;
pub use registry::{ChannelSnapshot, MessageSnapshot, Registry, RegistrySnapshot};
pub use value_object::{
    ChannelName, ClientAddr, FilePayload, MessageContent, SessionId, Timestamp,
};
