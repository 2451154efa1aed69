//! Value objects.
//!
//! Every textual value that enters the registry is wrapped so that emptiness is
//! rejected once, at the boundary.

use std::{fmt, net::SocketAddr};

use serde::Serialize;
use uuid::Uuid;

use dengon_shared::time::format_wire_timestamp;

use super::error::ValueObjectError;

macro_rules! non_empty_string {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(ValueObjectError::Empty($label));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = ValueObjectError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

non_empty_string!(
    /// Transport-level address of a client; the only client identity on the wire.
    ClientAddr,
    "client address"
);

non_empty_string!(
    /// Unique channel name.
    ChannelName,
    "channel name"
);

non_empty_string!(
    /// Text body of a message.
    MessageContent,
    "message content"
);

non_empty_string!(
    /// Base64 text of an attached file, relayed verbatim.
    FilePayload,
    "file payload"
);

impl From<SocketAddr> for ClientAddr {
    fn from(addr: SocketAddr) -> Self {
        // SocketAddr always renders as "host:port"
        Self(addr.to_string())
    }
}

/// Connection-scoped identifier issued when a transport accepts a connection.
///
/// Two sessions may present the same address; the session id tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Wire representation, `YYYY-MM-DD:HH:MM:SS`
    pub fn to_wire(&self) -> String {
        format_wire_timestamp(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_rejects_empty() {
        // テスト項目: 空のチャンネル名は作成できない
        // given (前提条件):
        let empty = "";

        // when (操作):
        let result = ChannelName::new(empty);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("channel name")));
    }

    #[test]
    fn test_channel_name_keeps_value_verbatim() {
        // テスト項目: チャンネル名は加工されずに保持される
        // given (前提条件):
        let raw = " Lobby ";

        // when (操作):
        let name = ChannelName::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), " Lobby ");
        assert_eq!(name.into_string(), " Lobby ".to_string());
    }

    #[test]
    fn test_client_addr_from_socket_addr() {
        // テスト項目: SocketAddr から host:port 形式のアドレスが得られる
        // given (前提条件):
        let socket: SocketAddr = "127.0.0.1:54321".parse().unwrap();

        // when (操作):
        let addr = ClientAddr::from(socket);

        // then (期待する結果):
        assert_eq!(addr.as_str(), "127.0.0.1:54321");
    }

    #[test]
    fn test_file_payload_rejects_empty() {
        // テスト項目: 空のファイルペイロードはエラーになる
        // given (前提条件):
        let empty = String::new();

        // when (操作):
        let result = FilePayload::try_from(empty);

        // then (期待する結果):
        assert!(matches!(result, Err(ValueObjectError::Empty("file payload"))));
    }

    #[test]
    fn test_session_ids_are_unique() {
        // テスト項目: セッション ID は生成ごとに異なる
        // given (前提条件):
        let first = SessionId::generate();

        // when (操作):
        let second = SessionId::generate();

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[test]
    fn test_timestamp_to_wire() {
        // テスト項目: Timestamp がワイヤ形式に変換される
        // given (前提条件):
        let timestamp = Timestamp::new(1704067200000);

        // when (操作):
        let wire = timestamp.to_wire();

        // then (期待する結果):
        assert_eq!(wire, "2024-01-01:00:00:00");
    }
}
