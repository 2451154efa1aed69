//! Request parsing.

use thiserror::Error;

use crate::domain::{ChannelName, FilePayload, MessageContent, ValueObjectError};

/// Separator between the arguments of one command
const ARG_DELIMITER: &str = ";;";

/// Errors for lines that name a known command but carry bad arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The argument at `position` is missing or zero-length
    #[error("empty arg")]
    EmptyArgument { position: usize },

    #[error("invalid arg: {0}")]
    InvalidArgument(#[from] ValueObjectError),
}

/// Kind tag of a command handled by the server actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Online announcement; has no wire keyword
    Register,
    Join,
    Leave,
    Send,
    Create,
    ListChannels,
    ListMessages,
    ListUsers,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Register => "REGISTER",
            CommandKind::Join => "JOIN",
            CommandKind::Leave => "LEAVE",
            CommandKind::Send => "SEND",
            CommandKind::Create => "CREATE",
            CommandKind::ListChannels => "LIST_CHANNELS",
            CommandKind::ListMessages => "LIST_MESSAGES",
            CommandKind::ListUsers => "LIST_USERS",
        }
    }
}

/// A validated client request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Join {
        channel: ChannelName,
    },
    Leave {
        channel: ChannelName,
    },
    Create {
        channel: ChannelName,
    },
    Send {
        channel: ChannelName,
        content: MessageContent,
        file: FilePayload,
    },
    ListChannels,
    ListMessages {
        channel: ChannelName,
    },
    ListUsers {
        channel: ChannelName,
    },
}

impl Request {
    pub fn kind(&self) -> CommandKind {
        match self {
            Request::Join { .. } => CommandKind::Join,
            Request::Leave { .. } => CommandKind::Leave,
            Request::Create { .. } => CommandKind::Create,
            Request::Send { .. } => CommandKind::Send,
            Request::ListChannels => CommandKind::ListChannels,
            Request::ListMessages { .. } => CommandKind::ListMessages,
            Request::ListUsers { .. } => CommandKind::ListUsers,
        }
    }

    /// Target channel, if the command has one
    pub fn channel(&self) -> Option<&ChannelName> {
        match self {
            Request::Join { channel }
            | Request::Leave { channel }
            | Request::Create { channel }
            | Request::Send { channel, .. }
            | Request::ListMessages { channel }
            | Request::ListUsers { channel } => Some(channel),
            Request::ListChannels => None,
        }
    }
}

/// Outcome of parsing one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// Empty or unknown keyword; answered with `FALSE`
    Unrecognized,
    Request(Request),
}

/// Parse one protocol line.
///
/// The keyword is everything before the first whitespace run, trimmed and
/// uppercased; the rest of the line, trimmed, is the argument blob.
pub fn parse_line(line: &str) -> Result<ParsedLine, ProtocolError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (keyword, blob) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let keyword = keyword.trim().to_uppercase();
    let blob = blob.trim();

    let request = match keyword.as_str() {
        "JOIN" => Request::Join {
            channel: channel_arg(blob)?,
        },
        "LEAVE" => Request::Leave {
            channel: channel_arg(blob)?,
        },
        "CREATE" => Request::Create {
            channel: channel_arg(blob)?,
        },
        "MSG" => Request::Send {
            channel: channel_arg(blob)?,
            content: MessageContent::new(arg(blob, 1)?)?,
            file: FilePayload::new(arg(blob, 2)?)?,
        },
        "LIST_CHN" => Request::ListChannels,
        "LIST_MSG" => Request::ListMessages {
            channel: channel_arg(blob)?,
        },
        "LIST_USR" => Request::ListUsers {
            channel: channel_arg(blob)?,
        },
        _ => return Ok(ParsedLine::Unrecognized),
    };

    Ok(ParsedLine::Request(request))
}

fn channel_arg(blob: &str) -> Result<ChannelName, ProtocolError> {
    Ok(ChannelName::new(arg(blob, 0)?)?)
}

/// Argument at `position`; a missing field counts as empty.
fn arg(blob: &str, position: usize) -> Result<&str, ProtocolError> {
    blob.split(ARG_DELIMITER)
        .nth(position)
        .filter(|value| !value.is_empty())
        .ok_or(ProtocolError::EmptyArgument { position })
}
