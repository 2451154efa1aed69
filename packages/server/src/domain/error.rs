//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// A required textual value was empty
    #[error("empty {0}")]
    Empty(&'static str),
}

/// Registry lookup and mutation errors
///
/// The `Display` text is what the originating client receives after `ERROR `.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The sender is not (or no longer) registered as online
    #[error("unknown client: {0}")]
    UnknownClient(String),

    /// The target channel does not exist
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// A channel with this name already exists
    #[error("channel already exists: {0}")]
    ChannelExists(String),
}
