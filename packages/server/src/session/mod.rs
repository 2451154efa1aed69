//! Client session: one live connection, its write path and its read loop.

mod client;
#[allow(clippy::module_inception)]
mod session;

pub use client::Client;
pub use session::{DEFAULT_MAX_LINE_LENGTH, ReadError, Session};

#[cfg(test)]
pub(crate) use client::RecordingSink;
