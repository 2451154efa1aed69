//! Transports: the raw TCP listener and the HTTP / WebSocket bridge.

mod handler;
mod server;
mod signal;
pub mod state;
mod tcp;

pub use handler::{TCP_OFF_COMMAND, TCP_ON_COMMAND};
pub use server::{Server, ServerError, router};
pub use signal::shutdown_signal;
pub use state::AppState;
pub use tcp::{BridgeError, BridgeStatus, TcpBridge};
