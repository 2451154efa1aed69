//! Shared application state of the HTTP / WebSocket bridge.

use std::sync::Arc;

use crate::actor::ServerHandle;

use super::tcp::TcpBridge;

/// Shared application state
pub struct AppState {
    /// Handle to the server actor
    pub handle: ServerHandle,
    /// Runtime control of the raw TCP listener (`serverTcpOn` / `serverTcpOff`)
    pub tcp_bridge: Arc<TcpBridge>,
}
