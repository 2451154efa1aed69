mod http;
mod websocket;

pub use http::{debug_registry, health_check};
pub use websocket::{TCP_OFF_COMMAND, TCP_ON_COMMAND, websocket_handler};
