//! Dengon relay server: named channels, membership and message logs kept in
//! memory and driven by a line protocol over raw TCP or WebSocket.

pub mod actor;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod protocol;
pub mod session;
pub mod ui;
