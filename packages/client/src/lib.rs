//! Interactive line client for the Dengon relay server.

pub mod error;
pub mod runner;
pub mod session;
pub mod ui;

pub use error::ClientError;
pub use runner::run_client;
pub use session::{connect, run_session};
