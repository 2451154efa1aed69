//! Dengon relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dengon-server
//! cargo run --bin dengon-server -- --endpoint :3000 --network tcp4 --listen-address 0.0.0.0:8080
//! ```

use std::sync::Arc;

use clap::Parser;
use dengon_server::{
    actor::ServerActor,
    config::{Config, TcpListenerConfig},
    ui::{AppState, Server, TcpBridge},
};
use dengon_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = Config::parse();
    setup_logger(env!("CARGO_BIN_NAME"), config.log_level());

    let (handle, actor_task) = ServerActor::spawn(Arc::new(SystemClock));
    let tcp_bridge = Arc::new(TcpBridge::new(
        TcpListenerConfig::from(&config),
        handle.clone(),
    ));

    if config.tcp_on_start
        && let Err(e) = tcp_bridge.start().await
    {
        tracing::error!("Failed to start TCP listener: {}", e);
        std::process::exit(1);
    }

    let state = Arc::new(AppState {
        handle,
        tcp_bridge: tcp_bridge.clone(),
    });
    let server = Server::new(state, config.static_dir.clone());
    if let Err(e) = server.run(config.listen_address).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tcp_bridge.stop().await;
    actor_task.abort();
}
