//! WebSocket bridge: one text frame is one protocol line.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    domain::ClientAddr,
    infrastructure::WebSocketLineSink,
    session::{Client, Session},
    ui::state::AppState,
};

/// Control frame that starts the raw TCP listener
pub const TCP_ON_COMMAND: &str = "serverTcpOn";
/// Control frame that stops the raw TCP listener
pub const TCP_OFF_COMMAND: &str = "serverTcpOff";

#[derive(Debug, Error)]
#[error("only text frames are supported")]
struct BinaryFrameError;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, peer))
}

/// Forwards queued lines to the WebSocket sender until either side closes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if sender.send(Message::Text(line.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, peer: SocketAddr) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let client = Client::new(ClientAddr::from(peer), Arc::new(WebSocketLineSink::new(tx)));
    match state.handle.online(&client).await {
        Ok(true) => tracing::info!("WebSocket client '{}' connected", peer),
        Ok(false) => tracing::warn!("WebSocket client '{}' is already registered", peer),
        Err(e) => {
            tracing::error!("Cannot register WebSocket client '{}': {}", peer, e);
            return;
        }
    }

    let session = Session::new(client, state.handle.clone());
    let recv_session = session.clone();
    let tcp_bridge = state.tcp_bridge.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", peer, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let text = text.as_str();
                    let client = recv_session.client();
                    match text.trim() {
                        TCP_ON_COMMAND => match tcp_bridge.start().await {
                            Ok(status) => client.write_response(&status.to_string()).await,
                            Err(e) => {
                                tracing::error!("Failed to start TCP listener: {}", e);
                                client.write_error(&e).await;
                            }
                        },
                        TCP_OFF_COMMAND => {
                            let status = tcp_bridge.stop().await;
                            client.write_response(&status.to_string()).await;
                        }
                        _ => {
                            if let Err(e) = recv_session.handle_line(text).await {
                                tracing::error!("Dropping WebSocket session of '{}': {}", peer, e);
                                break;
                            }
                        }
                    }
                }
                Message::Binary(_) => {
                    recv_session.client().write_error(&BinaryFrameError).await;
                }
                Message::Close(_) => {
                    tracing::info!("WebSocket client '{}' requested close", peer);
                    break;
                }
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    session.close().await;
    tracing::info!("WebSocket client '{}' disconnected", peer);
}
