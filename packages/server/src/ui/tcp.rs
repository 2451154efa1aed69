//! Raw TCP transport: accepts connections and hands each one to a session.
//!
//! The listener can be started and stopped at runtime. Stopping it closes the
//! listening socket only; sessions already accepted keep running.

use std::{fmt, net::SocketAddr, sync::Arc};

use thiserror::Error;
use tokio::{
    io::BufReader,
    net::{TcpListener, TcpStream},
    sync::{Mutex, oneshot},
    task::JoinHandle,
};

use crate::{
    actor::ServerHandle,
    config::{ConfigError, Network, TcpListenerConfig},
    domain::ClientAddr,
    infrastructure::TcpLineSink,
    session::{Client, Session},
};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// Outcome of a start / stop request, reported back as a status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeStatus {
    Started {
        network: Network,
        local_addr: SocketAddr,
    },
    AlreadyRunning,
    Stopped,
    NotRunning,
}

impl fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeStatus::Started {
                network,
                local_addr,
            } => write!(f, "Server started ({network}) {local_addr}"),
            BridgeStatus::AlreadyRunning => f.write_str("Server is on"),
            BridgeStatus::Stopped => f.write_str("Server off"),
            BridgeStatus::NotRunning => f.write_str("Server is off"),
        }
    }
}

struct RunningListener {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Start/stop control over the raw TCP listener
pub struct TcpBridge {
    config: TcpListenerConfig,
    handle: ServerHandle,
    running: Mutex<Option<RunningListener>>,
}

impl TcpBridge {
    pub fn new(config: TcpListenerConfig, handle: ServerHandle) -> Self {
        Self {
            config,
            handle,
            running: Mutex::new(None),
        }
    }

    /// Bind the listener and start accepting. A running listener is left as is.
    pub async fn start(&self) -> Result<BridgeStatus, BridgeError> {
        let mut running = self.running.lock().await;
        if running
            .as_ref()
            .is_some_and(|listener| !listener.task.is_finished())
        {
            return Ok(BridgeStatus::AlreadyRunning);
        }

        let addr = self.config.resolve().await?;
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(accept_loop(listener, self.handle.clone(), shutdown_rx));

        *running = Some(RunningListener {
            local_addr,
            shutdown,
            task,
        });

        let status = BridgeStatus::Started {
            network: self.config.network,
            local_addr,
        };
        tracing::info!("{}", status);
        Ok(status)
    }

    /// Close the listening socket.
    pub async fn stop(&self) -> BridgeStatus {
        let mut running = self.running.lock().await;
        match running.take() {
            Some(listener) => {
                let _ = listener.shutdown.send(());
                if let Err(e) = listener.task.await {
                    tracing::warn!("TCP accept loop ended abnormally: {}", e);
                }
                tracing::info!("TCP listener on {} closed", listener.local_addr);
                BridgeStatus::Stopped
            }
            None => BridgeStatus::NotRunning,
        }
    }

    /// Bound address while the listener runs
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .lock()
            .await
            .as_ref()
            .map(|listener| listener.local_addr)
    }
}

async fn accept_loop(
    listener: TcpListener,
    handle: ServerHandle,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            result = listener.accept() => match result {
                Ok((stream, peer)) => accept_connection(stream, peer, &handle).await,
                Err(e) => tracing::warn!("Failed to accept connection: {}", e),
            },
        }
    }
}

/// Announce the connection online, then run its session in its own task.
async fn accept_connection(stream: TcpStream, peer: SocketAddr, handle: &ServerHandle) {
    tracing::info!("Connected to {}", peer);
    let (reader, writer) = stream.into_split();
    let client = Client::new(ClientAddr::from(peer), Arc::new(TcpLineSink::new(writer)));

    if let Err(e) = handle.online(&client).await {
        tracing::error!("Cannot register '{}': {}", peer, e);
        return;
    }

    let session = Session::new(client, handle.clone());
    tokio::spawn(session.run(BufReader::new(reader)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ServerActor;
    use dengon_shared::time::FixedClock;

    fn create_bridge() -> TcpBridge {
        let (handle, _task) = ServerActor::spawn(Arc::new(FixedClock::new(0)));
        TcpBridge::new(TcpListenerConfig::new("127.0.0.1:0", Network::Tcp4), handle)
    }

    #[tokio::test]
    async fn test_start_then_start_again() {
        // テスト項目: 起動済みのリスナーを再度起動すると "Server is on" になる
        // given (前提条件):
        let bridge = create_bridge();

        // when (操作):
        let first = bridge.start().await.unwrap();
        let second = bridge.start().await.unwrap();

        // then (期待する結果):
        let local_addr = bridge.local_addr().await.unwrap();
        assert_eq!(
            first,
            BridgeStatus::Started {
                network: Network::Tcp4,
                local_addr
            }
        );
        assert_eq!(second, BridgeStatus::AlreadyRunning);
        assert_eq!(second.to_string(), "Server is on");
    }

    #[tokio::test]
    async fn test_stop_closes_listener() {
        // テスト項目: 停止後は新しい接続を受け付けない
        // given (前提条件):
        let bridge = create_bridge();
        bridge.start().await.unwrap();
        let local_addr = bridge.local_addr().await.unwrap();

        // when (操作):
        let stopped = bridge.stop().await;
        let stopped_again = bridge.stop().await;

        // then (期待する結果):
        assert_eq!(stopped.to_string(), "Server off");
        assert_eq!(stopped_again, BridgeStatus::NotRunning);
        assert!(bridge.local_addr().await.is_none());
        assert!(TcpStream::connect(local_addr).await.is_err());
    }

    #[test]
    fn test_started_status_text() {
        // テスト項目: 起動時のステータス文字列
        // given (前提条件):
        let status = BridgeStatus::Started {
            network: Network::Tcp,
            local_addr: "127.0.0.1:3000".parse().unwrap(),
        };

        // when (操作):
        let text = status.to_string();

        // then (期待する結果):
        assert_eq!(text, "Server started (tcp) 127.0.0.1:3000");
    }
}
