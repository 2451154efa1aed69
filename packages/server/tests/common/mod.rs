#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, sync::Mutex, time::Duration};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};

use dengon_server::{
    actor::{ServerActor, ServerHandle},
    config::{Network, TcpListenerConfig},
    domain::{ClientAddr, LineSink, SinkError},
    session::{Client, Session},
    ui::TcpBridge,
};
use dengon_shared::time::FixedClock;

/// 2024-01-01T00:00:00Z
pub const FIXED_TIME: i64 = 1704067200000;
pub const FIXED_WIRE_TIME: &str = "2024-01-01:00:00:00";

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Keeps every line written to the client
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl LineSink for RecordingSink {
    async fn send_line(&self, line: &str) -> Result<(), SinkError> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

pub fn spawn_actor() -> ServerHandle {
    let (handle, _task) = ServerActor::spawn(Arc::new(FixedClock::new(FIXED_TIME)));
    handle
}

/// A registered in-process client driven line by line
pub struct TestClient {
    pub session: Session,
    pub sink: Arc<RecordingSink>,
    handle: ServerHandle,
}

impl TestClient {
    pub async fn connect(handle: &ServerHandle, addr: &str) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let client = Client::new(ClientAddr::new(addr).unwrap(), sink.clone());
        assert!(handle.online(&client).await.unwrap());
        Self {
            session: Session::new(client, handle.clone()),
            sink,
            handle: handle.clone(),
        }
    }

    /// Send one line and wait until the actor has finished executing it.
    pub async fn send(&self, line: &str) {
        self.session.handle_line(line).await.unwrap();
        self.handle.snapshot().await.unwrap();
    }

    pub fn lines(&self) -> Vec<String> {
        self.sink.lines()
    }

    pub async fn disconnect(&self) {
        self.session.close().await;
    }
}

/// Start a TCP listener on an ephemeral loopback port.
pub async fn start_tcp(handle: &ServerHandle) -> (Arc<TcpBridge>, SocketAddr) {
    let bridge = Arc::new(TcpBridge::new(
        TcpListenerConfig::new("127.0.0.1:0", Network::Tcp4),
        handle.clone(),
    ));
    bridge.start().await.unwrap();
    let addr = bridge.local_addr().await.unwrap();
    (bridge, addr)
}

/// Raw TCP connection speaking the line protocol
pub struct LineConn {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl LineConn {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.writer.local_addr().unwrap()
    }

    pub async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
    }

    pub async fn recv(&mut self) -> String {
        tokio::time::timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
            .expect("connection closed")
    }

    /// Close the write side and return whatever the server still sends.
    pub async fn finish(mut self) -> Vec<String> {
        self.writer.shutdown().await.unwrap();
        let mut rest = Vec::new();
        while let Some(line) = tokio::time::timeout(RECV_TIMEOUT, self.lines.next_line())
            .await
            .expect("timed out waiting for close")
            .unwrap()
        {
            rest.push(line);
        }
        rest
    }
}

/// Poll the registry until `check` holds.
pub async fn wait_until<F>(handle: &ServerHandle, check: F)
where
    F: Fn(&dengon_server::domain::RegistrySnapshot) -> bool,
{
    for _ in 0..100 {
        let snapshot = handle.snapshot().await.unwrap();
        if check(&snapshot) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("registry never reached the expected state");
}
