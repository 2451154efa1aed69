//! One TCP session: user lines out, server lines in.

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
    sync::mpsc,
};

use crate::error::ClientError;

/// Connect to the relay server's raw TCP endpoint.
pub async fn connect(address: &str) -> Result<TcpStream, ClientError> {
    let stream = TcpStream::connect(address)
        .await
        .map_err(|e| ClientError::ConnectionError(format!("{}: {}", address, e)))?;
    tracing::info!("Connected to {}", address);
    Ok(stream)
}

/// Write every line received from `input_rx` and hand every server line to
/// `on_line`.
///
/// When the input side closes, the write half is shut down and the remaining
/// server lines are drained until the server closes the connection. A server
/// close while input is still open is a `ConnectionError`.
pub async fn run_session<S, F>(
    stream: S,
    mut input_rx: mpsc::UnboundedReceiver<String>,
    mut on_line: F,
) -> Result<(), ClientError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    F: FnMut(&str),
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            input = input_rx.recv(), if input_open => match input {
                Some(line) => {
                    writer.write_all(format!("{}\n", line).as_bytes()).await?;
                    writer.flush().await?;
                }
                None => {
                    input_open = false;
                    writer.shutdown().await?;
                }
            },
            line = lines.next_line() => match line? {
                Some(line) => on_line(&line),
                None if input_open => {
                    return Err(ClientError::ConnectionError(
                        "Connection closed by server".to_string(),
                    ));
                }
                None => return Ok(()),
            },
        }
    }
}
