//! Client execution logic.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    error::ClientError,
    session::{connect, run_session},
    ui::{PROMPT, print_line},
};

/// Connect to `address` and relay stdin lines until EOF or Ctrl+C.
pub async fn run_client(address: &str) -> Result<(), ClientError> {
    let stream = connect(address).await?;
    println!(
        "\nConnected to {}. Type commands and press Enter to send. Press Ctrl+C to exit.\n",
        address
    );

    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    // rustyline is synchronous, so it gets its own thread
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    run_session(stream, input_rx, print_line).await?;
    tracing::info!("Client session ended normally");
    Ok(())
}
