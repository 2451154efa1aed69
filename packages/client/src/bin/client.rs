//! Interactive line client for the Dengon relay server.
//!
//! Reads commands from stdin and prints every line the server answers.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dengon-client -- --address 127.0.0.1:3000
//! ```

use clap::Parser;

use dengon_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "dengon-client")]
#[command(about = "Line client for the Dengon relay server", long_about = None)]
struct Args {
    /// Raw TCP endpoint of the server
    #[arg(short = 'a', long, env = "DENGON_ADDRESS", default_value = "127.0.0.1:3000")]
    address: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = dengon_client::run_client(&args.address).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
