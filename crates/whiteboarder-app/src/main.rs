//! Main application entry point.

use clap::Parser;
use std::time::Duration;
use whiteboarder_app::{App, AppError};
use whiteboarder_core::config::DEFAULT_SERVER_URL;
use whiteboarder_core::{ClientConfig, board_path};

#[derive(Parser, Debug)]
#[command(name = "whiteboarder", about = "Draw on a shared Whiteboarder board from the terminal")]
struct Cli {
    /// Board-CRUD server base URL.
    #[arg(long, env = "WHITEBOARDER_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Relay WebSocket URL (defaults to the server's /ws).
    #[arg(long, env = "WHITEBOARDER_RELAY")]
    relay: Option<String>,

    /// Board to open; a new board is created when omitted.
    #[arg(long, env = "WHITEBOARDER_BOARD")]
    board: Option<String>,

    /// Minimum milliseconds between cursor broadcasts.
    #[arg(long, default_value_t = 50)]
    cursor_throttle_ms: u64,

    /// Channel poll interval in milliseconds.
    #[arg(long, default_value_t = 20)]
    poll_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Starting Whiteboarder");

    let config = ClientConfig {
        server_url: cli.server,
        relay_url: cli.relay,
        cursor_throttle: Duration::from_millis(cli.cursor_throttle_ms),
        poll_interval: Duration::from_millis(cli.poll_ms.max(1)),
    };
    let path = cli
        .board
        .as_deref()
        .map(board_path)
        .unwrap_or_else(|| "/".to_string());

    let app = App::start(config, &path).await?;
    let board = app.run().await?;
    log::info!("Leaving board with {} strokes", board.len());
    Ok(())
}
