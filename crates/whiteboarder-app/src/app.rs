//! Terminal driver for one board session.

use crate::commands::{Command, CommandHelp, parse_command};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use whiteboarder_core::{
    Board, ChannelEvent, ClientConfig, ConfigError, Effect, HttpStorage, Identity, NativeWebSocket,
    Session, SessionEvent, Storage, SyncChannel,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Owns the session, the relay channel and the board service client.
pub struct App {
    config: ClientConfig,
    storage: Arc<HttpStorage>,
    session: Session,
    channel: SyncChannel<NativeWebSocket>,
    saves: JoinSet<()>,
}

impl App {
    /// Load or create the board at `path` and connect to its channel.
    ///
    /// If the board service cannot be reached the app starts on an unsaved
    /// local board without a channel.
    pub async fn start(config: ClientConfig, path: &str) -> Result<Self, AppError> {
        let relay_url = config.relay_url()?;
        let storage = Arc::new(HttpStorage::new(config.server_url.clone()));
        let identity = Identity::generate();
        log::info!("Editing as {}", identity);

        let session = match Session::open(storage.as_ref(), identity.clone(), path).await {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Board service unavailable, drawing locally: {}", e);
                Session::new(identity.clone(), Board::new())
            }
        }
        .with_cursor_throttle(config.cursor_throttle);

        let mut channel = SyncChannel::new(NativeWebSocket::new());
        if let Some(board_id) = session.board_id() {
            if let Err(e) = channel.connect(&relay_url, board_id, &identity) {
                log::warn!("Relay unavailable, drawing locally: {}", e);
            }
        }

        Ok(Self {
            config,
            storage,
            session,
            channel,
            saves: JoinSet::new(),
        })
    }

    /// Run until `quit` or end of input. Returns the final board.
    pub async fn run(mut self) -> Result<Board, AppError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        self.apply_effects();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match parse_command(&line, Instant::now()) {
                        Ok(Command::Event(event)) => self.session.handle(event),
                        Ok(Command::Show) => self.render(),
                        Ok(Command::Help) => CommandHelp::print_all(),
                        Ok(Command::Quit) => break,
                        Err(e) => println!("{}", e),
                    }
                }
                _ = ticker.tick() => {
                    self.poll_channel();
                    self.session.handle(SessionEvent::Tick(Instant::now()));
                    while self.saves.try_join_next().is_some() {}
                }
            }
            self.apply_effects();
        }

        self.channel.disconnect();
        while self.saves.join_next().await.is_some() {}
        Ok(self.session.close())
    }

    fn poll_channel(&mut self) {
        for event in self.channel.poll() {
            match &event {
                ChannelEvent::Joined { channel } => log::info!("Joined {}", channel),
                ChannelEvent::Error { message } => {
                    log::warn!("Relay error, drawing locally: {}", message)
                }
                ChannelEvent::Closed | ChannelEvent::Message(_) => {}
            }
            self.session.handle(event.into());
        }
    }

    fn apply_effects(&mut self) {
        for effect in self.session.take_effects() {
            match effect {
                Effect::Redraw => self.render(),
                Effect::DrawDraft(stroke) => {
                    log::trace!("Draft stroke with {} points", stroke.len());
                }
                Effect::Persist { id, board } => self.persist(id, board),
                Effect::Broadcast(message) => {
                    if let Err(e) = self.channel.send(&message) {
                        log::debug!("Dropping {} broadcast: {}", message.kind(), e);
                    }
                }
                Effect::PeerJoined(cursor) => {
                    println!("+ {} at ({}, {})", cursor.username, cursor.x, cursor.y);
                }
                Effect::PeerMoved(cursor) => {
                    log::debug!("{} at ({}, {})", cursor.username, cursor.x, cursor.y);
                }
                Effect::PeerLeft(username) => println!("- {} left", username),
                Effect::RewriteLocation(path) => {
                    println!(
                        "Board address: {}{}",
                        self.config.server_url.trim_end_matches('/'),
                        path
                    );
                }
            }
        }
    }

    /// Save in the background; the result is only logged.
    fn persist(&mut self, id: String, board: Board) {
        let storage = Arc::clone(&self.storage);
        self.saves.spawn(async move {
            match storage.save(&id, &board).await {
                Ok(()) => log::debug!("Saved board {} ({} strokes)", id, board.len()),
                Err(e) => log::warn!("Failed to save board {}: {}", id, e),
            }
        });
    }

    fn render(&self) {
        let board = self.session.board();
        match board.bounds() {
            Some(bounds) => println!(
                "[{}] {} strokes, {}x{} at ({}, {})",
                board.id.as_deref().unwrap_or("local"),
                board.len(),
                bounds.width(),
                bounds.height(),
                bounds.min.x,
                bounds.min.y
            ),
            None => println!("[{}] empty", board.id.as_deref().unwrap_or("local")),
        }
    }
}
