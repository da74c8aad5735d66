//! WebSocket channel to the relay.
//!
//! A `Transport` moves raw text frames; `SyncChannel` layers the board
//! protocol on top: one join frame per connection, typed sends, and parsing
//! of inbound frames with malformed ones dropped.

use crate::identity::Identity;
use crate::protocol::{JoinFrame, Message, OutboundFrame, ProtocolError, channel_name};
use thiserror::Error;

/// Channel errors. Callers log these and keep working locally.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not connected")]
    NotConnected,
    #[error("already connected")]
    AlreadyConnected,
    #[error("invalid relay URL: {0}")]
    InvalidUrl(String),
    #[error("send failed: {0}")]
    Send(String),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Result type for channel operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Events from a transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Socket opened
    Connected,
    /// Text frame received
    Text(String),
    /// Socket closed
    Disconnected,
    /// Error occurred
    Error { message: String },
}

/// Raw text-frame connection to a relay endpoint.
pub trait Transport {
    /// Start connecting. Completion is reported through `poll_events`.
    fn connect(&mut self, url: &str) -> SyncResult<()>;

    /// Close the connection.
    fn disconnect(&mut self);

    /// Queue a text frame.
    fn send(&self, text: &str) -> SyncResult<()>;

    /// Drain pending events (non-blocking).
    fn poll_events(&mut self) -> Vec<TransportEvent>;

    /// Current connection state.
    fn state(&self) -> ConnectionState;

    fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }
}

// ============================================================================
// Native WebSocket Client
// ============================================================================

mod native_client {
    use super::*;
    use std::net::TcpStream;
    use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
    use std::thread::{self, JoinHandle};
    use std::time::Duration;
    use tungstenite::stream::MaybeTlsStream;
    use tungstenite::{Message as WsMessage, connect};
    use url::Url;

    /// Commands sent to the WebSocket thread.
    enum WsCommand {
        Send(String),
        Close,
    }

    /// WebSocket client for native platforms.
    ///
    /// Uses a background thread for non-blocking operation.
    pub struct NativeWebSocket {
        state: ConnectionState,
        events: Vec<TransportEvent>,
        /// Channel to send commands to the WebSocket thread.
        cmd_tx: Option<Sender<WsCommand>>,
        /// Channel to receive events from the WebSocket thread.
        event_rx: Option<Receiver<TransportEvent>>,
        _thread: Option<JoinHandle<()>>,
    }

    impl NativeWebSocket {
        /// Create a new disconnected WebSocket client.
        pub fn new() -> Self {
            Self {
                state: ConnectionState::Disconnected,
                events: Vec::new(),
                cmd_tx: None,
                event_rx: None,
                _thread: None,
            }
        }
    }

    impl Transport for NativeWebSocket {
        fn connect(&mut self, url: &str) -> SyncResult<()> {
            if self.cmd_tx.is_some() {
                return Err(SyncError::AlreadyConnected);
            }

            let parsed_url = Url::parse(url).map_err(|e| SyncError::InvalidUrl(e.to_string()))?;
            if parsed_url.scheme() != "ws" && parsed_url.scheme() != "wss" {
                return Err(SyncError::InvalidUrl(format!(
                    "unsupported scheme: {}",
                    parsed_url.scheme()
                )));
            }

            self.state = ConnectionState::Connecting;

            let (cmd_tx, cmd_rx) = channel::<WsCommand>();
            let (event_tx, event_rx) = channel::<TransportEvent>();

            let url = url.to_string();

            let handle = thread::spawn(move || {
                log::info!("WebSocket thread: connecting to {}", url);

                match connect(url.as_str()) {
                    Ok((mut socket, response)) => {
                        log::info!("WebSocket connected, status: {}", response.status());
                        let _ = event_tx.send(TransportEvent::Connected);

                        set_timeouts(socket.get_mut());

                        loop {
                            let mut closing = false;
                            loop {
                                match cmd_rx.try_recv() {
                                    Ok(WsCommand::Send(msg)) => {
                                        log::debug!("WebSocket sending: {}", preview(&msg));
                                        if let Err(e) = socket.send(WsMessage::Text(msg)) {
                                            log::error!("WebSocket send error: {}", e);
                                            closing = true;
                                            break;
                                        }
                                    }
                                    Ok(WsCommand::Close) => {
                                        log::info!("WebSocket close requested");
                                        let _ = socket.close(None);
                                        closing = true;
                                        break;
                                    }
                                    Err(TryRecvError::Disconnected) => {
                                        log::info!("WebSocket command channel disconnected");
                                        closing = true;
                                        break;
                                    }
                                    Err(TryRecvError::Empty) => break,
                                }
                            }
                            if closing {
                                break;
                            }

                            match socket.read() {
                                Ok(WsMessage::Text(txt)) => {
                                    log::debug!("WebSocket received: {}", preview(&txt));
                                    let _ = event_tx.send(TransportEvent::Text(txt));
                                }
                                Ok(WsMessage::Ping(data)) => {
                                    let _ = socket.send(WsMessage::Pong(data));
                                }
                                Ok(WsMessage::Close(_)) => {
                                    log::info!("WebSocket received close frame");
                                    break;
                                }
                                Ok(_) => {} // Ignore binary, pong
                                Err(tungstenite::Error::Io(ref e))
                                    if e.kind() == std::io::ErrorKind::WouldBlock
                                        || e.kind() == std::io::ErrorKind::TimedOut =>
                                {
                                    continue;
                                }
                                Err(e) => {
                                    log::error!("WebSocket read error: {}", e);
                                    break;
                                }
                            }
                        }

                        log::info!("WebSocket thread exiting");
                        let _ = event_tx.send(TransportEvent::Disconnected);
                    }
                    Err(e) => {
                        log::error!("WebSocket connection failed: {}", e);
                        let _ = event_tx.send(TransportEvent::Error {
                            message: format!("Connection failed: {}", e),
                        });
                    }
                }
            });

            self.cmd_tx = Some(cmd_tx);
            self.event_rx = Some(event_rx);
            self._thread = Some(handle);

            Ok(())
        }

        fn disconnect(&mut self) {
            if let Some(tx) = self.cmd_tx.take() {
                let _ = tx.send(WsCommand::Close);
            }
            self.event_rx = None;
            self._thread = None;
            self.state = ConnectionState::Disconnected;
        }

        fn send(&self, text: &str) -> SyncResult<()> {
            if let Some(ref tx) = self.cmd_tx {
                tx.send(WsCommand::Send(text.to_string()))
                    .map_err(|e| SyncError::Send(e.to_string()))
            } else {
                Err(SyncError::NotConnected)
            }
        }

        fn poll_events(&mut self) -> Vec<TransportEvent> {
            if let Some(ref rx) = self.event_rx {
                while let Ok(event) = rx.try_recv() {
                    match &event {
                        TransportEvent::Connected => self.state = ConnectionState::Connected,
                        TransportEvent::Disconnected => self.state = ConnectionState::Disconnected,
                        TransportEvent::Error { .. } => self.state = ConnectionState::Error,
                        TransportEvent::Text(_) => {}
                    }
                    self.events.push(event);
                }
            }

            std::mem::take(&mut self.events)
        }

        fn state(&self) -> ConnectionState {
            self.state
        }
    }

    /// Short read timeout on the underlying TCP stream so queued sends are not
    /// starved behind a blocking read.
    fn set_timeouts(stream: &mut MaybeTlsStream<TcpStream>) {
        let tcp = match stream {
            MaybeTlsStream::Plain(tcp) => tcp,
            MaybeTlsStream::Rustls(tls) => &mut tls.sock,
            _ => return,
        };
        let _ = tcp.set_read_timeout(Some(Duration::from_millis(20)));
        let _ = tcp.set_write_timeout(Some(Duration::from_secs(5)));
    }

    /// First 100 characters of a frame, for logging.
    fn preview(text: &str) -> &str {
        match text.char_indices().nth(100) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }

    impl Default for NativeWebSocket {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for NativeWebSocket {
        fn drop(&mut self) {
            self.disconnect();
        }
    }
}

pub use native_client::NativeWebSocket;

// ============================================================================
// Board channel
// ============================================================================

/// Items surfaced by `SyncChannel::poll`, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Socket open and join frame sent.
    Joined { channel: String },
    /// Well-formed inbound frame.
    Message(Message),
    /// Socket closed; the session continues locally.
    Closed,
    /// Transport reported an error.
    Error { message: String },
}

/// One board's relay channel on top of a transport.
pub struct SyncChannel<T: Transport> {
    transport: T,
    channel: Option<String>,
    identity: Option<Identity>,
    joined: bool,
}

impl<T: Transport> SyncChannel<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            channel: None,
            identity: None,
            joined: false,
        }
    }

    /// Open the transport to `url` for board `board_id`.
    /// The join frame goes out once the transport reports it is open.
    pub fn connect(&mut self, url: &str, board_id: &str, identity: &Identity) -> SyncResult<()> {
        self.transport.connect(url)?;
        self.channel = Some(channel_name(board_id));
        self.identity = Some(identity.clone());
        self.joined = false;
        Ok(())
    }

    /// Channel name, once connected.
    pub fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    /// Check if the join frame has been sent on the current connection.
    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn state(&self) -> ConnectionState {
        self.transport.state()
    }

    /// Send a message on the board channel. Best effort, no acknowledgement.
    pub fn send(&self, message: &Message) -> SyncResult<()> {
        let channel = match (&self.channel, self.joined) {
            (Some(channel), true) => channel,
            _ => return Err(SyncError::NotConnected),
        };
        let text = OutboundFrame::new(channel.clone(), message.clone()).encode()?;
        self.transport.send(&text)
    }

    /// Drain the transport. Messages and connection transitions come back
    /// interleaved in the order the transport reported them.
    pub fn poll(&mut self) -> Vec<ChannelEvent> {
        let mut events = Vec::new();
        for event in self.transport.poll_events() {
            match event {
                TransportEvent::Connected => {
                    if let Some(channel) = self.send_join() {
                        events.push(ChannelEvent::Joined { channel });
                    }
                }
                TransportEvent::Text(text) => match Message::decode(&text) {
                    Ok(message) => events.push(ChannelEvent::Message(message)),
                    Err(e) => log::debug!("Dropping inbound frame: {}", e),
                },
                TransportEvent::Disconnected => {
                    self.joined = false;
                    events.push(ChannelEvent::Closed);
                }
                TransportEvent::Error { message } => {
                    self.joined = false;
                    events.push(ChannelEvent::Error { message });
                }
            }
        }
        events
    }

    fn send_join(&mut self) -> Option<String> {
        if self.joined {
            return None;
        }
        let (channel, identity) = (self.channel.clone()?, self.identity.as_ref()?);
        let join = JoinFrame {
            username: identity.as_str().to_string(),
            channel: channel.clone(),
        };
        let text = match serde_json::to_string(&join) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Failed to encode join frame: {}", e);
                return None;
            }
        };
        if let Err(e) = self.transport.send(&text) {
            log::warn!("Failed to send join frame: {}", e);
            return None;
        }
        log::info!("Joined channel {} as {}", channel, identity);
        self.joined = true;
        Some(channel)
    }

    /// Close the connection and forget the channel.
    pub fn disconnect(&mut self) {
        self.transport.disconnect();
        self.joined = false;
        self.channel = None;
    }
}
