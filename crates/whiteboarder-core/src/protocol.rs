//! JSON text frames exchanged with the relay.
//!
//! ```json
//! { "username": "SwiftOtter7", "channel": "boards/abc" }
//! { "channel": "boards/abc", "messagetype": "cursor", "payload": { "username": "SwiftOtter7", "x": 10, "y": 20 } }
//! { "messagetype": "board", "payload": { "payload": { "id": "abc", "strokes": [] } } }
//! { "messagetype": "userleft", "payload": { "payload": "SwiftOtter7" } }
//! ```

use crate::board::Board;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frame decoding errors. The channel drops frames that fail to decode.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Relay channel name for a board.
pub fn channel_name(board_id: &str) -> String {
    format!("boards/{board_id}")
}

/// First frame on every connection; subscribes to a board channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinFrame {
    pub username: String,
    pub channel: String,
}

/// Cursor position of one editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPayload {
    pub username: String,
    pub x: f64,
    pub y: f64,
}

/// Extra `payload` wrapper the relay puts around rebroadcast values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub payload: T,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self { payload }
    }
}

/// Typed channel message, keyed by `messagetype`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messagetype", content = "payload", rename_all = "lowercase")]
pub enum Message {
    /// Peer cursor moved.
    Cursor(CursorPayload),
    /// Full board snapshot.
    Board(Envelope<Board>),
    /// Peer disconnected from the channel.
    #[serde(rename = "userleft")]
    UserLeft(Envelope<String>),
}

impl Message {
    pub fn cursor(username: impl Into<String>, x: f64, y: f64) -> Self {
        Message::Cursor(CursorPayload {
            username: username.into(),
            x,
            y,
        })
    }

    pub fn board(board: Board) -> Self {
        Message::Board(Envelope::new(board))
    }

    pub fn user_left(username: impl Into<String>) -> Self {
        Message::UserLeft(Envelope::new(username.into()))
    }

    /// Wire name of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Cursor(_) => "cursor",
            Message::Board(_) => "board",
            Message::UserLeft(_) => "userleft",
        }
    }

    /// Decode an inbound text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Outbound message scoped to a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub channel: String,
    #[serde(flatten)]
    pub message: Message,
}

impl OutboundFrame {
    pub fn new(channel: impl Into<String>, message: Message) -> Self {
        Self {
            channel: channel.into(),
            message,
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
