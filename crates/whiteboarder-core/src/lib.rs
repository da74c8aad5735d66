//! Whiteboarder Core Library
//!
//! Client-side synchronization core for the Whiteboarder shared whiteboard:
//! strokes, undo/redo, peer cursors, the relay channel and board storage.

pub mod board;
pub mod config;
pub mod history;
pub mod identity;
pub mod location;
pub mod presence;
pub mod protocol;
pub mod session;
pub mod storage;
pub mod sync;
pub mod throttle;

pub use board::{Board, Point, Stroke, StrokeError, eraser_radius};
pub use config::{ClientConfig, ConfigError};
pub use history::EditHistory;
pub use identity::Identity;
pub use location::{board_id_from_path, board_path};
pub use presence::{CursorState, PresenceChange, PresenceTracker};
pub use protocol::{Message, OutboundFrame, ProtocolError, channel_name};
pub use session::{Brush, Effect, Session, SessionEvent, Tool};
pub use storage::{HttpStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use sync::{ChannelEvent, ConnectionState, NativeWebSocket, SyncChannel, SyncError, Transport};
pub use throttle::CursorThrottle;
