//! Whiteboarder Application
//!
//! Terminal shell that drives a board session: line commands in, channel
//! polling on a timer, effects carried out against the server and relay.

mod app;
mod commands;

pub use app::{App, AppError};
pub use commands::{Command, CommandHelp, ParseError, parse_command};
