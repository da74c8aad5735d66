//! Line commands typed at the terminal.

use std::time::Instant;
use thiserror::Error;
use whiteboarder_core::{Point, SessionEvent, Tool};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Feed an event to the session.
    Event(SessionEvent),
    /// Print the board.
    Show,
    /// Print the command list.
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// A command definition for the help listing.
#[derive(Debug, Clone)]
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: &'static str,
}

impl CommandHelp {
    pub const fn new(usage: &'static str, description: &'static str) -> Self {
        Self { usage, description }
    }

    /// All commands.
    pub fn all() -> Vec<CommandHelp> {
        vec![
            CommandHelp::new("down X Y", "Press the pointer"),
            CommandHelp::new("move X Y", "Move the pointer"),
            CommandHelp::new("up", "Release the pointer"),
            CommandHelp::new("pen", "Select the pen"),
            CommandHelp::new("eraser", "Select the eraser"),
            CommandHelp::new("color C", "Set the pen color"),
            CommandHelp::new("size N", "Set the brush size"),
            CommandHelp::new("cursor X Y", "Move the shared cursor"),
            CommandHelp::new("undo", "Undo the last stroke"),
            CommandHelp::new("redo", "Redo the last undone stroke"),
            CommandHelp::new("clear", "Remove all strokes"),
            CommandHelp::new("show", "Print the board"),
            CommandHelp::new("help", "Print this list"),
            CommandHelp::new("quit", "Leave the board"),
        ]
    }

    pub fn print_all() {
        println!("\n=== Commands ===");
        for help in Self::all() {
            println!("  {:12} {}", help.usage, help.description);
        }
        println!();
    }
}

fn point(args: &[&str], usage: &'static str) -> Result<Point, ParseError> {
    match args {
        [x, y] => {
            let x = x.parse().map_err(|_| ParseError::Usage(usage))?;
            let y = y.parse().map_err(|_| ParseError::Usage(usage))?;
            Ok(Point::new(x, y))
        }
        _ => Err(ParseError::Usage(usage)),
    }
}

/// Parse one input line. `now` stamps cursor moves.
pub fn parse_command(line: &str, now: Instant) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let name = words.next().ok_or(ParseError::Empty)?;
    let args: Vec<&str> = words.collect();

    let event = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("down", args) => SessionEvent::PointerDown(point(args, "down X Y")?),
        ("move", args) => SessionEvent::PointerMove(point(args, "move X Y")?),
        ("up", []) => SessionEvent::PointerUp,
        ("pen", []) => SessionEvent::SelectTool(Tool::Pen),
        ("eraser", []) => SessionEvent::SelectTool(Tool::Eraser),
        ("color", [color]) => SessionEvent::SetColor(color.to_string()),
        ("color", _) => return Err(ParseError::Usage("color C")),
        ("size", [size]) => match size.parse::<u32>() {
            Ok(size) if size > 0 => SessionEvent::SetSize(size),
            _ => return Err(ParseError::Usage("size N (N > 0)")),
        },
        ("size", _) => return Err(ParseError::Usage("size N (N > 0)")),
        ("cursor", [x, y]) => match (x.parse::<f64>(), y.parse::<f64>()) {
            (Ok(x), Ok(y)) => SessionEvent::CursorMoved { x, y, at: now },
            _ => return Err(ParseError::Usage("cursor X Y")),
        },
        ("cursor", _) => return Err(ParseError::Usage("cursor X Y")),
        ("undo", []) => SessionEvent::Undo,
        ("redo", []) => SessionEvent::Redo,
        ("clear", []) => SessionEvent::Clear,
        ("show", []) => return Ok(Command::Show),
        ("help" | "?", []) => return Ok(Command::Help),
        ("quit" | "exit", []) => return Ok(Command::Quit),
        _ => return Err(ParseError::Unknown(line.trim().to_string())),
    };
    Ok(Command::Event(event))
}
