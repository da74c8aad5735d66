//! Local undo/redo over committed strokes.
//!
//! The board's own stroke list is the undo source; `undone` holds strokes
//! that were taken off the top and can be put back. A stroke lives in exactly
//! one of the two places. Committing a new stroke does not discard `undone`,
//! so a later redo can bring back an older stroke on top of newer work.

use crate::board::{Board, Stroke};

/// Two-stack edit history for one board.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    undone: Vec<Stroke>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the topmost stroke of `board` onto the redo stack.
    /// Returns true if undo was performed, false if the board is empty.
    pub fn undo(&mut self, board: &mut Board) -> bool {
        if let Some(stroke) = board.pop() {
            self.undone.push(stroke);
            true
        } else {
            false
        }
    }

    /// Put the most recently undone stroke back on top of `board`.
    /// Returns true if redo was performed, false if nothing was undone.
    pub fn redo(&mut self, board: &mut Board) -> bool {
        if let Some(stroke) = self.undone.pop() {
            board.push(stroke);
            true
        } else {
            false
        }
    }

    /// Check if undo is available for `board`.
    pub fn can_undo(&self, board: &Board) -> bool {
        !board.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Strokes waiting to be redone, oldest first.
    pub fn undone(&self) -> &[Stroke] {
        &self.undone
    }

    pub fn len(&self) -> usize {
        self.undone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undone.is_empty()
    }
}
