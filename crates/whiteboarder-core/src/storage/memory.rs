//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::board::Board;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory storage for tests and offline sessions.
#[derive(Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, Board>>,
    next_id: AtomicU64,
    saves: AtomicU64,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }

    /// Current stored value of a board, if any.
    pub fn get(&self, id: &str) -> Option<Board> {
        self.boards.read().ok()?.get(id).cloned()
    }
}

impl Storage for MemoryStorage {
    fn create(&self) -> BoxFuture<'_, StorageResult<Board>> {
        Box::pin(async move {
            let id = format!("board-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
            let board = Board::with_id(id.clone());
            let mut boards = self
                .boards
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            boards.insert(id, board.clone());
            Ok(board)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Board>> {
        let id = id.to_string();
        Box::pin(async move {
            let boards = self
                .boards
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            boards.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn save(&self, id: &str, board: &Board) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let board = board.clone();
        Box::pin(async move {
            let mut boards = self
                .boards
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            boards.insert(id, board);
            self.saves.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
    }
}
