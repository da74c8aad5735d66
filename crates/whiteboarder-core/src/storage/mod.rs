//! Board persistence through the board-CRUD service.

mod http;
mod memory;

pub use http::HttpStorage;
pub use memory::MemoryStorage;

use crate::board::Board;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("Unexpected status: {0}")]
    Status(u16),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by storage backends.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for board storage backends.
///
/// `save` replaces the whole board; calling it twice with the same value is
/// harmless.
pub trait Storage: Send + Sync {
    /// Create a new empty board and return it with its assigned id.
    fn create(&self) -> BoxFuture<'_, StorageResult<Board>>;

    /// Load a board.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Board>>;

    /// Replace a board.
    fn save(&self, id: &str, board: &Board) -> BoxFuture<'_, StorageResult<()>>;
}

#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}
