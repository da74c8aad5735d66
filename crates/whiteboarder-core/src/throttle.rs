//! Rate limiting for outgoing cursor broadcasts.
//!
//! At most one position is released per window. The first update after a
//! quiet period goes out immediately. Updates inside an open window collapse
//! into a single pending position (latest wins), which is released by the
//! next `poll` after the window closes. A fresh update arriving after the
//! window closed supersedes anything still pending and goes out right away.

use std::time::{Duration, Instant};

/// Default minimum spacing between two cursor broadcasts.
pub const DEFAULT_CURSOR_THROTTLE: Duration = Duration::from_millis(50);

/// Trailing-edge throttle over cursor positions.
#[derive(Debug, Clone)]
pub struct CursorThrottle {
    window: Duration,
    last_sent: Option<Instant>,
    pending: Option<(f64, f64)>,
}

impl Default for CursorThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_CURSOR_THROTTLE)
    }
}

impl CursorThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_sent: None,
            pending: None,
        }
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_sent {
            Some(last) => now.saturating_duration_since(last) >= self.window,
            None => true,
        }
    }

    /// Offer a new position. Returns the position to send now, if any.
    pub fn update(&mut self, x: f64, y: f64, now: Instant) -> Option<(f64, f64)> {
        if self.window_open(now) {
            self.pending = None;
            self.last_sent = Some(now);
            Some((x, y))
        } else {
            self.pending = Some((x, y));
            None
        }
    }

    /// Timer tick. Releases the pending position once the window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<(f64, f64)> {
        if self.pending.is_none() || !self.window_open(now) {
            return None;
        }
        self.last_sent = Some(now);
        self.pending.take()
    }

    /// Check if a position is waiting for the window to close.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending position and forget the last send.
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_sent = None;
    }
}
