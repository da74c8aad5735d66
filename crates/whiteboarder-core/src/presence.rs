//! Live cursor positions of other editors on the same board.

use std::collections::BTreeMap;

/// Last known cursor position of a peer.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    pub username: String,
    pub x: f64,
    pub y: f64,
}

/// Outcome of a cursor update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceChange {
    /// First cursor seen from this peer.
    Joined,
    /// Known peer moved.
    Moved,
    /// Update came from the local identity and was dropped.
    Ignored,
}

/// Peer identity to cursor mapping.
///
/// Entries are removed only on an explicit departure notice; there is no
/// staleness timeout.
#[derive(Debug, Clone)]
pub struct PresenceTracker {
    local: String,
    peers: BTreeMap<String, CursorState>,
}

impl PresenceTracker {
    pub fn new(local_identity: impl Into<String>) -> Self {
        Self {
            local: local_identity.into(),
            peers: BTreeMap::new(),
        }
    }

    /// Insert or move a peer cursor.
    pub fn update_cursor(&mut self, peer: &str, x: f64, y: f64) -> PresenceChange {
        if peer == self.local {
            return PresenceChange::Ignored;
        }
        match self.peers.get_mut(peer) {
            Some(cursor) => {
                cursor.x = x;
                cursor.y = y;
                PresenceChange::Moved
            }
            None => {
                self.peers.insert(
                    peer.to_string(),
                    CursorState {
                        username: peer.to_string(),
                        x,
                        y,
                    },
                );
                PresenceChange::Joined
            }
        }
    }

    /// Forget a peer. Returns true if it was tracked.
    pub fn remove_peer(&mut self, peer: &str) -> bool {
        self.peers.remove(peer).is_some()
    }

    pub fn get(&self, peer: &str) -> Option<&CursorState> {
        self.peers.get(peer)
    }

    /// Cursors ordered by username.
    pub fn iter(&self) -> impl Iterator<Item = &CursorState> {
        self.peers.values()
    }

    pub fn clear(&mut self) {
        self.peers.clear();
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
